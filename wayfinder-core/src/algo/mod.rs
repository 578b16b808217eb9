//! Graph algorithms applied while building the walkway graph

pub mod connectivity;
pub mod materialize;

pub use connectivity::{Contact, EnhanceStats, PairRelation, enhance_connectivity, relate};
pub use materialize::materialize_segments;
