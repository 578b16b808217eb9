//! Routable walkway graph

pub mod components;
pub mod network;

pub use components::{EdgeKind, NodeKind, WayEdge, WayNode};
pub use network::WayGraph;
