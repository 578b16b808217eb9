//! Planar and geodesic helpers shared by graph construction and snapping

pub mod geodesic;
pub mod projector;
pub mod proximity;

pub use geodesic::{interpolate, meters, path_length, point_along};
pub use projector::LocalProjector;
pub use proximity::{Crossing, Projection, crossing, project_point};
