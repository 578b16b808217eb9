//! Venue wayfinding engine.
//!
//! Turns walkway line geometries into a routable graph (connecting lines that
//! cross or nearly touch), snaps arbitrary coordinates onto it and computes
//! mode-constrained shortest paths with their length and duration.
//!
//! The graph is rebuilt for every query; nothing persists between calls.

pub mod algo;
mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod overlay;
pub mod prelude;
pub mod routing;

pub use algo::EnhanceStats;
pub use error::{Endpoint, Error, RouteError};
pub use loading::{RouteLimits, RoutingConfig, Tolerances, build_way_graph};
pub use model::{ModeSet, TravelMode, WalkwayLine, WalkwayNetwork, WayGraph};
pub use overlay::{OverlayOptions, debug_overlay};
pub use routing::{RouteRequest, RouteResult, SnapResult, compute_route};

/// Node index in the walkway graph
pub type NodeId = petgraph::graph::NodeIndex;
/// Distance in meters
pub type Meters = f64;
/// Duration in seconds
pub type Seconds = f64;
