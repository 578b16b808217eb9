// Re-export key components
pub use crate::loading::{RouteLimits, RoutingConfig, Tolerances, build_way_graph};
pub use crate::model::{ModeSet, TravelMode, WalkwayLine, WalkwayNetwork, WayGraph};
pub use crate::overlay::{OverlayOptions, debug_overlay};
pub use crate::routing::{
    Connector, RouteDiagnostics, RouteRequest, RouteResult, RouteSummary, SnapResult,
    compute_route,
};
pub use crate::{Endpoint, Error, RouteError};

// Core types
pub use crate::Meters;
pub use crate::NodeId;
pub use crate::Seconds;
