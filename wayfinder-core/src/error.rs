use std::fmt;

use thiserror::Error;

use crate::TravelMode;

/// Errors raised while preparing inputs: configuration and network data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Which query point a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Outcome of a failed route query.
///
/// Every variant except [`RouteError::InternalError`] is an expected,
/// typed outcome that callers branch on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("No walkway network data is available")]
    MissingNetworkData,
    #[error("No destination was selected")]
    MissingDestination,
    #[error("The {0} point could not be snapped onto the network")]
    SnapFailure(Endpoint),
    #[error(
        "Start or destination is too far from the network \
        (start {start_m:.1} m, destination {destination_m:.1} m, max {max_m:.1} m)"
    )]
    ConnectorTooLong {
        start_m: f64,
        destination_m: f64,
        max_m: f64,
    },
    #[error("No route found for profile '{profile}' (disconnected network or mode restriction)")]
    PathNotFound {
        profile: TravelMode,
        /// Nodes reachable from the start under the profile, capped by the
        /// exploration budget. Diagnostic only.
        reachable_nodes: usize,
    },
    #[error("Internal routing error: {0}")]
    InternalError(String),
}

impl RouteError {
    /// Stable machine-readable identifier of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::MissingNetworkData => "missing_network_data",
            RouteError::MissingDestination => "missing_destination",
            RouteError::SnapFailure(_) => "snap_failure",
            RouteError::ConnectorTooLong { .. } => "connector_too_long",
            RouteError::PathNotFound { .. } => "path_not_found",
            RouteError::InternalError(_) => "internal_error",
        }
    }
}
