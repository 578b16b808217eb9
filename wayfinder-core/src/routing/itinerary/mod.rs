//! Computed routes: geometry, lengths and duration

mod to_geojson;

use geo::{BoundingRect, Coord, LineString, Rect};
use serde::Serialize;

use crate::{
    EnhanceStats, Meters, NodeId, RouteError, RouteLimits, Seconds, TravelMode,
    geometry::{meters, path_length, point_along},
    model::WayGraph,
    routing::snap::SnapResult,
};

/// Straight link between a raw query point and its snap point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: Coord<f64>,
    pub to: Coord<f64>,
    pub length_m: Meters,
    /// Whether the link is drawn; it counts towards the total either way
    pub rendered: bool,
}

impl Connector {
    /// Measures a connector and applies the hide threshold.
    pub fn new(from: Coord<f64>, to: Coord<f64>, limits: &RouteLimits) -> Self {
        let length_m = meters(from, to);
        Self {
            from,
            to,
            length_m,
            rendered: length_m >= limits.hide_connector_lt_m,
        }
    }

    /// Zero-length, never rendered connector at `at`.
    pub fn hidden(at: Coord<f64>) -> Self {
        Self {
            from: at,
            to: at,
            length_m: 0.0,
            rendered: false,
        }
    }
}

/// Intermediate state of a route computation, returned on request
#[derive(Debug, Clone)]
pub struct RouteDiagnostics {
    pub graph: WayGraph,
    pub start_snap: SnapResult,
    pub destination_snap: SnapResult,
    pub start_node: NodeId,
    pub destination_node: NodeId,
    pub node_path: Vec<NodeId>,
}

/// Successful route
#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Main path from the start snap point to the destination snap point
    pub coords: Vec<Coord<f64>>,
    pub main_length_m: Meters,
    /// Main length plus both connector lengths
    pub total_length_m: Meters,
    /// Main length over the profile speed
    pub duration_s: Seconds,
    pub profile: TravelMode,
    pub start_connector: Connector,
    pub destination_connector: Connector,
    pub diagnostics: Option<RouteDiagnostics>,
}

/// Summary of a route without geometry, for logs and API responses
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    pub main_length_m: Meters,
    pub total_length_m: Meters,
    pub duration_s: Seconds,
    pub profile: TravelMode,
    pub start_connector_m: Meters,
    pub destination_connector_m: Meters,
    pub node_count: usize,
}

/// Turns a node path into the final route.
///
/// # Errors
///
/// Returns [`RouteError::InternalError`] if a path node is missing from the graph.
pub fn assemble_route(
    graph: &WayGraph,
    node_path: &[NodeId],
    start_connector: Connector,
    destination_connector: Connector,
    profile: TravelMode,
    speed_mps: f64,
) -> Result<RouteResult, RouteError> {
    let coords = node_path
        .iter()
        .map(|&node| {
            graph.node_coord(node).ok_or_else(|| {
                RouteError::InternalError(format!("path node {} is not in the graph", node.index()))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let main_length_m = path_length(&coords);
    let total_length_m = main_length_m + start_connector.length_m + destination_connector.length_m;

    Ok(RouteResult {
        coords,
        main_length_m,
        total_length_m,
        duration_s: main_length_m / speed_mps,
        profile,
        start_connector,
        destination_connector,
        diagnostics: None,
    })
}

impl RouteResult {
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            main_length_m: self.main_length_m,
            total_length_m: self.total_length_m,
            duration_s: self.duration_s,
            profile: self.profile,
            start_connector_m: self.start_connector.length_m,
            destination_connector_m: self.destination_connector.length_m,
            node_count: self.coords.len(),
        }
    }

    /// Connectors that are drawn, start first.
    pub fn rendered_connectors(&self) -> impl Iterator<Item = &Connector> {
        [&self.start_connector, &self.destination_connector]
            .into_iter()
            .filter(|connector| connector.rendered)
    }

    /// Bounding box of the main path and both raw query points.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let mut coords = self.coords.clone();
        coords.push(self.start_connector.from);
        coords.push(self.destination_connector.to);
        LineString::new(coords).bounding_rect()
    }

    /// Coordinate `distance_m` meters along the main path, clamped to its ends.
    pub fn point_at_distance(&self, distance_m: Meters) -> Option<Coord<f64>> {
        point_along(&self.coords, distance_m)
    }

    /// Graph statistics, when diagnostics were requested.
    pub fn graph_stats(&self) -> Option<&EnhanceStats> {
        self.diagnostics
            .as_ref()
            .map(|diagnostics| diagnostics.graph.stats())
    }
}
