use std::panic::{AssertUnwindSafe, catch_unwind};

use geo::Coord;
use log::{debug, info, warn};

use super::{
    dijkstra::{reachable_count, shortest_path},
    itinerary::{Connector, RouteDiagnostics, RouteResult, assemble_route},
    snap::{SnapResult, snap_to_network},
    splice::insert_temporary_node,
};
use crate::{
    Endpoint, NodeId, RouteError, RoutingConfig, TravelMode, WalkwayNetwork,
    loading::build_way_graph, model::WayGraph,
};

/// Start/destination pair and travel profile for one route computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Omitted starts fall back to the configured fallback start
    pub start: Option<Coord<f64>>,
    pub destination: Option<Coord<f64>>,
    pub profile: TravelMode,
    /// Return the graph, snaps and node path along with the route
    pub include_diagnostics: bool,
}

impl RouteRequest {
    pub fn new(
        start: Option<Coord<f64>>,
        destination: Option<Coord<f64>>,
        profile: TravelMode,
    ) -> Self {
        Self {
            start,
            destination,
            profile,
            include_diagnostics: false,
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self) -> Self {
        self.include_diagnostics = true;
        self
    }
}

/// Computes a route across `network` for `request`.
///
/// Builds a fresh graph, snaps both points onto it, splices them in as
/// temporary nodes and runs a profile-restricted shortest path search.
///
/// # Errors
///
/// Returns a [`RouteError`] describing why no route could be produced. Panics
/// raised during the computation are reported as [`RouteError::InternalError`].
pub fn compute_route(
    network: &WalkwayNetwork,
    request: &RouteRequest,
    config: &RoutingConfig,
) -> Result<RouteResult, RouteError> {
    guarded(|| route_inner(network, request, config))
}

/// Runs `compute`, reporting a panic as [`RouteError::InternalError`] with
/// the panic message.
fn guarded<F>(compute: F) -> Result<RouteResult, RouteError>
where
    F: FnOnce() -> Result<RouteResult, RouteError>,
{
    catch_unwind(AssertUnwindSafe(compute)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "route computation panicked".to_string());
        warn!("Route computation failed: {message}");
        Err(RouteError::InternalError(message))
    })
}

fn route_inner(
    network: &WalkwayNetwork,
    request: &RouteRequest,
    config: &RoutingConfig,
) -> Result<RouteResult, RouteError> {
    if network.is_empty() {
        warn!("Walkway network is not loaded");
        return Err(RouteError::MissingNetworkData);
    }
    let Some(destination) = request.destination else {
        warn!("No destination selected");
        return Err(RouteError::MissingDestination);
    };

    let mut graph = build_way_graph(network, &config.tolerances);

    let start_query = request.start.or_else(|| {
        let fallback = config.fallback_start_coord();
        if fallback.is_some() {
            debug!("No start given, using the configured fallback start");
        }
        fallback
    });
    let start_snap = start_query.and_then(|query| snap_to_network(&graph, query));
    let destination_snap = snap_to_network(&graph, destination);
    debug!(
        "Snap results: start {:?}, destination {:?}",
        start_snap.map(|s| (s.segment, s.distance_m)),
        destination_snap.map(|s| (s.segment, s.distance_m))
    );

    let Some(start_snap) = start_snap else {
        warn!("Start could not be snapped onto the network");
        return Err(RouteError::SnapFailure(Endpoint::Start));
    };
    let Some(destination_snap) = destination_snap else {
        warn!("Destination could not be snapped onto the network");
        return Err(RouteError::SnapFailure(Endpoint::Destination));
    };

    let limits = &config.limits;
    let start_connector = match request.start {
        Some(start) => Connector::new(start, start_snap.coord, limits),
        None => Connector::hidden(start_snap.coord),
    };
    let destination_connector = Connector::new(destination_snap.coord, destination, limits);

    // negated so a NaN length is rejected too
    if !(start_connector.length_m <= limits.max_connector_m
        && destination_connector.length_m <= limits.max_connector_m)
    {
        warn!(
            "Start or destination too far from the network (start {:.1} m, destination {:.1} m, max {:.1} m)",
            start_connector.length_m, destination_connector.length_m, limits.max_connector_m
        );
        return Err(RouteError::ConnectorTooLong {
            start_m: start_connector.length_m,
            destination_m: destination_connector.length_m,
            max_m: limits.max_connector_m,
        });
    }

    let start_node = splice(&mut graph, &start_snap, Endpoint::Start)?;
    let destination_node = splice(&mut graph, &destination_snap, Endpoint::Destination)?;
    debug!(
        "Temporary nodes: start {} (degree {}), destination {} (degree {})",
        start_node.index(),
        graph.degree(start_node),
        destination_node.index(),
        graph.degree(destination_node)
    );

    let profile = request.profile;
    let Some(path) = shortest_path(&graph, start_node, destination_node, profile) else {
        let reachable_nodes =
            reachable_count(&graph, start_node, profile, config.reachability_budget);
        warn!(
            "No route found for profile '{profile}' (start degree {}, destination degree {}, \
            {reachable_nodes} nodes reachable)",
            graph.degree(start_node),
            graph.degree(destination_node)
        );
        return Err(RouteError::PathNotFound {
            profile,
            reachable_nodes,
        });
    };

    let mut route = assemble_route(
        &graph,
        &path.nodes,
        start_connector,
        destination_connector,
        profile,
        config.speed_for(profile),
    )?;
    info!(
        "Route computed: {} nodes, main {:.1} m, total {:.1} m, {:.0} s ({profile})",
        path.nodes.len(),
        route.main_length_m,
        route.total_length_m,
        route.duration_s
    );

    if request.include_diagnostics {
        route.diagnostics = Some(RouteDiagnostics {
            graph,
            start_snap,
            destination_snap,
            start_node,
            destination_node,
            node_path: path.nodes,
        });
    }
    Ok(route)
}

fn splice(
    graph: &mut WayGraph,
    snap: &SnapResult,
    endpoint: Endpoint,
) -> Result<NodeId, RouteError> {
    insert_temporary_node(graph, snap).ok_or_else(|| {
        RouteError::InternalError(format!(
            "{endpoint} snap refers to unknown segment {}",
            snap.segment
        ))
    })
}
