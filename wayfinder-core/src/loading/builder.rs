use itertools::Itertools;
use log::{debug, trace};

use crate::{
    Tolerances, WalkwayNetwork,
    algo::enhance_connectivity,
    geometry::LocalProjector,
    model::{Segment, WayGraph},
};

/// Builds the routable graph for a network.
///
/// Every vertex becomes a node (merging coordinates within the merge
/// tolerance) and every pair of consecutive vertices an edge weighted by
/// geodesic distance. Lines that cross or nearly touch are then connected.
pub fn build_way_graph(network: &WalkwayNetwork, tolerances: &Tolerances) -> WayGraph {
    let projector = LocalProjector::for_network(network);
    let mut graph = WayGraph::new(projector, tolerances.merge_tolerance_m);

    for (line_idx, line) in network.lines().iter().enumerate() {
        if !line.is_routable() {
            trace!("Skipping line #{line_idx} with fewer than two vertices");
            continue;
        }

        for (position, (a, b)) in line.coords.iter().copied().tuple_windows().enumerate() {
            let a_node = graph.node_id(a);
            let b_node = graph.node_id(b);
            if a_node == b_node {
                // kept for snapping only, it has no edge of its own
                trace!("Line #{line_idx}: segment {position} collapses onto one node");
            } else if let Some(length_m) = graph.distance_between(a_node, b_node) {
                graph.merge_edge(a_node, b_node, length_m, line.modes);
            }

            let id = graph.segments.len();
            graph.push_segment(Segment::new(
                id,
                line_idx,
                position,
                (a, b),
                (projector.project(a), projector.project(b)),
                a_node,
                b_node,
                line.modes,
            ));
        }
    }

    enhance_connectivity(&mut graph, tolerances);

    let stats = graph.stats();
    debug!(
        "Walkway graph: {} nodes, {} segments, {} edges; {} candidate pairs, {} intersections, \
        {} cuts, {} same-point merges ({} rejoined), {} of {} connectors added",
        graph.node_count(),
        graph.segments().len(),
        graph.edge_count(),
        stats.candidate_pairs,
        stats.intersections,
        stats.cuts,
        stats.same_point_merges,
        stats.same_point_rejoins,
        stats.connectors_added,
        stats.connectors_planned,
    );
    graph
}
