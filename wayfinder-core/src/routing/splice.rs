use log::debug;

use super::snap::SnapResult;
use crate::{
    NodeId,
    geometry::meters,
    model::{EdgeKind, WayGraph},
};

/// Makes a snap point routable.
///
/// Inserts a temporary node exactly at the snap coordinate, replaces the
/// sub-edge that contains it with two access edges carrying the segment's
/// modes, and records the node in the segment's chain so a later snap on the
/// same segment links to it directly.
///
/// Returns `None` if the snap refers to a segment the graph does not hold.
pub fn insert_temporary_node(graph: &mut WayGraph, snap: &SnapResult) -> Option<NodeId> {
    let (slot, left, right) = graph.segments.get(snap.segment)?.bracket(snap.t)?;
    let modes = snap.modes;

    let node = graph.insert_temporary(snap.coord);
    graph.remove_edge_between(left, right);
    for neighbour in [left, right] {
        let length_m = meters(graph.node_coord(neighbour)?, snap.coord);
        graph.add_edge(neighbour, node, length_m, modes, EdgeKind::Access);
    }
    graph.segments[snap.segment].splice(slot, snap.t, node);

    debug!(
        "Temporary node {} on segment {} at t={:.4} between {} and {}",
        node.index(),
        snap.segment,
        snap.t,
        left.index(),
        right.index()
    );
    Some(node)
}
