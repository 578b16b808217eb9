//! Mode-constrained shortest paths over the walkway graph

mod reachability;
mod state;

use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;

pub use reachability::reachable_count;
use state::State;

use crate::{Meters, NodeId, TravelMode, model::WayGraph};

/// Node sequence of a shortest path and its summed edge weight
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub nodes: Vec<NodeId>,
    pub cost: Meters,
}

/// Dijkstra from `start` to `target` over edges that allow `mode`.
///
/// Stops as soon as `target` is settled. Returns `None` if it is unreachable
/// under the profile.
pub fn shortest_path(
    graph: &WayGraph,
    start: NodeId,
    target: NodeId,
    mode: TravelMode,
) -> Option<ShortestPath> {
    let node_count = graph.node_count();
    if start.index() >= node_count || target.index() >= node_count {
        return None;
    }

    let mut distances = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; node_count];
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();

    distances[start.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled.contains(node.index()) {
            continue;
        }
        settled.insert(node.index());

        if node == target {
            return Some(ShortestPath {
                nodes: trace_back(&predecessors, start, target),
                cost,
            });
        }

        for (next, edge) in graph.traversable_edges(node, mode) {
            if settled.contains(next.index()) {
                continue;
            }
            let next_cost = cost + edge.length_m;
            if next_cost < distances[next.index()] {
                distances[next.index()] = next_cost;
                predecessors[next.index()] = Some(node);
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    None
}

fn trace_back(predecessors: &[Option<NodeId>], start: NodeId, target: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![target];
    let mut current = target;
    while current != start {
        match predecessors[current.index()] {
            Some(prev) => {
                nodes.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;
    use crate::{ModeSet, geometry::LocalProjector, model::EdgeKind};

    /// Square a-b-c-d with a shuttle-only diagonal a-c.
    fn square() -> (WayGraph, [NodeId; 4]) {
        let projector = LocalProjector::new(Coord { x: 31.8, y: 36.6 });
        let mut graph = WayGraph::new(projector, 2.0);
        let nodes = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]
            .map(|(x, y)| graph.node_id(projector.unproject(Coord { x, y })));
        let [a, b, c, d] = nodes;
        for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
            graph.add_edge(from, to, 100.0, ModeSet::ALL, EdgeKind::Walkway);
        }
        graph.add_edge(
            a,
            c,
            141.0,
            ModeSet::only(TravelMode::Shuttle),
            EdgeKind::Walkway,
        );
        (graph, nodes)
    }

    #[test]
    fn profile_restricted_edges_are_absent() {
        let (graph, [a, b, c, _]) = square();
        let walk = shortest_path(&graph, a, c, TravelMode::Walk).unwrap();
        assert_eq!(walk.cost, 200.0);
        assert_eq!(walk.nodes, vec![a, b, c]);

        let shuttle = shortest_path(&graph, a, c, TravelMode::Shuttle).unwrap();
        assert_eq!(shuttle.cost, 141.0);
        assert_eq!(shuttle.nodes, vec![a, c]);
    }

    #[test]
    fn equal_costs_prefer_lower_node_indices() {
        let (graph, [a, b, c, _]) = square();
        // a-b-c and a-d-c both cost 200; b has the lower index
        let path = shortest_path(&graph, a, c, TravelMode::Bike).unwrap();
        assert_eq!(path.nodes, vec![a, b, c]);
    }

    #[test]
    fn unreachable_target() {
        let (mut graph, [a, ..]) = square();
        let island = graph.node_id(Coord { x: 32.0, y: 36.7 });
        assert!(shortest_path(&graph, a, island, TravelMode::Walk).is_none());
    }

    #[test]
    fn start_equals_target() {
        let (graph, [a, ..]) = square();
        let path = shortest_path(&graph, a, a, TravelMode::Walk).unwrap();
        assert_eq!(path.nodes, vec![a]);
        assert_eq!(path.cost, 0.0);
    }
}
