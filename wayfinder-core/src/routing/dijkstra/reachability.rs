use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::{NodeId, TravelMode, model::WayGraph};

/// Number of nodes reachable from `start` over edges allowing `mode`,
/// counting `start` and stopping once `budget` nodes have been visited.
///
/// Only used to explain a failed search.
pub fn reachable_count(graph: &WayGraph, start: NodeId, mode: TravelMode, budget: usize) -> usize {
    if start.index() >= graph.node_count() {
        return 0;
    }

    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut queue = VecDeque::from([start]);
    visited.insert(start.index());
    let mut count = 1;
    if count >= budget {
        return count.min(budget);
    }

    while let Some(node) = queue.pop_front() {
        for (next, _) in graph.traversable_edges(node, mode) {
            if visited.put(next.index()) {
                continue;
            }
            count += 1;
            if count >= budget {
                return count;
            }
            queue.push_back(next);
        }
    }
    count
}
