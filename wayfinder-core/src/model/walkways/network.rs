//! Per-query walkway graph with merge-tolerant node lookup

use geo::Coord;
use hashbrown::HashMap;
use petgraph::{
    graph::UnGraph,
    unionfind::UnionFind,
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{EdgeKind, WayEdge, WayNode};
use crate::{
    Meters, ModeSet, NodeId, TravelMode,
    algo::EnhanceStats,
    geometry::{LocalProjector, meters},
    model::Segment,
};

/// Coordinates are cached exactly at 1e-7 degrees (about a centimeter).
const COORD_KEY_SCALE: f64 = 1e7;
/// Planar search radius relative to the merge tolerance, absorbing the
/// difference between the local plane and geodesic distance.
const PLANAR_SEARCH_SLACK: f64 = 1.5;

type IndexedNode = GeomWithData<[f64; 2], NodeId>;

fn coord_key(coord: Coord<f64>) -> (i64, i64) {
    (
        (coord.x * COORD_KEY_SCALE).round() as i64,
        (coord.y * COORD_KEY_SCALE).round() as i64,
    )
}

/// Undirected walkway graph built for a single query.
///
/// Holds the segments it was built from so that snapping and temporary
/// node insertion can work against the same geometry.
#[derive(Debug, Clone)]
pub struct WayGraph {
    pub(crate) graph: UnGraph<WayNode, WayEdge>,
    pub(crate) segments: Vec<Segment>,
    pub(crate) stats: EnhanceStats,
    projector: LocalProjector,
    merge_tolerance_m: Meters,
    exact: HashMap<(i64, i64), NodeId>,
    rtree: RTree<IndexedNode>,
}

impl WayGraph {
    pub fn new(projector: LocalProjector, merge_tolerance_m: Meters) -> Self {
        Self {
            graph: UnGraph::default(),
            segments: Vec::new(),
            stats: EnhanceStats::default(),
            projector,
            merge_tolerance_m,
            exact: HashMap::new(),
            rtree: RTree::new(),
        }
    }

    /// Returns the node for `coord`, reusing the nearest existing network
    /// node within the merge tolerance or inserting a new one.
    pub fn node_id(&mut self, coord: Coord<f64>) -> NodeId {
        let key = coord_key(coord);
        if let Some(&id) = self.exact.get(&key) {
            return id;
        }

        let planar = self.projector.project(coord);
        let radius = self.merge_tolerance_m * PLANAR_SEARCH_SLACK;
        let nearest = self
            .rtree
            .locate_within_distance([planar.x, planar.y], radius * radius)
            .filter_map(|entry| {
                let node = entry.data;
                let distance = meters(self.graph[node].coord(), coord);
                (distance <= self.merge_tolerance_m).then_some((distance, node))
            })
            .min_by(|(da, na), (db, nb)| da.total_cmp(db).then_with(|| na.cmp(nb)));

        if let Some((_, id)) = nearest {
            self.exact.insert(key, id);
            return id;
        }

        let id = self.graph.add_node(WayNode::network(coord));
        self.exact.insert(key, id);
        self.rtree
            .insert(GeomWithData::new([planar.x, planar.y], id));
        id
    }

    /// Inserts a query-specific node exactly at `coord`, bypassing merging.
    /// Such nodes are never returned by [`WayGraph::node_id`].
    pub fn insert_temporary(&mut self, coord: Coord<f64>) -> NodeId {
        self.graph.add_node(WayNode::temporary(coord))
    }

    /// Adds an edge unless it would be a self loop or duplicate an existing
    /// edge. Returns whether the edge was added.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: Meters,
        modes: ModeSet,
        kind: EdgeKind,
    ) -> bool {
        if a == b || self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(
            a,
            b,
            WayEdge {
                length_m,
                modes,
                kind,
            },
        );
        true
    }

    /// Adds a walkway edge, or widens an existing one between the same nodes:
    /// mode sets are united and the shorter length is kept.
    pub fn merge_edge(&mut self, a: NodeId, b: NodeId, length_m: Meters, modes: ModeSet) {
        if a == b {
            return;
        }
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let existing = &mut self.graph[edge];
                existing.modes = existing.modes.union(modes);
                existing.length_m = existing.length_m.min(length_m);
            }
            None => {
                self.graph.add_edge(
                    a,
                    b,
                    WayEdge {
                        length_m,
                        modes,
                        kind: EdgeKind::Walkway,
                    },
                );
            }
        }
    }

    pub fn remove_edge_between(&mut self, a: NodeId, b: NodeId) -> Option<WayEdge> {
        let edge = self.graph.find_edge(a, b)?;
        self.graph.remove_edge(edge)
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.find_edge(a, b).is_some()
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&WayEdge> {
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    pub fn node(&self, id: NodeId) -> Option<&WayNode> {
        self.graph.node_weight(id)
    }

    pub fn node_coord(&self, id: NodeId) -> Option<Coord<f64>> {
        self.node(id).map(WayNode::coord)
    }

    /// Geodesic distance between two nodes.
    pub fn distance_between(&self, a: NodeId, b: NodeId) -> Option<Meters> {
        Some(meters(self.node_coord(a)?, self.node_coord(b)?))
    }

    /// Neighbours of `node` reachable over edges that allow `mode`.
    pub fn traversable_edges(
        &self,
        node: NodeId,
        mode: TravelMode,
    ) -> impl Iterator<Item = (NodeId, &WayEdge)> + '_ {
        self.graph
            .edges(node)
            .filter(move |edge| edge.weight().allows(mode))
            .map(move |edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (other, edge.weight())
            })
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.graph.edges(node).count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn stats(&self) -> &EnhanceStats {
        &self.stats
    }

    pub fn projector(&self) -> &LocalProjector {
        &self.projector
    }

    /// Underlying petgraph graph, for inspection.
    pub fn graph(&self) -> &UnGraph<WayNode, WayEdge> {
        &self.graph
    }

    /// Connected component label per node index, numbered in order of the
    /// lowest node index in each component. Ignores mode restrictions.
    pub fn component_labels(&self) -> Vec<usize> {
        let mut sets = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut labels = Vec::with_capacity(self.graph.node_count());
        let mut by_root: HashMap<usize, usize> = HashMap::new();
        for node in 0..self.graph.node_count() {
            let root = sets.find(node);
            let next = by_root.len();
            labels.push(*by_root.entry(root).or_insert(next));
        }
        labels
    }

    pub(crate) fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}
