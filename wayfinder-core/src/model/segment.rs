//! Segments of input lines and the split positions registered on them

use std::collections::BTreeMap;

use geo::Coord;
use rstar::AABB;

use super::ModeSet;
use crate::{NodeId, Tolerances, geometry::interpolate};

/// Registered split position along a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    /// Rounded parametric position, strictly inside `0..1`
    pub t: f64,
    pub coord: Coord<f64>,
    /// Node the cut resolved to once the segment was materialized
    pub node: Option<NodeId>,
}

/// Reference to one end of a planned connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutRef {
    /// The position coincides with an existing segment endpoint
    Endpoint(NodeId),
    /// A cut on `segment` keyed by its rounded parametric position
    Cut { segment: usize, key: i64 },
}

/// One piece of an input line between two consecutive vertices
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: usize,
    /// Index of the owning line in the network
    pub line: usize,
    /// Position of the segment within its line
    pub position: usize,
    pub a: Coord<f64>,
    pub b: Coord<f64>,
    pub projected_a: Coord<f64>,
    pub projected_b: Coord<f64>,
    pub a_node: NodeId,
    pub b_node: NodeId,
    pub modes: ModeSet,
    cuts: BTreeMap<i64, Cut>,
    /// Ordered `(t, node)` pairs the segment is currently split into
    chain: Vec<(f64, NodeId)>,
}

impl Segment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: usize,
        line: usize,
        position: usize,
        (a, b): (Coord<f64>, Coord<f64>),
        (projected_a, projected_b): (Coord<f64>, Coord<f64>),
        a_node: NodeId,
        b_node: NodeId,
        modes: ModeSet,
    ) -> Self {
        Self {
            id,
            line,
            position,
            a,
            b,
            projected_a,
            projected_b,
            a_node,
            b_node,
            modes,
            cuts: BTreeMap::new(),
            chain: vec![(0.0, a_node), (1.0, b_node)],
        }
    }

    /// Lon/lat point at parametric position `t`.
    pub fn point_at(&self, t: f64) -> Coord<f64> {
        interpolate(self.a, self.b, t)
    }

    /// Planar bounding box grown by `margin` meters on every side.
    pub fn envelope(&self, margin: f64) -> AABB<[f64; 2]> {
        let (pa, pb) = (self.projected_a, self.projected_b);
        AABB::from_corners(
            [pa.x.min(pb.x) - margin, pa.y.min(pb.y) - margin],
            [pa.x.max(pb.x) + margin, pa.y.max(pb.y) + margin],
        )
    }

    /// Both endpoints merged into one node; such a segment carries no edge.
    pub fn is_collapsed(&self) -> bool {
        self.a_node == self.b_node
    }

    pub fn shares_endpoint(&self, other: &Segment) -> bool {
        self.a_node == other.a_node
            || self.a_node == other.b_node
            || self.b_node == other.a_node
            || self.b_node == other.b_node
    }

    /// Registers a split at `t`, returning a reference to it and whether a
    /// new cut was created.
    ///
    /// Positions within `cut_t_eps` of either end resolve to the endpoint node.
    /// The cut coordinate is derived from the rounded key, so the same key
    /// always yields the same point regardless of registration order.
    pub fn register_cut(&mut self, t: f64, tolerances: &Tolerances) -> (CutRef, bool) {
        let t = t.clamp(0.0, 1.0);
        if t <= tolerances.cut_t_eps {
            return (CutRef::Endpoint(self.a_node), false);
        }
        if 1.0 - t <= tolerances.cut_t_eps {
            return (CutRef::Endpoint(self.b_node), false);
        }

        let key = (t * tolerances.cut_key_scale).round() as i64;
        let reference = CutRef::Cut {
            segment: self.id,
            key,
        };
        if self.cuts.contains_key(&key) {
            return (reference, false);
        }

        let rounded = key as f64 / tolerances.cut_key_scale;
        self.cuts.insert(
            key,
            Cut {
                t: rounded,
                coord: self.point_at(rounded),
                node: None,
            },
        );
        (reference, true)
    }

    pub fn has_cuts(&self) -> bool {
        !self.cuts.is_empty()
    }

    /// Cuts ordered by parametric position, with their keys.
    pub fn cuts(&self) -> impl Iterator<Item = (i64, &Cut)> {
        self.cuts.iter().map(|(key, cut)| (*key, cut))
    }

    pub fn cut(&self, key: i64) -> Option<&Cut> {
        self.cuts.get(&key)
    }

    pub(crate) fn resolve_cut(&mut self, key: i64, node: NodeId) {
        if let Some(cut) = self.cuts.get_mut(&key) {
            cut.node = Some(node);
        }
    }

    pub fn chain(&self) -> &[(f64, NodeId)] {
        &self.chain
    }

    pub(crate) fn set_chain(&mut self, chain: Vec<(f64, NodeId)>) {
        self.chain = chain;
    }

    /// Consecutive chain nodes enclosing position `t`, with the chain slot a
    /// node at `t` would be inserted into.
    pub fn bracket(&self, t: f64) -> Option<(usize, NodeId, NodeId)> {
        let t = t.clamp(0.0, 1.0);
        self.chain
            .windows(2)
            .position(|pair| pair[0].0 <= t && t <= pair[1].0)
            .map(|i| (i + 1, self.chain[i].1, self.chain[i + 1].1))
    }

    pub(crate) fn splice(&mut self, slot: usize, t: f64, node: NodeId) {
        self.chain.insert(slot, (t, node));
    }
}
