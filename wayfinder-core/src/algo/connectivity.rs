//! Connects walkway lines that cross or nearly touch without sharing a vertex.
//!
//! Candidate segment pairs are found through an R-tree over their envelopes
//! grown by the connection tolerance. Each accepted contact registers a cut on
//! both segments and plans a link between the two cut references; the links
//! are turned into edges once the segments have been split (see
//! [`super::materialize`]).

use log::trace;
use rstar::{AABB, RTree, RTreeObject};
use serde::Serialize;

use super::materialize::materialize_segments;
use crate::{
    Meters, ModeSet, NodeId, Tolerances,
    geometry::{Crossing, crossing, meters, project_point},
    model::{CutRef, EdgeKind, Segment, WayGraph},
};

/// Counters collected while enhancing a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceStats {
    /// Segment pairs from different lines whose grown envelopes overlap and
    /// whose mode sets intersect
    pub candidate_pairs: usize,
    /// Pairs whose segments cross or touch
    pub intersections: usize,
    /// New cuts registered on segments
    pub cuts: usize,
    /// Contacts closer than the same-point epsilon, joined through a shared node
    pub same_point_merges: usize,
    pub connectors_planned: usize,
    pub connectors_added: usize,
    /// Same-point contacts whose ends still resolved to different nodes and
    /// were linked by a connector
    pub same_point_rejoins: usize,
}

/// How two segments of different lines relate
#[derive(Debug, Clone, PartialEq)]
pub enum PairRelation {
    /// The segments cross or touch at `t` on the first and `u` on the second
    Crossing { t: f64, u: f64 },
    /// Parallel segments touching at one or more endpoint projections
    Overlap(Vec<Contact>),
    /// Closest approach between segments that do not touch
    Approach(Contact),
}

/// Pair of parametric positions, one on each segment, and the planar
/// distance between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub t: f64,
    pub u: f64,
    pub distance: f64,
}

/// Link planned between two cut references
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlannedLink {
    pub(crate) from: CutRef,
    pub(crate) to: CutRef,
    /// Geodesic distance measured between the two contact points
    pub(crate) distance_m: Meters,
    pub(crate) modes: ModeSet,
    /// Close enough to be treated as one location; no connector is queued
    pub(crate) same_point: bool,
}

struct IndexedSegment {
    segment: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Finds crossing and near-miss segment pairs, splits the segments at the
/// contact points and adds connector edges between them.
pub fn enhance_connectivity(graph: &mut WayGraph, tolerances: &Tolerances) {
    let pairs = candidate_pairs(&graph.segments, tolerances);
    let mut stats = EnhanceStats {
        candidate_pairs: pairs.len(),
        ..EnhanceStats::default()
    };

    let mut links = Vec::new();
    for (i, j) in pairs {
        let relation = relate(&graph.segments[i], &graph.segments[j], tolerances);
        let contacts = match relation {
            PairRelation::Crossing { t, u } => {
                stats.intersections += 1;
                vec![Contact { t, u, distance: 0.0 }]
            }
            PairRelation::Overlap(contacts) => contacts,
            PairRelation::Approach(contact) => vec![contact],
        };

        let modes = graph.segments[i]
            .modes
            .intersection(graph.segments[j].modes);
        for contact in contacts {
            let p = graph.segments[i].point_at(contact.t);
            let q = graph.segments[j].point_at(contact.u);
            let distance_m = meters(p, q);
            if distance_m > tolerances.connect_tolerance_m {
                trace!(
                    "Segments {i} and {j}: closest approach {distance_m:.2} m exceeds tolerance"
                );
                continue;
            }

            let (from, created) = graph.segments[i].register_cut(contact.t, tolerances);
            stats.cuts += usize::from(created);
            let (to, created) = graph.segments[j].register_cut(contact.u, tolerances);
            stats.cuts += usize::from(created);

            let same_point = distance_m < tolerances.same_point_eps_m;
            if same_point {
                stats.same_point_merges += 1;
            } else {
                stats.connectors_planned += 1;
            }
            trace!(
                "Segments {i} and {j}: contact at t={:.6} u={:.6}, {distance_m:.2} m{}",
                contact.t,
                contact.u,
                if same_point { " (same point)" } else { "" }
            );

            links.push(PlannedLink {
                from,
                to,
                distance_m,
                modes,
                same_point,
            });
        }
    }

    materialize_segments(graph, tolerances);
    add_links(graph, &links, &mut stats);
    graph.stats = stats;
}

/// Sorted, deduplicated pairs `(i, j)` with `i < j` of segments from
/// different lines that may lie within the connection tolerance.
fn candidate_pairs(segments: &[Segment], tolerances: &Tolerances) -> Vec<(usize, usize)> {
    let margin = tolerances.connect_tolerance_m;
    let tree = RTree::bulk_load(
        segments
            .iter()
            .map(|segment| IndexedSegment {
                segment: segment.id,
                envelope: segment.envelope(margin),
            })
            .collect(),
    );

    let mut pairs = Vec::new();
    for segment in segments.iter().filter(|segment| !segment.is_collapsed()) {
        let envelope = segment.envelope(margin);
        for candidate in tree.locate_in_envelope_intersecting(&envelope) {
            if candidate.segment <= segment.id {
                continue;
            }
            let other = &segments[candidate.segment];
            if other.line == segment.line
                || other.is_collapsed()
                || segment.shares_endpoint(other)
                || segment.modes.intersection(other.modes).is_empty()
            {
                continue;
            }
            pairs.push((segment.id, other.id));
        }
    }

    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

/// Classifies a segment pair in the local plane.
pub fn relate(first: &Segment, second: &Segment, tolerances: &Tolerances) -> PairRelation {
    let (a, b) = (first.projected_a, first.projected_b);
    let (c, d) = (second.projected_a, second.projected_b);

    let parallel = match crossing(a, b, c, d) {
        Crossing::At { t, u } => return PairRelation::Crossing { t, u },
        Crossing::Parallel => true,
        Crossing::Apart => false,
    };

    let from_first = [(0.0, a), (1.0, b)].map(|(t, p)| {
        let proj = project_point(p, c, d);
        Contact {
            t,
            u: proj.t,
            distance: proj.distance,
        }
    });
    let from_second = [(0.0, c), (1.0, d)].map(|(u, p)| {
        let proj = project_point(p, a, b);
        Contact {
            t: proj.t,
            u,
            distance: proj.distance,
        }
    });
    let projections = [from_first[0], from_first[1], from_second[0], from_second[1]];

    if parallel {
        let touching: Vec<Contact> = projections
            .iter()
            .copied()
            .filter(|contact| contact.distance <= tolerances.same_point_eps_m)
            .collect();
        if !touching.is_empty() {
            return PairRelation::Overlap(touching);
        }
    }

    let closest = projections
        .iter()
        .copied()
        .reduce(|best, contact| {
            if contact.distance < best.distance {
                contact
            } else {
                best
            }
        })
        .unwrap_or(projections[0]);
    PairRelation::Approach(closest)
}

fn add_links(graph: &mut WayGraph, links: &[PlannedLink], stats: &mut EnhanceStats) {
    for link in links {
        let (Some(from), Some(to)) = (resolve(graph, link.from), resolve(graph, link.to)) else {
            trace!("Skipping link with unresolved cut {link:?}");
            continue;
        };
        if from == to {
            continue;
        }
        let Some(length_m) = graph.distance_between(from, to) else {
            continue;
        };

        trace!(
            "Connector {from:?}-{to:?}: measured {:.2} m, weighted {length_m:.2} m",
            link.distance_m
        );
        if graph.add_edge(from, to, length_m, link.modes, EdgeKind::Connector) {
            if link.same_point {
                stats.same_point_rejoins += 1;
            } else {
                stats.connectors_added += 1;
            }
        }
    }
}

fn resolve(graph: &WayGraph, reference: CutRef) -> Option<NodeId> {
    match reference {
        CutRef::Endpoint(node) => Some(node),
        CutRef::Cut { segment, key } => graph.segments.get(segment)?.cut(key)?.node,
    }
}
