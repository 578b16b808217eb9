//! Splits segments at their registered cuts

use log::trace;

use crate::{NodeId, Tolerances, model::WayGraph};

/// Replaces the direct edge of every cut segment with sub-edges between its
/// endpoints and cut nodes, in parametric order.
///
/// Each cut resolves to a node through the merge-tolerant lookup. Sub-edges
/// shorter than `min_edge_length_m` are skipped. Every segment records the
/// resulting `(t, node)` chain.
pub fn materialize_segments(graph: &mut WayGraph, tolerances: &Tolerances) {
    for idx in 0..graph.segments.len() {
        if !graph.segments[idx].has_cuts() {
            continue;
        }

        let (a_node, b_node) = (graph.segments[idx].a_node, graph.segments[idx].b_node);
        let modes = graph.segments[idx].modes;
        graph.remove_edge_between(a_node, b_node);

        let cuts: Vec<(i64, f64, geo::Coord<f64>)> = graph.segments[idx]
            .cuts()
            .map(|(key, cut)| (key, cut.t, cut.coord))
            .collect();

        let mut chain: Vec<(f64, NodeId)> = Vec::with_capacity(cuts.len() + 2);
        chain.push((0.0, a_node));
        for (key, t, coord) in cuts {
            let node = graph.node_id(coord);
            graph.segments[idx].resolve_cut(key, node);
            if chain.last().is_some_and(|(_, last)| *last == node) {
                continue;
            }
            chain.push((t, node));
        }
        if chain.last().is_some_and(|(_, last)| *last == b_node) {
            // a cut resolved onto the far endpoint
            chain.pop();
        }
        chain.push((1.0, b_node));

        for pair in chain.windows(2) {
            let ((_, from), (_, to)) = (pair[0], pair[1]);
            let Some(length_m) = graph.distance_between(from, to) else {
                continue;
            };
            if length_m < tolerances.min_edge_length_m {
                trace!("Segment {idx}: skipping {length_m:.3} m sub-edge");
                continue;
            }
            graph.merge_edge(from, to, length_m, modes);
        }
        graph.segments[idx].set_chain(chain);
    }

    // Removing a cut segment's direct edge also drops it for any uncut
    // segment spanning the same node pair.
    for idx in 0..graph.segments.len() {
        let segment = &graph.segments[idx];
        if segment.has_cuts() || graph.has_edge(segment.a_node, segment.b_node) {
            continue;
        }
        let (a, b, modes) = (segment.a_node, segment.b_node, segment.modes);
        if let Some(length_m) = graph.distance_between(a, b) {
            graph.merge_edge(a, b, length_m, modes);
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;
    use crate::{
        ModeSet,
        geometry::LocalProjector,
        model::{CutRef, Segment},
    };

    const ANCHOR: Coord<f64> = Coord { x: 31.8, y: 36.6 };

    fn single_segment_graph(length: f64) -> WayGraph {
        let projector = LocalProjector::new(ANCHOR);
        let mut graph = WayGraph::new(projector, 2.0);
        let pa = Coord { x: 0.0, y: 0.0 };
        let pb = Coord { x: length, y: 0.0 };
        let (a, b) = (projector.unproject(pa), projector.unproject(pb));
        let (na, nb) = (graph.node_id(a), graph.node_id(b));
        let len = graph.distance_between(na, nb).unwrap();
        graph.merge_edge(na, nb, len, ModeSet::ALL);
        graph.push_segment(Segment::new(0, 0, 0, (a, b), (pa, pb), na, nb, ModeSet::ALL));
        graph
    }

    #[test]
    fn cut_segment_is_split_in_order() {
        let tolerances = Tolerances::default();
        let mut graph = single_segment_graph(100.0);
        graph.segments[0].register_cut(0.75, &tolerances);
        graph.segments[0].register_cut(0.25, &tolerances);

        materialize_segments(&mut graph, &tolerances);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        let chain = graph.segments[0].chain();
        assert_eq!(chain.len(), 4);
        assert!(chain.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert!(!graph.has_edge(chain[0].1, chain[3].1));

        let total: f64 = chain
            .windows(2)
            .map(|pair| graph.edge_between(pair[0].1, pair[1].1).unwrap().length_m)
            .sum();
        let direct = graph.distance_between(chain[0].1, chain[3].1).unwrap();
        assert!((total - direct).abs() < 1e-6);
    }

    #[test]
    fn cut_near_an_endpoint_merges_into_it() {
        let tolerances = Tolerances::default();
        let mut graph = single_segment_graph(100.0);
        // 1 m from the start, inside the merge tolerance
        let (cut, created) = graph.segments[0].register_cut(0.01, &tolerances);
        assert!(created);

        materialize_segments(&mut graph, &tolerances);

        let CutRef::Cut { key, .. } = cut else {
            panic!("expected a cut");
        };
        assert_eq!(graph.segments[0].cut(key).unwrap().node, Some(graph.segments[0].a_node));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.segments[0].chain().len(), 2);
    }
}
