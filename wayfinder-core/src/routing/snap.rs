use geo::Coord;
use serde::Serialize;

use crate::{
    Meters, ModeSet,
    geometry::{meters, project_point},
    model::WayGraph,
};

/// Closest network point to a query coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapResult {
    /// Lon/lat of the snap point
    #[serde(serialize_with = "serialize_coord")]
    pub coord: Coord<f64>,
    /// Original endpoints of the segment the point lies on
    #[serde(serialize_with = "serialize_coord")]
    pub segment_start: Coord<f64>,
    #[serde(serialize_with = "serialize_coord")]
    pub segment_end: Coord<f64>,
    /// Index of that segment in the graph
    pub segment: usize,
    /// Index of the owning input line
    pub line: usize,
    /// Parametric position along the segment
    pub t: f64,
    pub modes: ModeSet,
    /// Geodesic distance from the query coordinate to the snap point
    pub distance_m: Meters,
}

fn serialize_coord<S: serde::Serializer>(
    coord: &Coord<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq([coord.x, coord.y])
}

/// Projects `query` onto every segment of the graph and returns the closest
/// hit. Ties go to the lowest segment index. Segments whose endpoints merged
/// into one node are included.
///
/// Returns `None` when the graph has no segments or `query` is not finite.
pub fn snap_to_network(graph: &WayGraph, query: Coord<f64>) -> Option<SnapResult> {
    if !(query.x.is_finite() && query.y.is_finite()) {
        return None;
    }
    let planar = graph.projector().project(query);

    let mut best: Option<(usize, f64, f64)> = None;
    for (idx, segment) in graph.segments().iter().enumerate() {
        let projection = project_point(planar, segment.projected_a, segment.projected_b);
        if best.is_none_or(|(_, _, distance)| projection.distance < distance) {
            best = Some((idx, projection.t, projection.distance));
        }
    }

    let (idx, t, _) = best?;
    let segment = &graph.segments()[idx];
    let coord = segment.point_at(t);
    Some(SnapResult {
        coord,
        segment_start: segment.a,
        segment_end: segment.b,
        segment: idx,
        line: segment.line,
        t,
        modes: segment.modes,
        distance_m: meters(query, coord),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Tolerances, WalkwayLine, WalkwayNetwork, geometry::LocalProjector,
        loading::build_way_graph,
    };

    fn at(east: f64, north: f64) -> Coord<f64> {
        LocalProjector::new(Coord { x: 31.8, y: 36.6 }).unproject(Coord { x: east, y: north })
    }

    fn graph() -> WayGraph {
        let network = WalkwayNetwork::new(vec![
            WalkwayLine::new(vec![at(0.0, 0.0), at(100.0, 0.0)], ModeSet::ALL),
            WalkwayLine::new(vec![at(0.0, 40.0), at(100.0, 40.0)], ModeSet::ALL),
        ]);
        build_way_graph(&network, &Tolerances::default())
    }

    #[test]
    fn snaps_to_nearest_segment() {
        let snap = snap_to_network(&graph(), at(30.0, 28.0)).unwrap();
        assert_eq!(snap.line, 1);
        assert!((snap.t - 0.3).abs() < 1e-6);
        assert!((snap.distance_m - 12.0).abs() < 0.1);
    }

    #[test]
    fn ties_go_to_the_lowest_segment() {
        let network = WalkwayNetwork::new(vec![
            WalkwayLine::new(vec![at(0.0, 0.0), at(100.0, 0.0)], ModeSet::ALL),
            WalkwayLine::new(vec![at(0.0, 0.0), at(100.0, 0.0)], ModeSet::ALL),
        ]);
        let graph = build_way_graph(&network, &Tolerances::default());
        let snap = snap_to_network(&graph, at(50.0, 20.0)).unwrap();
        assert_eq!(snap.segment, 0);
        assert_eq!(snap.line, 0);
    }

    #[test]
    fn beyond_the_end_clamps_to_endpoint() {
        let snap = snap_to_network(&graph(), at(-10.0, 0.0)).unwrap();
        assert_eq!(snap.t, 0.0);
        assert_eq!(snap.coord, snap.segment_start);
    }

    #[test]
    fn collapsed_segment_still_snaps() {
        let network = WalkwayNetwork::new(vec![WalkwayLine::new(
            vec![at(0.0, 0.0), at(1.0, 0.0)],
            ModeSet::ALL,
        )]);
        let graph = build_way_graph(&network, &Tolerances::default());
        let snap = snap_to_network(&graph, at(0.5, 10.0)).unwrap();
        assert_eq!(snap.segment, 0);
        assert!((snap.distance_m - 10.0).abs() < 0.1);
    }

    #[test]
    fn non_finite_query_has_no_snap() {
        assert!(snap_to_network(&graph(), Coord { x: f64::NAN, y: 36.6 }).is_none());
        assert!(snap_to_network(&graph(), Coord { x: 31.8, y: f64::INFINITY }).is_none());
    }

    #[test]
    fn empty_graph_has_no_snap() {
        let graph = build_way_graph(&WalkwayNetwork::default(), &Tolerances::default());
        assert!(snap_to_network(&graph, at(0.0, 0.0)).is_none());
    }
}
