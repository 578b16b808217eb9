//! Segment/segment and point/segment relations in the local plane

use geo::Coord;

/// Cross products below this magnitude (in square meters) are treated as parallel.
pub const PARALLEL_EPS: f64 = 1e-9;

/// Closest point on a segment to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Parametric position along the segment, clamped to `0..=1`
    pub t: f64,
    pub point: Coord<f64>,
    /// Planar distance from the query point
    pub distance: f64,
}

pub fn project_point(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> Projection {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq
    }
    .clamp(0.0, 1.0);

    let point = a + ab * t;
    let d = p - point;
    Projection {
        t,
        point,
        distance: d.x.hypot(d.y),
    }
}

/// How two segments `a-b` and `c-d` relate in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crossing {
    /// Parallel or collinear; no unique crossing point
    Parallel,
    /// The supporting lines cross outside at least one of the segments
    Apart,
    /// Segments cross (or touch) at `t` along `a-b` and `u` along `c-d`
    At { t: f64, u: f64 },
}

pub fn crossing(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, d: Coord<f64>) -> Crossing {
    let r = b - a;
    let s = d - c;

    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() < PARALLEL_EPS {
        return Crossing::Parallel;
    }

    let w = c - a;
    let t = (w.x * s.y - w.y * s.x) / denom;
    let u = (w.x * r.y - w.y * r.x) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return Crossing::Apart;
    }

    Crossing::At { t, u }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn perpendicular_segments_cross_in_the_middle() {
        let result = crossing(c(0.0, 0.0), c(10.0, 0.0), c(5.0, -5.0), c(5.0, 5.0));
        assert_eq!(result, Crossing::At { t: 0.5, u: 0.5 });
    }

    #[test]
    fn touching_endpoint_counts_as_crossing() {
        let result = crossing(c(0.0, 0.0), c(10.0, 0.0), c(5.0, 0.0), c(5.0, 8.0));
        assert_eq!(result, Crossing::At { t: 0.5, u: 0.0 });
    }

    #[test]
    fn near_miss_is_apart() {
        let result = crossing(c(0.0, 0.0), c(10.0, 0.0), c(5.0, 1.0), c(5.0, 8.0));
        assert_eq!(result, Crossing::Apart);
    }

    #[test]
    fn collinear_is_parallel() {
        let result = crossing(c(0.0, 0.0), c(10.0, 0.0), c(12.0, 0.0), c(20.0, 0.0));
        assert_eq!(result, Crossing::Parallel);
    }

    #[test]
    fn projection_clamps_to_segment() {
        let before = project_point(c(-3.0, 4.0), c(0.0, 0.0), c(10.0, 0.0));
        assert_eq!(before.t, 0.0);
        assert!((before.distance - 5.0).abs() < 1e-12);

        let inside = project_point(c(2.5, -2.0), c(0.0, 0.0), c(10.0, 0.0));
        assert!((inside.t - 0.25).abs() < 1e-12);
        assert_eq!(inside.point, c(2.5, 0.0));
    }

    #[test]
    fn degenerate_segment_projects_to_start() {
        let p = project_point(c(3.0, 4.0), c(1.0, 1.0), c(1.0, 1.0));
        assert_eq!(p.t, 0.0);
        assert!((p.distance - 13.0_f64.sqrt()).abs() < 1e-12);
    }
}
