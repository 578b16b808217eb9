use geo::{Coord, Distance, Haversine, Point};
use itertools::Itertools;

/// Great-circle distance in meters between two lon/lat coordinates.
pub fn meters(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Sum of great-circle distances between consecutive coordinates.
pub fn path_length(coords: &[Coord<f64>]) -> f64 {
    coords
        .iter()
        .tuple_windows()
        .map(|(a, b)| meters(*a, *b))
        .sum()
}

/// Linear interpolation between two coordinates, `t` clamped to `0..=1`.
pub fn interpolate(a: Coord<f64>, b: Coord<f64>, t: f64) -> Coord<f64> {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Coordinate found `distance` meters along `coords`, clamped to both ends.
pub fn point_along(coords: &[Coord<f64>], distance: f64) -> Option<Coord<f64>> {
    let first = *coords.first()?;
    if distance <= 0.0 {
        return Some(first);
    }

    let mut travelled = 0.0;
    for (a, b) in coords.iter().copied().tuple_windows() {
        let step = meters(a, b);
        if step > 0.0 && travelled + step >= distance {
            return Some(interpolate(a, b, (distance - travelled) / step));
        }
        travelled += step;
    }

    coords.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_millidegree_of_latitude() {
        let a = Coord { x: 31.8, y: 36.5 };
        let b = Coord { x: 31.8, y: 36.501 };
        let d = meters(a, b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn path_length_sums_legs() {
        let a = Coord { x: 31.8, y: 36.5 };
        let b = Coord { x: 31.8, y: 36.501 };
        let c = Coord { x: 31.801, y: 36.501 };
        let total = path_length(&[a, b, c]);
        assert!((total - (meters(a, b) + meters(b, c))).abs() < 1e-9);
        assert_eq!(path_length(&[a]), 0.0);
    }

    #[test]
    fn point_along_clamps_and_interpolates() {
        let a = Coord { x: 31.8, y: 36.5 };
        let b = Coord { x: 31.8, y: 36.502 };
        let half = meters(a, b) / 2.0;

        let mid = point_along(&[a, b], half).unwrap();
        assert!((mid.y - 36.501).abs() < 1e-9);
        assert_eq!(point_along(&[a, b], -5.0), Some(a));
        assert_eq!(point_along(&[a, b], 1e6), Some(b));
        assert_eq!(point_along(&[], 1.0), None);
    }
}
