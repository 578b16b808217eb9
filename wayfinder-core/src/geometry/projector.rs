//! Equirectangular local plane anchored at the first network vertex.
//!
//! Only used for planar geometry (intersections, projections, envelopes).
//! Distances reported to callers and edge weights are geodesic.

use geo::Coord;

use crate::WalkwayNetwork;

const METERS_PER_DEG_LON_AT_EQUATOR: f64 = 111_320.0;
const METERS_PER_DEG_LAT: f64 = 110_540.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjector {
    anchor: Coord<f64>,
    meters_per_lon: f64,
    meters_per_lat: f64,
}

impl LocalProjector {
    pub fn new(anchor: Coord<f64>) -> Self {
        let cos_lat = anchor.y.to_radians().cos();
        let cos_lat = if cos_lat == 0.0 || !cos_lat.is_finite() {
            1.0
        } else {
            cos_lat
        };

        Self {
            anchor,
            meters_per_lon: METERS_PER_DEG_LON_AT_EQUATOR * cos_lat,
            meters_per_lat: METERS_PER_DEG_LAT,
        }
    }

    /// Anchors the plane at the first vertex of the network, or at the
    /// origin for an empty network.
    pub fn for_network(network: &WalkwayNetwork) -> Self {
        Self::new(network.anchor().unwrap_or(Coord { x: 0.0, y: 0.0 }))
    }

    pub fn anchor(&self) -> Coord<f64> {
        self.anchor
    }

    /// Lon/lat to planar meters east/north of the anchor.
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x - self.anchor.x) * self.meters_per_lon,
            y: (coord.y - self.anchor.y) * self.meters_per_lat,
        }
    }

    /// Planar meters back to lon/lat.
    pub fn unproject(&self, planar: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.anchor.x + planar.x / self.meters_per_lon,
            y: self.anchor.y + planar.y / self.meters_per_lat,
        }
    }
}
