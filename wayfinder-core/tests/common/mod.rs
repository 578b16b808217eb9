#![allow(dead_code)]

use geo::Coord;
use wayfinder_core::{
    ModeSet, RouteError, RouteRequest, RouteResult, RoutingConfig, TravelMode, WalkwayLine,
    WalkwayNetwork, compute_route, geometry::LocalProjector,
};

/// Lon/lat every synthetic network is laid out around
pub const ANCHOR: Coord<f64> = Coord {
    x: 31.8055,
    y: 36.5985,
};

/// Coordinate `east` and `north` meters from the anchor.
pub fn at(east: f64, north: f64) -> Coord<f64> {
    LocalProjector::new(ANCHOR).unproject(Coord { x: east, y: north })
}

pub fn line(points: &[(f64, f64)], modes: ModeSet) -> WalkwayLine {
    WalkwayLine::new(
        points.iter().map(|&(east, north)| at(east, north)).collect(),
        modes,
    )
}

pub fn network(lines: Vec<WalkwayLine>) -> WalkwayNetwork {
    WalkwayNetwork::new(lines)
}

pub fn route(
    network: &WalkwayNetwork,
    start: Coord<f64>,
    destination: Coord<f64>,
    profile: TravelMode,
    config: &RoutingConfig,
) -> Result<RouteResult, RouteError> {
    let request = RouteRequest::new(Some(start), Some(destination), profile).with_diagnostics();
    compute_route(network, &request, config)
}

/// P(0,0)-Q(100,0) shuttle only, plus an all-modes detour P-R(0,50)-S(100,50)-Q.
pub fn shuttle_shortcut() -> WalkwayNetwork {
    network(vec![
        line(&[(0.0, 0.0), (100.0, 0.0)], ModeSet::only(TravelMode::Shuttle)),
        line(
            &[(0.0, 0.0), (0.0, 50.0), (100.0, 50.0), (100.0, 0.0)],
            ModeSet::ALL,
        ),
    ])
}
