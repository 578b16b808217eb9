mod common;

use common::{at, line, network, route, shuttle_shortcut};
use wayfinder_core::{
    ModeSet, RoutingConfig, Tolerances, TravelMode, build_way_graph, geometry::path_length,
    routing::snap_to_network,
};

#[test]
fn rebuilding_the_graph_is_deterministic() {
    let net = network(vec![
        line(&[(0.0, 0.0), (100.0, 0.0), (100.0, 60.0)], ModeSet::ALL),
        line(&[(50.0, -40.0), (50.0, 40.0)], ModeSet::ALL),
        line(&[(108.0, 30.0), (180.0, 30.0)], ModeSet::only(TravelMode::Bike)),
        line(&[(0.0, 5.0), (60.0, 5.0)], ModeSet::ALL),
    ]);
    let tolerances = Tolerances::default();
    let first = build_way_graph(&net, &tolerances);
    let second = build_way_graph(&net, &tolerances);

    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.edge_count(), second.edge_count());
    assert_eq!(first.stats(), second.stats());
    for (a, b) in first.segments().iter().zip(second.segments()) {
        assert_eq!(a.chain(), b.chain());
    }

    let config = RoutingConfig::default();
    let one = route(&net, at(10.0, 2.0), at(170.0, 33.0), TravelMode::Bike, &config).unwrap();
    let two = route(&net, at(10.0, 2.0), at(170.0, 33.0), TravelMode::Bike, &config).unwrap();
    assert_eq!(one.coords, two.coords);
    assert_eq!(one.main_length_m, two.main_length_m);
}

#[test]
fn reversed_query_has_the_same_length() {
    let net = shuttle_shortcut();
    let config = RoutingConfig::default();
    let (a, b) = (at(-1.0, 5.0), at(101.0, 5.0));

    for profile in [TravelMode::Walk, TravelMode::Shuttle] {
        let forward = route(&net, a, b, profile, &config).unwrap();
        let backward = route(&net, b, a, profile, &config).unwrap();
        assert!((forward.main_length_m - backward.main_length_m).abs() < 1e-6);
        assert!((forward.total_length_m - backward.total_length_m).abs() < 1e-6);
    }
}

#[test]
fn same_line_route_follows_its_vertices() {
    let net = network(vec![line(
        &[(0.0, 0.0), (40.0, 10.0), (80.0, 0.0), (120.0, 20.0)],
        ModeSet::ALL,
    )]);
    let config = RoutingConfig::default();
    let (start, destination) = (at(20.0, 0.0), at(100.0, 5.0));

    let graph = build_way_graph(&net, &config.tolerances);
    let start_snap = snap_to_network(&graph, start).unwrap();
    let destination_snap = snap_to_network(&graph, destination).unwrap();
    assert_eq!(start_snap.segment, 0);
    assert_eq!(destination_snap.segment, 2);

    let expected = path_length(&[
        start_snap.coord,
        at(40.0, 10.0),
        at(80.0, 0.0),
        destination_snap.coord,
    ]);
    let result = route(&net, start, destination, TravelMode::Walk, &config).unwrap();
    assert_eq!(result.coords.len(), 4);
    assert!((result.main_length_m - expected).abs() < 1e-6);
}

#[test]
fn total_is_main_plus_connectors() {
    let net = shuttle_shortcut();
    let config = RoutingConfig::default();
    let result = route(&net, at(-4.0, 20.0), at(60.0, 47.0), TravelMode::Bike, &config).unwrap();

    let connectors = result.start_connector.length_m + result.destination_connector.length_m;
    assert!((result.total_length_m - result.main_length_m - connectors).abs() < 1e-9);
    assert!(result.main_length_m > 0.0);
    assert_eq!(result.rendered_connectors().count(), 0);
}

#[test]
fn route_stays_on_the_network() {
    let net = shuttle_shortcut();
    let config = RoutingConfig::default();
    let result = route(&net, at(-1.0, 5.0), at(101.0, 5.0), TravelMode::Walk, &config).unwrap();

    let diagnostics = result.diagnostics.as_ref().unwrap();
    let graph = &diagnostics.graph;
    for pair in diagnostics.node_path.windows(2) {
        let edge = graph.edge_between(pair[0], pair[1]).unwrap();
        assert!(edge.allows(TravelMode::Walk));
    }
    for (node, coord) in diagnostics.node_path.iter().zip(&result.coords) {
        assert_eq!(graph.node_coord(*node), Some(*coord));
    }
}
