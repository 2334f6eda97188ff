mod common;

use common::{fixtures_dir, line_network, write_json};
use evroute_lib::telemetry::Telemetry;
use evroute_lib::{build_graph, load_network, load_telemetry, Error};
use tempfile::tempdir;

#[test]
fn chain_fixture_loads_and_builds() {
    let network = load_network(&fixtures_dir().join("chain_network.json")).expect("fixture loads");
    assert_eq!(network.nodes.len(), 3);
    assert_eq!(network.charging_stations.len(), 1);

    let graph = build_graph(&network, None).expect("graph builds");
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert!((graph.max_speed() - 13.89).abs() < 1e-9);

    let e1 = graph.edge_index("e1").expect("e1");
    let e2 = graph.edge_index("e2").expect("e2");
    assert_eq!(graph.connection_length(e1, e2), Some(0.0));
}

#[test]
fn telemetry_fixture_loads() {
    let telemetry =
        load_telemetry(&fixtures_dir().join("chain_telemetry.json")).expect("fixture loads");
    assert_eq!(telemetry.edge_mean_speed("e1"), Some(12.5));
    assert_eq!(telemetry.edge_mean_speed("e9"), None);
    assert_eq!(telemetry.battery("ev-low").expect("vehicle").actual_wh, 300.0);
    assert_eq!(telemetry.station_occupancy("cs1").expect("station"), 1);
}

#[test]
fn node_ids_are_indexed_in_sorted_order() {
    let dir = tempdir().expect("tempdir");
    let network = common::NetworkBuilder::new()
        .node("zulu", 0.0, 0.0)
        .node("alpha", 10.0, 0.0)
        .node("mike", 20.0, 0.0)
        .edge("z_a", "zulu", "alpha", 10.0)
        .build();
    let path = write_json(dir.path(), "network.json", &network);

    let graph = build_graph(&load_network(&path).expect("loads"), None).expect("builds");
    assert_eq!(graph.node_index("alpha"), Some(0));
    assert_eq!(graph.node_index("mike"), Some(1));
    assert_eq!(graph.node_index("zulu"), Some(2));
}

#[test]
fn station_on_unknown_edge_is_rejected() {
    let network = line_network(2)
        .station("cs9", "e9", 0.0, 0.0, 11_000.0)
        .build();
    match build_graph(&network, None) {
        Err(Error::InvalidNetwork { message }) => assert!(message.contains("e9")),
        other => panic!("expected invalid network, got {other:?}"),
    }
}

#[test]
fn edge_to_unknown_node_is_rejected() {
    let network = line_network(1).edge("e2", "n1", "nowhere", 5.0).build();
    assert!(matches!(
        build_graph(&network, None),
        Err(Error::InvalidNetwork { .. })
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.json");
    match load_network(&missing) {
        Err(Error::Read { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"nodes\": [").expect("write");
    assert!(matches!(load_telemetry(&path), Err(Error::Json(_))));
}
