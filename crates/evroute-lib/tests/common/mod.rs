//! Common test utilities and fixture helpers.
//!
//! This module provides shared test infrastructure for integration tests,
//! including network builders and JSON fixture files.

use std::fs;
use std::path::{Path, PathBuf};

use evroute_lib::network::{ChargingStation, Connection, NetworkEdge, NetworkNode};
use evroute_lib::{
    build_graph, Graph, Network, PlannerConfig, PlanningContext, TelemetrySnapshot, Weightings,
};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Builder to create `Network` instances in tests.
#[derive(Default)]
pub struct NetworkBuilder {
    network: Network,
}

#[allow(dead_code)]
impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: &str, x: f64, y: f64) -> Self {
        self.network.nodes.push(NetworkNode {
            id: id.to_string(),
            x,
            y,
        });
        self
    }

    pub fn edge(self, id: &str, from: &str, to: &str, length: f64) -> Self {
        self.edge_with_speed(id, from, to, length, 10.0)
    }

    pub fn edge_with_speed(
        mut self,
        id: &str,
        from: &str,
        to: &str,
        length: f64,
        speed: f64,
    ) -> Self {
        self.network.edges.push(NetworkEdge {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            length,
            speed,
            allow: None,
        });
        self
    }

    pub fn connection(mut self, from: &str, to: &str, length: f64) -> Self {
        self.network.connections.push(Connection {
            from: from.to_string(),
            to: to.to_string(),
            length,
        });
        self
    }

    pub fn station(mut self, id: &str, edge: &str, x: f64, y: f64, power: f64) -> Self {
        self.network.charging_stations.push(ChargingStation {
            id: id.to_string(),
            edge: edge.to_string(),
            x,
            y,
            power,
            efficiency: 0.95,
        });
        self
    }

    pub fn build(self) -> Network {
        self.network
    }
}

/// Nodes `n0..=n{count}` on the x axis, 1000 m apart, joined by edges `e1..=e{count}`.
#[allow(dead_code)]
pub fn line_network(count: usize) -> NetworkBuilder {
    let mut builder = NetworkBuilder::new();
    for index in 0..=count {
        builder = builder.node(&format!("n{index}"), index as f64 * 1000.0, 0.0);
    }
    for index in 1..=count {
        builder = builder.edge(
            &format!("e{index}"),
            &format!("n{}", index - 1),
            &format!("n{index}"),
            1000.0,
        );
    }
    builder
}

#[allow(dead_code)]
pub fn graph(network: &Network) -> Graph {
    build_graph(network, None).expect("graph builds")
}

#[allow(dead_code)]
pub fn context<'a>(graph: &'a Graph, telemetry: &'a TelemetrySnapshot) -> PlanningContext<'a> {
    PlanningContext::new(
        graph,
        telemetry,
        "ev",
        Weightings::default(),
        PlannerConfig::default(),
    )
    .expect("context builds")
}

/// Serialize `value` as JSON into `dir/name` and return the path.
#[allow(dead_code)]
pub fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
    let path = dir.join(name);
    let raw = serde_json::to_string_pretty(value).expect("serialize fixture");
    fs::write(&path, raw).expect("write fixture");
    path
}
