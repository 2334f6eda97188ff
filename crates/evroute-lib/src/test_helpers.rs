// Test-only helpers for `evroute-lib` tests
#![allow(dead_code)]

use crate::network::{ChargingStation, Connection, Network, NetworkEdge, NetworkNode};

/// Builder to create `Network` instances in tests with sensible defaults.
#[derive(Default)]
pub struct NetworkBuilder {
    network: Network,
}

impl NetworkBuilder {
    #[must_use]
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

    /// Add an edge travelled at 10 m/s.
    pub fn edge(self, id: &str, from: &str, to: &str, length: f64) -> Self {
        self.edge_with_speed(id, from, to, length, 10.0)
    }

    pub fn edge_with_speed(mut self, id: &str, from: &str, to: &str, length: f64, speed: f64) -> Self {
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

/// Three nodes in a line, 1000 m apart, with a 22 kW charger on the second edge.
pub fn chain_network() -> Network {
    NetworkBuilder::new()
        .node("s", 0.0, 0.0)
        .node("m", 1000.0, 0.0)
        .node("e", 2000.0, 0.0)
        .edge("e1", "s", "m", 1000.0)
        .edge("e2", "m", "e", 1000.0)
        .station("cs1", "e2", 1000.0, 0.0, 22_000.0)
        .build()
}
