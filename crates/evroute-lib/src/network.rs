//! Serialisable snapshot of a road network.
//!
//! The network is produced by an external provider (map conversion, simulator
//! export); this module only describes the interchange shape and loads it
//! from JSON. Routing code works against [`crate::graph::Graph`], which is
//! built from a validated `Network`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Identifier for a junction node.
pub type NodeId = String;
/// Identifier for a directed road edge.
pub type EdgeId = String;
/// Identifier for a charging station.
pub type StationId = String;

/// Planar coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Perpendicular distance from this point to the infinite line through
    /// `a` and `b`. A degenerate line (`a == b`) yields 0.
    pub fn distance_to_line(&self, a: &Self, b: &Self) -> f64 {
        let line_length = a.distance_to(b);
        let numerator = (b.x - a.x) * (a.y - self.y) - (a.x - self.x) * (b.y - a.y);
        crate::range::safe_div(numerator, line_length).abs()
    }
}

/// Junction node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl NetworkNode {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Directed road edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Length in meters.
    pub length: f64,
    /// Static speed limit in m/s.
    pub speed: f64,
    /// Vehicle classes permitted on the edge. `None` admits every class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
}

impl NetworkEdge {
    /// Whether the edge admits the given vehicle class.
    pub fn allows(&self, vehicle_class: Option<&str>) -> bool {
        match (&self.allow, vehicle_class) {
            (Some(allowed), Some(class)) => allowed.iter().any(|c| c == class),
            _ => true,
        }
    }
}

/// Internal junction connector between two consecutive edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: EdgeId,
    pub to: EdgeId,
    /// Length of the connector through the junction in meters.
    pub length: f64,
}

/// Static charging station record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub id: StationId,
    /// Edge hosting the station. Reaching the station means traversing it.
    pub edge: EdgeId,
    pub x: f64,
    pub y: f64,
    /// Charging power in W.
    pub power: f64,
    /// Charging efficiency in `0..=1`.
    pub efficiency: f64,
}

impl ChargingStation {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Energy delivered per second of charging, in Wh.
    pub fn charge_per_second(&self) -> f64 {
        self.power * self.efficiency / 3600.0
    }
}

/// Complete network snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub charging_stations: Vec<ChargingStation>,
    /// Global maximum traversal speed in m/s. Derived from the edges when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
}

impl Network {
    /// Lookup an edge by its identifier.
    pub fn edge(&self, id: &str) -> Option<&NetworkEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Global maximum speed, falling back to the fastest edge.
    pub fn effective_max_speed(&self) -> f64 {
        self.max_speed.unwrap_or_else(|| {
            self.edges
                .iter()
                .map(|edge| edge.speed)
                .fold(0.0, f64::max)
        })
    }
}

/// Return up to `limit` identifiers from `candidates` that closely resemble `name`.
pub fn fuzzy_matches<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
        .filter(|(score, _)| *score >= 0.8)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id)| id.to_string())
        .collect()
}

/// Load a network snapshot from a JSON file.
pub fn load_network(path: &Path) -> Result<Network> {
    debug!(path = %path.display(), "loading network snapshot");
    let raw = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let network: Network = serde_json::from_str(&raw)?;
    debug!(
        nodes = network.nodes.len(),
        edges = network.edges.len(),
        stations = network.charging_stations.len(),
        "network snapshot loaded"
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: &str, allow: Option<Vec<&str>>) -> NetworkEdge {
        NetworkEdge {
            id: id.to_string(),
            from: "a".to_string(),
            to: "b".to_string(),
            length: 10.0,
            speed: 13.9,
            allow: allow.map(|a| a.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn distance_to_line_is_perpendicular() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);
        let p = Position::new(5.0, 3.0);
        assert!((p.distance_to_line(&a, &b) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_line_gives_zero() {
        let a = Position::new(2.0, 2.0);
        let p = Position::new(5.0, 3.0);
        assert_eq!(p.distance_to_line(&a, &a), 0.0);
    }

    #[test]
    fn allow_list_filters_classes() {
        assert!(edge("e", None).allows(Some("evehicle")));
        assert!(edge("e", Some(vec!["evehicle"])).allows(Some("evehicle")));
        assert!(!edge("e", Some(vec!["pedestrian"])).allows(Some("evehicle")));
        assert!(edge("e", Some(vec!["pedestrian"])).allows(None));
    }

    #[test]
    fn max_speed_falls_back_to_fastest_edge() {
        let mut network = Network {
            edges: vec![edge("a", None), {
                let mut fast = edge("b", None);
                fast.speed = 27.8;
                fast
            }],
            ..Network::default()
        };
        assert_eq!(network.effective_max_speed(), 27.8);
        network.max_speed = Some(40.0);
        assert_eq!(network.effective_max_speed(), 40.0);
    }

    #[test]
    fn fuzzy_matches_rank_closest_first() {
        let matches = fuzzy_matches("gneE4", ["gneE46", "gneE53", "xyz"], 2);
        assert_eq!(matches.first().map(String::as_str), Some("gneE46"));
        assert!(!matches.contains(&"xyz".to_string()));
    }
}
