use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::network::{fuzzy_matches, ChargingStation, EdgeId, Network, NodeId, Position};
use crate::spatial::StationIndex;

/// Dense node index. Indices follow lexicographic node id order, so comparing
/// indices compares identifiers.
pub type NodeIndex = usize;

/// Dense edge index in network declaration order.
pub type EdgeIndex = usize;

/// Outgoing hop from a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub node: NodeIndex,
    pub edge: EdgeIndex,
    pub length: f64,
}

/// Edge as seen by the routing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub length: f64,
    pub speed: f64,
}

/// Immutable routing view over a network snapshot for one vehicle class.
#[derive(Debug, Clone)]
pub struct Graph {
    node_ids: Arc<Vec<NodeId>>,
    node_lookup: Arc<HashMap<NodeId, NodeIndex>>,
    positions: Arc<Vec<Position>>,
    edges: Arc<Vec<GraphEdge>>,
    edge_lookup: Arc<HashMap<EdgeId, EdgeIndex>>,
    adjacency: Arc<Vec<Vec<Neighbour>>>,
    connections: Arc<HashMap<(EdgeIndex, EdgeIndex), f64>>,
    stations: Arc<Vec<ChargingStation>>,
    station_index: Arc<StationIndex>,
    max_speed: f64,
}

impl Graph {
    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of edges, including those closed to the vehicle class.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return the neighbours for a given node.
    pub fn neighbours(&self, node: NodeIndex) -> &[Neighbour] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    /// Resolve a node identifier.
    pub fn resolve_node(&self, id: &str) -> Result<NodeIndex> {
        self.node_index(id)
            .ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }

    pub fn node_id(&self, node: NodeIndex) -> &str {
        &self.node_ids[node]
    }

    pub fn node_position(&self, node: NodeIndex) -> Position {
        self.positions[node]
    }

    pub fn edge_index(&self, id: &str) -> Option<EdgeIndex> {
        self.edge_lookup.get(id).copied()
    }

    pub fn edge(&self, edge: EdgeIndex) -> &GraphEdge {
        &self.edges[edge]
    }

    /// Resolve an edge identifier, suggesting close matches when unknown.
    pub fn resolve_edge(&self, id: &str) -> Result<EdgeIndex> {
        self.edge_index(id).ok_or_else(|| Error::UnknownEdge {
            name: id.to_string(),
            suggestions: fuzzy_matches(id, self.edges.iter().map(|edge| edge.id.as_str()), 3),
        })
    }

    /// Junction connector length when leaving `from` into `to`.
    pub fn connection_length(&self, from: EdgeIndex, to: EdgeIndex) -> Option<f64> {
        self.connections.get(&(from, to)).copied()
    }

    /// Euclidean distance between two nodes.
    pub fn distance_between(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        self.positions[a].distance_to(&self.positions[b])
    }

    /// Global maximum traversal speed in m/s.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn stations(&self) -> &[ChargingStation] {
        &self.stations
    }

    /// Stations within `radius` of `point` as `(station index, distance)` pairs.
    pub fn stations_within(&self, point: Position, radius: f64) -> Vec<(usize, f64)> {
        self.station_index.within_radius(point, radius)
    }
}

/// Build the routing graph for `vehicle_class` from a network snapshot.
///
/// Edges whose allow-list excludes the class are kept for lookups but never
/// appear in adjacency. Dangling references are rejected.
pub fn build_graph(network: &Network, vehicle_class: Option<&str>) -> Result<Graph> {
    let sorted_ids: BTreeSet<&str> = network.nodes.iter().map(|node| node.id.as_str()).collect();
    if sorted_ids.len() != network.nodes.len() {
        return Err(Error::InvalidNetwork {
            message: "duplicate node identifiers".to_string(),
        });
    }

    let node_ids: Vec<NodeId> = sorted_ids.into_iter().map(str::to_string).collect();
    let node_lookup: HashMap<NodeId, NodeIndex> = node_ids
        .iter()
        .enumerate()
        .map(|(index, id)| (id.clone(), index))
        .collect();

    let mut positions = vec![Position::new(0.0, 0.0); node_ids.len()];
    for node in &network.nodes {
        positions[node_lookup[&node.id]] = node.position();
    }

    let resolve_node = |id: &str, edge: &str| {
        node_lookup
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidNetwork {
                message: format!("edge {edge} references unknown node {id}"),
            })
    };

    let mut edges = Vec::with_capacity(network.edges.len());
    let mut edge_lookup = HashMap::with_capacity(network.edges.len());
    let mut adjacency: Vec<Vec<Neighbour>> = vec![Vec::new(); node_ids.len()];

    for edge in &network.edges {
        if !edge.length.is_finite() || edge.length < 0.0 {
            return Err(Error::InvalidNetwork {
                message: format!("edge {} has invalid length {}", edge.id, edge.length),
            });
        }

        let from = resolve_node(&edge.from, &edge.id)?;
        let to = resolve_node(&edge.to, &edge.id)?;
        let index = edges.len();

        if edge_lookup.insert(edge.id.clone(), index).is_some() {
            return Err(Error::InvalidNetwork {
                message: format!("duplicate edge identifier {}", edge.id),
            });
        }

        if edge.allows(vehicle_class) {
            adjacency[from].push(Neighbour {
                node: to,
                edge: index,
                length: edge.length,
            });
        }

        edges.push(GraphEdge {
            id: edge.id.clone(),
            from,
            to,
            length: edge.length,
            speed: edge.speed,
        });
    }

    let resolve_edge = |id: &str, context: &str| {
        edge_lookup
            .get(id)
            .copied()
            .ok_or_else(|| Error::InvalidNetwork {
                message: format!("{context} references unknown edge {id}"),
            })
    };

    let mut connections = HashMap::with_capacity(network.connections.len());
    for connection in &network.connections {
        let from = resolve_edge(&connection.from, "connection")?;
        let to = resolve_edge(&connection.to, "connection")?;
        connections.insert((from, to), connection.length);
    }

    for station in &network.charging_stations {
        resolve_edge(&station.edge, &format!("charging station {}", station.id))?;
    }

    let station_index = StationIndex::build(&network.charging_stations);
    let max_speed = network.effective_max_speed();

    debug!(
        nodes = node_ids.len(),
        edges = edges.len(),
        connections = connections.len(),
        stations = network.charging_stations.len(),
        max_speed,
        "built routing graph"
    );

    Ok(Graph {
        node_ids: Arc::new(node_ids),
        node_lookup: Arc::new(node_lookup),
        positions: Arc::new(positions),
        edges: Arc::new(edges),
        edge_lookup: Arc::new(edge_lookup),
        adjacency: Arc::new(adjacency),
        connections: Arc::new(connections),
        stations: Arc::new(network.charging_stations.clone()),
        station_index: Arc::new(station_index),
        max_speed,
    })
}
