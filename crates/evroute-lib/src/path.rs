use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::context::PlanningContext;
use crate::graph::{EdgeIndex, Graph, NodeIndex};
use crate::network::EdgeId;
use crate::range::safe_div;

/// What the search is heading for, which decides how range limits apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Heading for the final destination. The search stops early once the
    /// estimated SoC at the frontier drops below the configured minimum and
    /// returns the partial path reached so far.
    TowardDestination,
    /// Heading for a charging station. Any frontier node beyond the available
    /// range makes the whole search infeasible.
    TowardStation,
}

/// Contiguous sequence of edges between two planning waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub start: NodeIndex,
    pub end: NodeIndex,
    pub edges: Vec<EdgeIndex>,
    /// Edge lengths plus junction connector lengths, in meters.
    pub length: f64,
}

impl RouteLeg {
    /// A leg that has not left `node`.
    pub fn empty(node: NodeIndex) -> Self {
        Self {
            start: node,
            end: node,
            edges: Vec::new(),
            length: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Node the leg currently ends at.
    pub fn end_node(&self) -> NodeIndex {
        self.end
    }

    pub fn last_edge(&self) -> Option<EdgeIndex> {
        self.edges.last().copied()
    }

    /// Append an edge, adding the junction connector from the current last edge.
    pub fn push_edge(&mut self, graph: &Graph, edge: EdgeIndex) {
        if let Some(last) = self.last_edge() {
            self.length += graph.connection_length(last, edge).unwrap_or(0.0);
        }
        let record = graph.edge(edge);
        self.length += record.length;
        self.end = record.to;
        self.edges.push(edge);
    }

    /// Concatenate `other` onto this leg.
    pub fn extend(&mut self, graph: &Graph, other: &RouteLeg) {
        for &edge in &other.edges {
            self.push_edge(graph, edge);
        }
    }

    /// Edge identifiers in traversal order.
    pub fn edge_ids(&self, graph: &Graph) -> Vec<EdgeId> {
        self.edges
            .iter()
            .map(|&edge| graph.edge(edge).id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct SearchRecord {
    cost: f64,
    length: f64,
    parent: Option<(NodeIndex, EdgeIndex)>,
}

/// Run a range-aware A* search from `start` to `goal`.
///
/// Cost is cumulative travel time (`length / mean speed`, 0 on stalled edges);
/// the heuristic is straight-line distance over the network's maximum speed.
/// Returns `None` when the goal is unreachable or, in
/// [`SearchMode::TowardStation`], when the frontier exceeds `available_range`.
pub fn find_leg(
    ctx: &PlanningContext<'_>,
    start: NodeIndex,
    goal: NodeIndex,
    available_range: f64,
    mode: SearchMode,
) -> Option<RouteLeg> {
    let graph = ctx.graph;
    if start == goal {
        return Some(RouteLeg::empty(start));
    }

    let mut records: HashMap<NodeIndex, SearchRecord> = HashMap::new();
    let mut queue = BinaryHeap::new();

    records.insert(
        start,
        SearchRecord {
            cost: 0.0,
            length: 0.0,
            parent: None,
        },
    );
    queue.push(AStarEntry::new(start, 0.0, heuristic(graph, start, goal)));

    while let Some(entry) = queue.pop() {
        let current = entry.node;
        let record = records[&current];
        if entry.cost.0 > record.cost {
            continue;
        }

        match mode {
            SearchMode::TowardStation => {
                if record.length > available_range {
                    debug!(
                        node = graph.node_id(current),
                        length = record.length,
                        available_range,
                        "station search exceeded available range"
                    );
                    return None;
                }
                if current == goal {
                    return Some(reconstruct_leg(graph, &records, start, current));
                }
            }
            SearchMode::TowardDestination => {
                if current == goal {
                    return Some(reconstruct_leg(graph, &records, start, current));
                }
                let soc = ctx.soc_after(available_range, record.length);
                if soc < ctx.config.min_soc_percent {
                    debug!(
                        node = graph.node_id(current),
                        length = record.length,
                        soc,
                        "state of charge below minimum, returning partial leg"
                    );
                    return Some(reconstruct_leg(graph, &records, start, current));
                }
            }
        }

        for hop in graph.neighbours(current) {
            let edge = graph.edge(hop.edge);
            let speed = ctx
                .telemetry
                .edge_mean_speed(&edge.id)
                .unwrap_or(edge.speed);
            let tentative = record.cost + safe_div(hop.length, speed);

            let improves = records
                .get(&hop.node)
                .map_or(true, |known| tentative < known.cost);
            if improves {
                records.insert(
                    hop.node,
                    SearchRecord {
                        cost: tentative,
                        length: record.length + hop.length,
                        parent: Some((current, hop.edge)),
                    },
                );
                queue.push(AStarEntry::new(
                    hop.node,
                    tentative,
                    heuristic(graph, hop.node, goal),
                ));
            }
        }
    }

    None
}

/// Straight-line travel time at the network's top speed; never overestimates.
fn heuristic(graph: &Graph, from: NodeIndex, to: NodeIndex) -> f64 {
    safe_div(graph.distance_between(from, to), graph.max_speed())
}

fn reconstruct_leg(
    graph: &Graph,
    records: &HashMap<NodeIndex, SearchRecord>,
    start: NodeIndex,
    end: NodeIndex,
) -> RouteLeg {
    let mut edges = Vec::new();
    let mut current = end;
    while let Some((parent, edge)) = records.get(&current).and_then(|record| record.parent) {
        edges.push(edge);
        current = parent;
    }
    edges.reverse();

    let mut leg = RouteLeg::empty(start);
    for edge in edges {
        leg.push_edge(graph, edge);
    }
    leg
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeIndex,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeIndex, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, then the
        // lowest node index.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
