//! Candidate discovery around a search node.

use crate::context::PlanningContext;
use crate::error::Result;
use crate::graph::NodeIndex;

/// A charging station within reach, with the attributes used for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index into [`crate::graph::Graph::stations`].
    pub station: usize,
    /// Straight-line distance from the search node, in meters.
    pub distance_from_start: f64,
    /// Perpendicular distance from the origin→destination line, in meters.
    pub distance_from_route_line: f64,
    pub price: f64,
    pub occupancy: f64,
    /// Energy delivered per second, in Wh.
    pub charge_rate: f64,
}

/// Collect every station within `radius` of `search_node`.
///
/// `line_start` and `destination` define the straight line used to penalise
/// detours. Candidates keep the network's station declaration order.
pub fn find_candidates(
    ctx: &PlanningContext<'_>,
    search_node: NodeIndex,
    line_start: NodeIndex,
    destination: NodeIndex,
    radius: f64,
) -> Result<Vec<Candidate>> {
    let graph = ctx.graph;
    let origin = graph.node_position(search_node);
    let line_a = graph.node_position(line_start);
    let line_b = graph.node_position(destination);

    let mut in_range = graph.stations_within(origin, radius);
    in_range.sort_by_key(|(station, _)| *station);

    in_range
        .into_iter()
        .map(|(index, distance)| {
            let station = &graph.stations()[index];
            let position = station.position();
            Ok(Candidate {
                station: index,
                distance_from_start: distance,
                distance_from_route_line: position.distance_to_line(&line_a, &line_b),
                price: ctx.telemetry.station_price(&station.id)?,
                occupancy: f64::from(ctx.telemetry.station_occupancy(&station.id)?),
                charge_rate: station.charge_per_second(),
            })
        })
        .collect()
}
