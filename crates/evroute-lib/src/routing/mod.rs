//! Route orchestration with charging stops.
//!
//! This module provides:
//! - [`PlanState`] - states of the planning loop
//! - [`ChargingStop`] - one stop inserted into a plan
//! - [`RoutePlan`] - planned route result
//! - [`plan_route`] - main entry point for computing routes
//!
//! # State machine
//!
//! Planning starts in [`PlanState::SeekingDirect`], which runs a range-limited
//! search toward the destination. When the vehicle cannot get there on its
//! remaining charge the planner moves to [`PlanState::SeekingViaStation`],
//! picks the best station within reach, routes to it, plans the charge and
//! resumes seeking from the far end of the station's edge. Both states end in
//! either [`PlanState::Done`] or [`PlanState::Infeasible`].
//!
//! # Example
//!
//! ```ignore
//! use evroute_lib::{build_graph, plan_route, PlanningContext, PlannerConfig, Weightings};
//!
//! let graph = build_graph(&network, None)?;
//! let ctx = PlanningContext::new(&graph, &telemetry, "ev-1", Weightings::default(), PlannerConfig::default())?;
//! let plan = plan_route(&ctx, "e1", "e9")?;
//! println!("{} stops", plan.charging_stops.len());
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::PlanningContext;
use crate::error::{Error, Result};
use crate::graph::NodeIndex;
use crate::network::{EdgeId, StationId};
use crate::path::{find_leg, RouteLeg, SearchMode};
use crate::refuel::{plan_stop, ChargePlan, StopRequest};
use crate::stations::{select_station, SelectedStation, StationSearch};

/// States of the planning loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanState {
    /// Trying to reach the destination on the current range.
    SeekingDirect,
    /// Looking for a station to extend the range.
    SeekingViaStation,
    /// A complete route was found.
    Done,
    /// No route with the available stations exists.
    Infeasible,
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PlanState::SeekingDirect => "seeking-direct",
            PlanState::SeekingViaStation => "seeking-via-station",
            PlanState::Done => "done",
            PlanState::Infeasible => "infeasible",
        };
        f.write_str(value)
    }
}

/// A charging stop inserted into a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingStop {
    pub station: StationId,
    /// Edge the station sits on.
    pub edge: EdgeId,
    pub score: f64,
    pub duration_s: u64,
    /// Virtual range on arrival, in meters.
    pub arrival_range: f64,
    /// Virtual range on departure, in meters.
    pub departure_range: f64,
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Either [`PlanState::Done`] or [`PlanState::Infeasible`].
    pub state: PlanState,
    /// Edge identifiers from the start edge's origin to the end edge's target.
    pub route: Vec<EdgeId>,
    /// Total route length including junction connectors, in meters.
    pub length: f64,
    /// Stops in the order they are reached.
    pub charging_stops: Vec<ChargingStop>,
    /// Virtual range left at the destination, in meters.
    pub final_range: f64,
}

impl RoutePlan {
    fn infeasible(initial_range: f64) -> Self {
        Self {
            state: PlanState::Infeasible,
            route: Vec::new(),
            length: 0.0,
            charging_stops: Vec::new(),
            final_range: initial_range,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.state == PlanState::Done
    }

    /// Sum of all planned dwell times, in seconds.
    pub fn total_charge_duration(&self) -> u64 {
        self.charging_stops.iter().map(|stop| stop.duration_s).sum()
    }
}

/// Stop recorded while planning, before it is rendered into a [`ChargingStop`].
#[derive(Debug, Clone)]
struct PlannedStop {
    selected: SelectedStation,
    arrival_range: f64,
    /// Rest of the station's edge, driven after charging.
    edge_length: f64,
    charge: ChargePlan,
}

/// Plan a route from `start_edge` to `end_edge` for the context's vehicle.
///
/// The route starts at the origin node of `start_edge` and ends at the target
/// node of `end_edge`. Unknown edge identifiers are reported as errors; a
/// destination that cannot be reached with the available stations yields a
/// plan in [`PlanState::Infeasible`] with an empty route and no stops.
pub fn plan_route(ctx: &PlanningContext<'_>, start_edge: &str, end_edge: &str) -> Result<RoutePlan> {
    let graph = ctx.graph;
    let origin = graph.edge(graph.resolve_edge(start_edge)?).from;
    let destination = graph.edge(graph.resolve_edge(end_edge)?).to;

    info!(
        vehicle = %ctx.vehicle,
        from = graph.node_id(origin),
        to = graph.node_id(destination),
        initial_range = ctx.initial_range(),
        "planning route"
    );

    let mut planner = Orchestrator::new(ctx, origin, destination);
    let mut state = PlanState::SeekingDirect;
    loop {
        debug!(
            %state,
            leg_start = graph.node_id(planner.leg_start),
            range = planner.range,
            "planner step"
        );
        state = match state {
            PlanState::SeekingDirect => planner.seek_direct(),
            PlanState::SeekingViaStation => planner.seek_via_station()?,
            PlanState::Done | PlanState::Infeasible => break,
        };
    }

    if state == PlanState::Infeasible {
        warn!(
            vehicle = %ctx.vehicle,
            from = graph.node_id(origin),
            to = graph.node_id(destination),
            "no feasible route with the available charging stations"
        );
        return Ok(RoutePlan::infeasible(ctx.initial_range()));
    }

    let plan = planner.finish();
    info!(
        edges = plan.route.len(),
        length = plan.length,
        stops = plan.charging_stops.len(),
        final_range = plan.final_range,
        "route planned"
    );
    Ok(plan)
}

struct Orchestrator<'c, 'a> {
    ctx: &'c PlanningContext<'a>,
    origin: NodeIndex,
    destination: NodeIndex,
    /// Node the current leg starts from.
    leg_start: NodeIndex,
    /// Virtual range at `leg_start`.
    range: f64,
    /// Result of the last range-limited search toward the destination.
    partial: Option<RouteLeg>,
    route: RouteLeg,
    stops: Vec<PlannedStop>,
    final_range: f64,
}

impl<'c, 'a> Orchestrator<'c, 'a> {
    fn new(ctx: &'c PlanningContext<'a>, origin: NodeIndex, destination: NodeIndex) -> Self {
        Self {
            ctx,
            origin,
            destination,
            leg_start: origin,
            range: ctx.initial_range(),
            partial: None,
            route: RouteLeg::empty(origin),
            stops: Vec::new(),
            final_range: 0.0,
        }
    }

    fn seek_direct(&mut self) -> PlanState {
        // Step 1: range-limited search toward the destination
        let leg = find_leg(
            self.ctx,
            self.leg_start,
            self.destination,
            self.range,
            SearchMode::TowardDestination,
        );

        match leg {
            // Step 2: destination reached on the current charge
            Some(leg) if leg.end_node() == self.destination => {
                self.final_range = match self.stops.last() {
                    Some(last) => {
                        // The stop before the final leg only needs the final goal.
                        let pending = last.edge_length + leg.length;
                        let charge = self.plan_charge(
                            last.selected.station,
                            last.arrival_range,
                            pending,
                            self.ctx.config.final_goal_percent,
                        );
                        let final_range = charge.new_range - pending;
                        if let Some(last) = self.stops.last_mut() {
                            last.charge = charge;
                        }
                        final_range
                    }
                    None => self.range - leg.length,
                };
                self.route.extend(self.ctx.graph, &leg);
                PlanState::Done
            }
            other => {
                self.partial = other;
                PlanState::SeekingViaStation
            }
        }
    }

    fn seek_via_station(&mut self) -> Result<PlanState> {
        let graph = self.ctx.graph;

        // Step 3: pick a station around where the charge runs low
        let (search_node, radius) = match self.partial.take() {
            Some(leg) if !leg.is_empty() => (leg.end_node(), self.range - leg.length),
            _ => (self.leg_start, self.range),
        };
        let search = StationSearch {
            search_node,
            radius: radius.max(0.0),
            fallback_node: self.leg_start,
            fallback_radius: self.range,
            origin: self.origin,
            destination: self.destination,
        };
        let Some(selected) = select_station(self.ctx, &search)? else {
            debug!(node = graph.node_id(search_node), radius, "no charging station within reach");
            return Ok(PlanState::Infeasible);
        };

        let station = &graph.stations()[selected.station];
        let station_edge = graph
            .edge_index(&station.edge)
            .ok_or_else(|| Error::InvalidNetwork {
                message: format!(
                    "charging station {} references unknown edge {}",
                    station.id, station.edge
                ),
            })?;
        let station_entry = graph.edge(station_edge).from;

        let Some(mut leg) = find_leg(
            self.ctx,
            self.leg_start,
            station_entry,
            self.range,
            SearchMode::TowardStation,
        ) else {
            debug!(station = %station.id, "charging station out of reach");
            return Ok(PlanState::Infeasible);
        };
        let edge_length = graph.edge(station_edge).length;
        leg.push_edge(graph, station_edge);
        let arrival_range = (self.range - (leg.length - edge_length)).max(0.0);

        // Step 4: the station's edge ends at the destination
        if leg.end_node() == self.destination {
            let charge = self.plan_charge(
                selected.station,
                arrival_range,
                edge_length,
                self.ctx.config.final_goal_percent,
            );
            self.final_range = charge.new_range - edge_length;
            self.route.extend(graph, &leg);
            self.push_stop(selected, arrival_range, edge_length, charge);
            return Ok(PlanState::Done);
        }

        // Step 5: charge fully and keep going from the end of the station's edge
        if leg.end_node() == self.leg_start {
            warn!(station = %station.id, "charging stop makes no progress");
            return Ok(PlanState::Infeasible);
        }
        if self.stops.len() >= self.ctx.config.max_charging_stops {
            warn!(
                limit = self.ctx.config.max_charging_stops,
                "charging stop limit reached"
            );
            return Ok(PlanState::Infeasible);
        }

        let charge = self.plan_charge(
            selected.station,
            arrival_range,
            edge_length,
            self.ctx.config.intermediate_goal_percent,
        );
        self.range = charge.new_range - edge_length;
        self.leg_start = leg.end_node();
        self.route.extend(graph, &leg);
        self.push_stop(selected, arrival_range, edge_length, charge);
        Ok(PlanState::SeekingDirect)
    }

    fn plan_charge(
        &self,
        station: usize,
        arrival_range: f64,
        pending_leg_length: f64,
        goal_percent: f64,
    ) -> ChargePlan {
        plan_stop(
            &self.ctx.range_model(),
            self.ctx.battery.maximum_wh,
            &self.ctx.graph.stations()[station],
            &StopRequest {
                current_range: arrival_range,
                pending_leg_length,
                goal_percent,
                safety_margin_percent: self.ctx.config.safety_margin_percent,
            },
        )
    }

    fn push_stop(
        &mut self,
        selected: SelectedStation,
        arrival_range: f64,
        edge_length: f64,
        charge: ChargePlan,
    ) {
        info!(
            station = %self.ctx.graph.stations()[selected.station].id,
            score = selected.score,
            duration_s = charge.duration_s,
            "charging stop added"
        );
        self.stops.push(PlannedStop {
            selected,
            arrival_range,
            edge_length,
            charge,
        });
    }

    fn finish(self) -> RoutePlan {
        let graph = self.ctx.graph;
        let charging_stops = self
            .stops
            .iter()
            .map(|stop| {
                let station = &graph.stations()[stop.selected.station];
                ChargingStop {
                    station: station.id.clone(),
                    edge: station.edge.clone(),
                    score: stop.selected.score,
                    duration_s: stop.charge.duration_s,
                    arrival_range: stop.arrival_range,
                    departure_range: stop.charge.new_range,
                }
            })
            .collect();

        RoutePlan {
            state: PlanState::Done,
            route: self.route.edge_ids(graph),
            length: self.route.length,
            charging_stops,
            final_range: self.final_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PlannerConfig;
    use crate::graph::build_graph;
    use crate::stations::Weightings;
    use crate::telemetry::TelemetrySnapshot;
    use crate::test_helpers::{chain_network, NetworkBuilder};

    fn telemetry(actual_wh: f64) -> TelemetrySnapshot {
        TelemetrySnapshot::new()
            .with_vehicle("ev", actual_wh, 1000.0)
            .with_station("cs1", 0, 0.25)
    }

    fn plan(network: &crate::network::Network, telemetry: &TelemetrySnapshot) -> RoutePlan {
        let graph = build_graph(network, None).expect("graph builds");
        let ctx = PlanningContext::new(
            &graph,
            telemetry,
            "ev",
            Weightings::default(),
            PlannerConfig::default(),
        )
        .expect("context");
        plan_route(&ctx, "e1", "e2").expect("planning succeeds")
    }

    #[test]
    fn sufficient_charge_goes_direct() {
        let plan = plan(&chain_network(), &telemetry(1000.0));
        assert_eq!(plan.state, PlanState::Done);
        assert_eq!(plan.route, vec!["e1", "e2"]);
        assert!(plan.charging_stops.is_empty());
        assert!((plan.length - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn low_charge_inserts_a_stop_on_the_way() {
        let plan = plan(&chain_network(), &telemetry(300.0));
        assert!(plan.is_feasible());
        assert_eq!(plan.route, vec!["e1", "e2"]);
        assert_eq!(plan.charging_stops.len(), 1);

        let stop = &plan.charging_stops[0];
        assert_eq!(stop.station, "cs1");
        assert_eq!(stop.edge, "e2");
        assert_eq!(stop.duration_s, 40);
        assert!(stop.departure_range > stop.arrival_range);
        assert!(plan.final_range > 0.0);
    }

    #[test]
    fn disconnected_destination_is_infeasible() {
        let network = NetworkBuilder::new()
            .node("s", 0.0, 0.0)
            .node("m", 1000.0, 0.0)
            .node("x", 3000.0, 0.0)
            .node("e", 4000.0, 0.0)
            .edge("e1", "s", "m", 1000.0)
            .edge("e2", "x", "e", 1000.0)
            .build();
        let plan = plan(&network, &telemetry(1000.0));
        assert_eq!(plan.state, PlanState::Infeasible);
        assert!(plan.route.is_empty());
        assert!(plan.charging_stops.is_empty());
    }

    #[test]
    fn no_station_in_reach_is_infeasible() {
        let mut network = chain_network();
        network.charging_stations.clear();
        let plan = plan(&network, &telemetry(300.0));
        assert_eq!(plan.state, PlanState::Infeasible);
        assert!(plan.route.is_empty());
    }

    #[test]
    fn unknown_edge_is_an_error() {
        let network = chain_network();
        let graph = build_graph(&network, None).expect("graph builds");
        let telemetry = telemetry(500.0);
        let ctx = PlanningContext::new(
            &graph,
            &telemetry,
            "ev",
            Weightings::default(),
            PlannerConfig::default(),
        )
        .expect("context");
        let err = plan_route(&ctx, "e1", "e3").expect_err("unknown edge");
        assert!(matches!(err, Error::UnknownEdge { .. }));
    }
}
