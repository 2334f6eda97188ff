use std::fmt::Write;

use serde::Serialize;

use crate::context::PlanningContext;
use crate::network::{EdgeId, StationId};
use crate::routing::{PlanState, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Charging stop as presented to users, with SoC figures.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StopSummary {
    pub index: usize,
    pub station: StationId,
    pub edge: EdgeId,
    pub duration_s: u64,
    pub arrival_soc: f64,
    pub departure_soc: f64,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub vehicle: String,
    pub state: PlanState,
    pub start: Option<EdgeId>,
    pub goal: Option<EdgeId>,
    pub route: Vec<EdgeId>,
    pub length_m: f64,
    pub charging_stops: Vec<StopSummary>,
    pub total_charge_s: u64,
    pub final_range_m: f64,
    pub final_soc: f64,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary, expressing ranges as SoC of the vehicle's battery.
    pub fn from_plan(ctx: &PlanningContext<'_>, plan: &RoutePlan) -> Self {
        let soc = |range: f64| ctx.soc_after(range, 0.0);

        let charging_stops = plan
            .charging_stops
            .iter()
            .enumerate()
            .map(|(index, stop)| StopSummary {
                index: index + 1,
                station: stop.station.clone(),
                edge: stop.edge.clone(),
                duration_s: stop.duration_s,
                arrival_soc: soc(stop.arrival_range),
                departure_soc: soc(stop.departure_range),
            })
            .collect();

        Self {
            vehicle: ctx.vehicle.clone(),
            state: plan.state,
            start: plan.route.first().cloned(),
            goal: plan.route.last().cloned(),
            route: plan.route.clone(),
            length_m: plan.length,
            charging_stops,
            total_charge_s: plan.total_charge_duration(),
            final_range_m: plan.final_range,
            final_soc: soc(plan.final_range),
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn endpoint(edge: Option<&str>) -> &str {
        edge.unwrap_or("<none>")
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        if self.state == PlanState::Infeasible {
            let _ = writeln!(
                buffer,
                "Route for {}: infeasible, no charging plan reaches the destination",
                self.vehicle
            );
            return buffer;
        }

        let _ = writeln!(
            buffer,
            "Route for {}: {} -> {} ({} edges, {:.0} m, {} stops)",
            self.vehicle,
            Self::endpoint(self.start.as_deref()),
            Self::endpoint(self.goal.as_deref()),
            self.route.len(),
            self.length_m,
            self.charging_stops.len()
        );
        let _ = writeln!(buffer, "{}", self.route.join(" -> "));
        for stop in &self.charging_stops {
            let _ = writeln!(
                buffer,
                "{:>3}: charge at {} on {} for {} s ({:.1}% -> {:.1}%)",
                stop.index,
                stop.station,
                stop.edge,
                stop.duration_s,
                stop.arrival_soc,
                stop.departure_soc
            );
        }
        let _ = writeln!(
            buffer,
            "Arrival: {:.0} m range left ({:.1}% SoC), {} s charging",
            self.final_range_m, self.final_soc, self.total_charge_s
        );
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        if self.state == PlanState::Infeasible {
            let _ = writeln!(buffer, "**Route for `{}`**: _infeasible_", self.vehicle);
            return buffer;
        }

        let _ = writeln!(
            buffer,
            "**Route for `{}`**: _{} -> {}_ ({:.0} m, {} stops)",
            self.vehicle,
            Self::endpoint(self.start.as_deref()),
            Self::endpoint(self.goal.as_deref()),
            self.length_m,
            self.charging_stops.len()
        );
        for stop in &self.charging_stops {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`) {} s, {:.1}% -> {:.1}%",
                stop.index,
                stop.station,
                stop.edge,
                stop.duration_s,
                stop.arrival_soc,
                stop.departure_soc
            );
        }
        let _ = writeln!(buffer, "_Arrival SoC {:.1}%_", self.final_soc);
        buffer
    }
}
