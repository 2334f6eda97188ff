//! Planner configuration and the per-call planning context.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::range::{RangeModel, METERS_PER_WATT_HOUR};
use crate::stations::Weightings;
use crate::telemetry::{BatteryState, Telemetry};

/// Tunable planner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// State of charge below which a destination-bound search stops early.
    pub min_soc_percent: f64,
    /// Extra capacity, as percent of the battery maximum, added to any charge
    /// needed to finish a leg.
    pub safety_margin_percent: f64,
    /// Charge goal for a stop that precedes the final leg.
    pub final_goal_percent: f64,
    /// Charge goal for a stop that precedes a further search.
    pub intermediate_goal_percent: f64,
    /// Distance per Wh for the vehicle, in meters.
    pub meters_per_watt_hour: f64,
    /// Upper bound on charging stops in a single plan.
    pub max_charging_stops: usize,
    /// Vehicle class used for edge access checks. `None` admits every edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_soc_percent: 10.0,
            safety_margin_percent: 10.0,
            final_goal_percent: 10.0,
            intermediate_goal_percent: 100.0,
            meters_per_watt_hour: METERS_PER_WATT_HOUR,
            max_charging_stops: 32,
            vehicle_class: None,
        }
    }
}

impl PlannerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let percentages = [
            ("min_soc_percent", self.min_soc_percent),
            ("safety_margin_percent", self.safety_margin_percent),
            ("final_goal_percent", self.final_goal_percent),
            ("intermediate_goal_percent", self.intermediate_goal_percent),
        ];
        for (name, value) in percentages {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be between 0 and 100, got {value}"),
                });
            }
        }

        if !self.meters_per_watt_hour.is_finite() || self.meters_per_watt_hour <= 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "meters_per_watt_hour must be finite and positive, got {}",
                    self.meters_per_watt_hour
                ),
            });
        }

        Ok(())
    }

    pub fn range_model(&self) -> RangeModel {
        RangeModel::new(self.meters_per_watt_hour)
    }
}

/// Everything a single planning call reads.
///
/// The context borrows the graph and telemetry for the duration of one call and
/// snapshots the vehicle battery up front, so plans for different vehicles
/// never share mutable state.
pub struct PlanningContext<'a> {
    pub graph: &'a Graph,
    pub telemetry: &'a dyn Telemetry,
    pub vehicle: String,
    pub battery: BatteryState,
    pub weightings: Weightings,
    pub config: PlannerConfig,
    range_model: RangeModel,
}

impl<'a> PlanningContext<'a> {
    /// Build a context for `vehicle`, reading its battery from `telemetry`.
    pub fn new(
        graph: &'a Graph,
        telemetry: &'a dyn Telemetry,
        vehicle: impl Into<String>,
        weightings: Weightings,
        config: PlannerConfig,
    ) -> Result<Self> {
        config.validate()?;
        weightings.validate()?;

        let vehicle = vehicle.into();
        let battery = telemetry.battery(&vehicle)?;
        let range_model = config.range_model();

        Ok(Self {
            graph,
            telemetry,
            vehicle,
            battery,
            weightings,
            config,
            range_model,
        })
    }

    pub fn range_model(&self) -> RangeModel {
        self.range_model
    }

    /// Range available from the vehicle's current charge, in meters.
    pub fn initial_range(&self) -> f64 {
        self.range_model.range_from_capacity(self.battery.actual_wh)
    }

    /// Range of a fully charged battery, in meters.
    pub fn full_range(&self) -> f64 {
        self.range_model.range_from_capacity(self.battery.maximum_wh)
    }

    /// Estimated SoC after `traveled` meters from a starting `range`.
    pub fn soc_after(&self, range: f64, traveled: f64) -> f64 {
        self.range_model
            .estimate_soc(range, traveled, self.battery.maximum_wh)
    }
}
