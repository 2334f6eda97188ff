//! Charge duration planning at a selected station.

use serde::Serialize;
use tracing::{debug, warn};

use crate::network::ChargingStation;
use crate::range::{safe_div, RangeModel};

/// Inputs describing one charging stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopRequest {
    /// Virtual range when arriving at the station, in meters.
    pub current_range: f64,
    /// Distance still to cover on the leg the stop serves, in meters.
    pub pending_leg_length: f64,
    /// Minimum charge to reach, as percent of the battery maximum.
    pub goal_percent: f64,
    /// Extra capacity on top of the leg's needs, as percent of the maximum.
    pub safety_margin_percent: f64,
}

/// Outcome of planning a stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargePlan {
    /// Dwell time in whole seconds.
    pub duration_s: u64,
    /// Energy added during the stop, in Wh.
    pub charged_wh: f64,
    /// Virtual range on departure, in meters.
    pub new_range: f64,
}

/// Decide how long to charge at `station`.
///
/// The dwell time covers whichever is larger: the energy missing to finish the
/// pending leg plus the safety margin, or the energy still missing to reach the
/// goal percentage from the arrival charge. Durations round up to whole seconds. The recharged capacity
/// never exceeds `max_capacity_wh`.
pub fn plan_stop(
    range_model: &RangeModel,
    max_capacity_wh: f64,
    station: &ChargingStation,
    request: &StopRequest,
) -> ChargePlan {
    let rate = station.charge_per_second();
    let current_range = request.current_range.max(0.0);

    let current_capacity = range_model.capacity_from_range(current_range);

    let range_needed = (request.pending_leg_length - current_range).max(0.0);
    let capacity_needed = range_model.capacity_from_range(range_needed)
        + max_capacity_wh * request.safety_margin_percent / 100.0;
    // Only the part of the goal not already on board needs charging.
    let capacity_goal =
        (max_capacity_wh * request.goal_percent / 100.0 - current_capacity).max(0.0);

    if rate <= 0.0 {
        warn!(
            station = %station.id,
            "charging station delivers no energy, planning zero dwell time"
        );
    }

    let duration_to_needed = seconds_for(capacity_needed, rate);
    let duration_to_goal = seconds_for(capacity_goal, rate);
    let duration_s = duration_to_needed.max(duration_to_goal);

    let new_capacity = (current_capacity + duration_s as f64 * rate).min(max_capacity_wh);
    let charged_wh = (new_capacity - current_capacity).max(0.0);
    let new_range = range_model.range_from_capacity(new_capacity.max(current_capacity));

    debug!(
        station = %station.id,
        goal_percent = request.goal_percent,
        duration_s,
        charged_wh,
        new_range,
        "planned charging stop"
    );

    ChargePlan {
        duration_s,
        charged_wh,
        new_range,
    }
}

fn seconds_for(capacity_wh: f64, rate: f64) -> u64 {
    let seconds = safe_div(capacity_wh, rate).ceil();
    if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    }
}
