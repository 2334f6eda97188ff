//! Conversions between stored battery energy, driving range and state of charge.
//!
//! A fixed energy-per-distance factor is assumed for the vehicle; no battery
//! chemistry is modelled.

/// Empirically derived distance a vehicle covers per watt-hour, in meters.
pub const METERS_PER_WATT_HOUR: f64 = 4.665999805641006;

/// Divide, returning 0 when the divisor is 0.
///
/// Stalled edges and homogeneous attribute vectors produce zero divisors in
/// normal operation; they must not abort planning.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Range model parameterised by the vehicle's meters-per-Wh factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeModel {
    meters_per_watt_hour: f64,
}

impl Default for RangeModel {
    fn default() -> Self {
        Self {
            meters_per_watt_hour: METERS_PER_WATT_HOUR,
        }
    }
}

impl RangeModel {
    /// Create a model with a custom conversion factor. The factor must be
    /// positive; [`crate::context::PlannerConfig::validate`] enforces this.
    pub fn new(meters_per_watt_hour: f64) -> Self {
        Self {
            meters_per_watt_hour,
        }
    }

    pub fn meters_per_watt_hour(&self) -> f64 {
        self.meters_per_watt_hour
    }

    /// Range in meters for a stored capacity in Wh.
    pub fn range_from_capacity(&self, capacity_wh: f64) -> f64 {
        capacity_wh * self.meters_per_watt_hour
    }

    /// Capacity in Wh needed to cover `range_m` meters.
    pub fn capacity_from_range(&self, range_m: f64) -> f64 {
        range_m / self.meters_per_watt_hour
    }

    /// Estimated state of charge (percent) after travelling `traveled_m` out of
    /// `total_range_m`, clamped to `0..=100`.
    pub fn estimate_soc(&self, total_range_m: f64, traveled_m: f64, max_capacity_wh: f64) -> f64 {
        let remaining = self.capacity_from_range(total_range_m - traveled_m);
        let soc = safe_div(remaining, max_capacity_wh) * 100.0;
        soc.clamp(0.0, 100.0)
    }
}

/// Range in meters for a stored capacity using the default vehicle factor.
pub fn range_from_capacity(capacity_wh: f64) -> f64 {
    RangeModel::default().range_from_capacity(capacity_wh)
}

/// Capacity in Wh for a range using the default vehicle factor.
pub fn capacity_from_range(range_m: f64) -> f64 {
    RangeModel::default().capacity_from_range(range_m)
}

/// State of charge estimate using the default vehicle factor.
pub fn estimate_soc(total_range_m: f64, traveled_m: f64, max_capacity_wh: f64) -> f64 {
    RangeModel::default().estimate_soc(total_range_m, traveled_m, max_capacity_wh)
}
