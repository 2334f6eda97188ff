//! Live telemetry seam.
//!
//! Planning reads a snapshot of simulator state: edge speeds, the vehicle's
//! battery and the load on each charging station. [`Telemetry`] abstracts the
//! provider; [`TelemetrySnapshot`] is a plain in-memory implementation that
//! can also be loaded from JSON.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result, TelemetryKind};

/// Battery state of a vehicle in Wh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryState {
    pub actual_wh: f64,
    pub maximum_wh: f64,
}

/// Live state of a charging station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationState {
    /// Vehicles currently charging.
    pub occupancy: u32,
    /// Current market price per kWh.
    pub price: f64,
}

/// Provider of live simulation state.
pub trait Telemetry {
    /// Current mean speed on an edge in m/s, `None` when no reading exists.
    fn edge_mean_speed(&self, edge: &str) -> Option<f64>;

    /// Actual and maximum battery capacity of a vehicle.
    fn battery(&self, vehicle: &str) -> Result<BatteryState>;

    /// Number of vehicles charging at a station.
    fn station_occupancy(&self, station: &str) -> Result<u32>;

    /// Current price at a station.
    fn station_price(&self, station: &str) -> Result<f64>;
}

/// In-memory telemetry snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(default)]
    pub edge_speeds: HashMap<String, f64>,
    #[serde(default)]
    pub vehicles: HashMap<String, BatteryState>,
    #[serde(default)]
    pub stations: HashMap<String, StationState>,
}

impl TelemetrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_speed(mut self, edge: impl Into<String>, speed: f64) -> Self {
        self.edge_speeds.insert(edge.into(), speed);
        self
    }

    pub fn with_vehicle(mut self, vehicle: impl Into<String>, actual_wh: f64, maximum_wh: f64) -> Self {
        self.vehicles.insert(
            vehicle.into(),
            BatteryState {
                actual_wh,
                maximum_wh,
            },
        );
        self
    }

    pub fn with_station(mut self, station: impl Into<String>, occupancy: u32, price: f64) -> Self {
        self.stations
            .insert(station.into(), StationState { occupancy, price });
        self
    }

    fn station(&self, station: &str) -> Result<&StationState> {
        self.stations
            .get(station)
            .ok_or_else(|| Error::MissingTelemetry {
                kind: TelemetryKind::Station,
                id: station.to_string(),
            })
    }
}

impl Telemetry for TelemetrySnapshot {
    fn edge_mean_speed(&self, edge: &str) -> Option<f64> {
        self.edge_speeds.get(edge).copied()
    }

    fn battery(&self, vehicle: &str) -> Result<BatteryState> {
        self.vehicles
            .get(vehicle)
            .copied()
            .ok_or_else(|| Error::MissingTelemetry {
                kind: TelemetryKind::Vehicle,
                id: vehicle.to_string(),
            })
    }

    fn station_occupancy(&self, station: &str) -> Result<u32> {
        self.station(station).map(|state| state.occupancy)
    }

    fn station_price(&self, station: &str) -> Result<f64> {
        self.station(station).map(|state| state.price)
    }
}

/// Load a telemetry snapshot from a JSON file.
pub fn load_telemetry(path: &Path) -> Result<TelemetrySnapshot> {
    debug!(path = %path.display(), "loading telemetry snapshot");
    let raw = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}
