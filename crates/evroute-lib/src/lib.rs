//! EV routing library entry points.
//!
//! This crate loads road network and telemetry snapshots, builds an indexed
//! graph, and plans routes for electric vehicles that insert charging stops
//! whenever the remaining range falls short. Higher-level consumers (the CLI)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod context;
pub mod error;
pub mod graph;
pub mod network;
pub mod output;
pub mod path;
pub mod range;
pub mod refuel;
pub mod routing;
pub mod spatial;
pub mod stations;
pub mod telemetry;

#[cfg(test)]
mod test_helpers;

pub use context::{PlannerConfig, PlanningContext};
pub use error::{Error, Result};
pub use graph::{build_graph, Graph};
pub use network::{load_network, ChargingStation, Network};
pub use output::{RouteRenderMode, RouteSummary};
pub use path::{find_leg, RouteLeg, SearchMode};
pub use range::{RangeModel, METERS_PER_WATT_HOUR};
pub use refuel::{plan_stop, ChargePlan, StopRequest};
pub use routing::{plan_route, ChargingStop, PlanState, RoutePlan};
pub use spatial::StationIndex;
pub use stations::{select_station, Candidate, SelectedStation, StationSearch, Weightings};
pub use telemetry::{load_telemetry, BatteryState, Telemetry, TelemetrySnapshot};
