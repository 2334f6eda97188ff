use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the route planning library.
pub type Result<T> = std::result::Result<T, Error>;

/// Category of live telemetry that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryKind {
    Vehicle,
    Station,
}

impl std::fmt::Display for TelemetryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            TelemetryKind::Vehicle => "vehicle",
            TelemetryKind::Station => "charging station",
        };
        f.write_str(value)
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an edge identifier could not be found in the network.
    #[error("unknown edge: {name}{}", format_suggestions(.suggestions))]
    UnknownEdge {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a node identifier could not be found in the network.
    #[error("unknown node: {id}")]
    UnknownNode { id: String },

    /// The live telemetry provider has no record for a vehicle or station.
    #[error("no live telemetry for {kind} {id}")]
    MissingTelemetry { kind: TelemetryKind, id: String },

    /// Raised when the network snapshot references missing nodes or edges.
    #[error("invalid network: {message}")]
    InvalidNetwork { message: String },

    /// Raised when MCDM weightings are negative or not finite.
    #[error("invalid weightings: {message}")]
    InvalidWeightings { message: String },

    /// Raised when planner parameters are out of range.
    #[error("invalid planner configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a snapshot file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
