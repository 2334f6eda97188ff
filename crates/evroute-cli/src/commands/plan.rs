//! Plan command handler for computing routes with charging stops.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use evroute_lib::{
    build_graph, load_network, load_telemetry, plan_route, Error as PlanError, PlannerConfig,
    PlanningContext, RouteSummary, Weightings,
};
use evroute_cli::output::OutputFormat;

/// Arguments for the plan command.
#[derive(Debug, Clone)]
pub struct PlanCommandArgs {
    pub network: PathBuf,
    pub telemetry: PathBuf,
    pub vehicle: String,
    /// Edge the trip starts on.
    pub from: String,
    /// Edge the trip ends on.
    pub to: String,
    pub weights: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Overrides the vehicle class from the config file.
    pub vehicle_class: Option<String>,
}

/// Handle the plan subcommand.
///
/// Infeasible plans are rendered like any other result; only load, validation
/// and telemetry failures are errors.
pub fn handle_plan_command(args: &PlanCommandArgs, format: OutputFormat) -> Result<()> {
    let network = load_network(&args.network)
        .with_context(|| format!("failed to load network from {}", args.network.display()))?;
    let telemetry = load_telemetry(&args.telemetry).with_context(|| {
        format!("failed to load telemetry from {}", args.telemetry.display())
    })?;

    let weightings: Weightings = match &args.weights {
        Some(path) => read_json(path, "weightings")?,
        None => Weightings::default(),
    };
    let mut config: PlannerConfig = match &args.config {
        Some(path) => read_json(path, "planner configuration")?,
        None => PlannerConfig::default(),
    };
    if let Some(class) = &args.vehicle_class {
        config.vehicle_class = Some(class.clone());
    }

    let graph = build_graph(&network, config.vehicle_class.as_deref())
        .context("failed to build routing graph")?;
    let ctx = PlanningContext::new(&graph, &telemetry, args.vehicle.as_str(), weightings, config)
        .with_context(|| format!("cannot plan for vehicle {}", args.vehicle))?;

    let plan = plan_route(&ctx, &args.from, &args.to).map_err(handle_plan_failure)?;
    let summary = RouteSummary::from_plan(&ctx, &plan);
    format.render_plan(&summary)
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {what} from {}", path.display()))
}

fn handle_plan_failure(err: PlanError) -> anyhow::Error {
    match err {
        PlanError::UnknownEdge { name, suggestions } => {
            anyhow::anyhow!(format_unknown_edge_message(&name, &suggestions))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_edge_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown edge '{}'.", name);
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean '{only}'?")),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Did you mean one of: {}?", joined));
        }
    }
    message
}
