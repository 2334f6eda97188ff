mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::inspect::handle_inspect_command;
use commands::plan::{handle_plan_command, PlanCommandArgs};
use evroute_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Range-aware EV route planning")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two edges, inserting charging stops as needed.
    Plan(PlanArgs),
    /// Print node, edge and station counts for a network snapshot.
    Inspect {
        /// Network snapshot (JSON).
        #[arg(long)]
        network: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Network snapshot (JSON).
    #[arg(long)]
    network: PathBuf,
    /// Telemetry snapshot (JSON).
    #[arg(long)]
    telemetry: PathBuf,
    /// Vehicle identifier as listed in the telemetry snapshot.
    #[arg(long)]
    vehicle: String,
    /// Edge the trip starts on.
    #[arg(long = "from")]
    from: String,
    /// Edge the trip ends on.
    #[arg(long = "to")]
    to: String,
    /// Station scoring weights (JSON).
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Planner configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Vehicle class used for edge access checks.
    #[arg(long)]
    vehicle_class: Option<String>,
}

impl From<PlanArgs> for PlanCommandArgs {
    fn from(args: PlanArgs) -> Self {
        Self {
            network: args.network,
            telemetry: args.telemetry,
            vehicle: args.vehicle,
            from: args.from,
            to: args.to,
            weights: args.weights,
            config: args.config,
            vehicle_class: args.vehicle_class,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Plan(args) => handle_plan_command(&args.into(), cli.format),
        Command::Inspect { network } => handle_inspect_command(&network, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
