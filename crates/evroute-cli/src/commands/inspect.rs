//! Inspect command handler for summarising a network snapshot.

use std::path::Path;

use anyhow::{Context, Result};

use evroute_cli::output::{NetworkInfo, OutputFormat};
use evroute_lib::{build_graph, load_network};

/// Handle the inspect subcommand.
///
/// Builds the routing graph so that structural problems in the snapshot are
/// reported the same way `plan` would report them.
pub fn handle_inspect_command(network_path: &Path, format: OutputFormat) -> Result<()> {
    let network = load_network(network_path)
        .with_context(|| format!("failed to load network from {}", network_path.display()))?;
    let graph = build_graph(&network, None).context("failed to build routing graph")?;

    let info = NetworkInfo {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        connections: network.connections.len(),
        charging_stations: graph.stations().len(),
        max_speed: graph.max_speed(),
    };
    format.render_network_info(&info)
}
