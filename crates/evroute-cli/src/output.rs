//! Output formatting for plan rendering.
//!
//! This module provides formatters for rendering plan summaries and network
//! overviews in the supported output formats.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use evroute_lib::{PlanState, RouteRenderMode, RouteSummary};

use crate::terminal::{format_distance, format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tagged, colored listing of every edge and stop.
    #[default]
    Text,
    /// Compact plain text without colors.
    Plain,
    /// Markdown-flavoured summary.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

/// Counts reported by the `inspect` subcommand.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkInfo {
    pub nodes: usize,
    pub edges: usize,
    pub connections: usize,
    pub charging_stations: usize,
    pub max_speed: f64,
}

impl OutputFormat {
    /// Write a plan summary to stdout.
    pub fn render_plan(self, summary: &RouteSummary) -> anyhow::Result<()> {
        let rendered = match self {
            OutputFormat::Text => format_plan_text(summary, ColorPalette::detect()),
            OutputFormat::Plain => summary.render(RouteRenderMode::PlainText),
            OutputFormat::Rich => summary.render(RouteRenderMode::RichText),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(summary)?;
                json.push('\n');
                json
            }
        };
        write_stdout(&rendered)
    }

    /// Write network counts to stdout.
    pub fn render_network_info(self, info: &NetworkInfo) -> anyhow::Result<()> {
        let rendered = match self {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(info)?;
                json.push('\n');
                json
            }
            _ => format!(
                "Nodes: {}\nEdges: {}\nConnections: {}\nCharging stations: {}\nMax speed: {:.2} m/s\n",
                format_with_separators(info.nodes as u64),
                format_with_separators(info.edges as u64),
                format_with_separators(info.connections as u64),
                format_with_separators(info.charging_stations as u64),
                info.max_speed
            ),
        };
        write_stdout(&rendered)
    }
}

fn write_stdout(rendered: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(rendered.as_bytes())?;
    handle.flush()?;
    Ok(())
}

/// Render the tagged listing used by [`OutputFormat::Text`].
///
/// Every edge gets a four-letter tag: `STRT` for the first, `GOAL` for the
/// last, `DRIV` otherwise. Charging stops appear as `CHRG` lines right before
/// the edge their station sits on.
pub fn format_plan_text(summary: &RouteSummary, palette: ColorPalette) -> String {
    let p = palette;
    let mut buffer = String::new();

    if summary.state == PlanState::Infeasible {
        let _ = writeln!(
            buffer,
            "{}No feasible route for {}{}: no charging plan reaches the destination.",
            p.alert, summary.vehicle, p.reset
        );
        return buffer;
    }

    let _ = writeln!(
        buffer,
        "Route for {}{}{} ({}, {} stops)",
        p.edge,
        summary.vehicle,
        p.reset,
        format_distance(summary.length_m),
        summary.charging_stops.len()
    );

    let mut stops = summary.charging_stops.iter().peekable();
    let last = summary.route.len().saturating_sub(1);
    for (index, edge) in summary.route.iter().enumerate() {
        while let Some(stop) = stops.next_if(|stop| stop.edge == *edge) {
            let _ = writeln!(
                buffer,
                " {}CHRG{} {} {}({} s, {}{:.1}%{} -> {}{:.1}%{}){}",
                p.tag_charge,
                p.reset,
                stop.station,
                p.muted,
                format_with_separators(stop.duration_s),
                p.soc(stop.arrival_soc),
                stop.arrival_soc,
                p.muted,
                p.soc(stop.departure_soc),
                stop.departure_soc,
                p.muted,
                p.reset
            );
        }

        let tag = if index == 0 {
            (p.tag_start, "STRT")
        } else if index == last {
            (p.tag_goal, "GOAL")
        } else {
            (p.tag_drive, "DRIV")
        };
        let _ = writeln!(
            buffer,
            " {}{}{} {}{}{}",
            tag.0, tag.1, p.reset, p.edge, edge, p.reset
        );
    }

    let _ = writeln!(
        buffer,
        "{}Arrival SoC:{} {}{:.1}%{} {}({} left, {} s charging){}",
        p.muted,
        p.reset,
        p.soc(summary.final_soc),
        summary.final_soc,
        p.reset,
        p.muted,
        format_distance(summary.final_range_m),
        format_with_separators(summary.total_charge_s),
        p.reset
    );
    buffer
}
