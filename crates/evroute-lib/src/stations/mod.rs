//! Charging station selection.
//!
//! - [`candidates`] - discovery of stations within a radius of a node
//! - [`scoring`] - multi-criteria scoring of those candidates
//!
//! Scores are returned alongside the candidates rather than written back to
//! the station records, so the shared graph stays untouched while planning.

pub mod candidates;
pub mod scoring;

pub use candidates::{find_candidates, Candidate};
pub use scoring::{select_best, score_candidates, Weightings};

use tracing::debug;

use crate::context::PlanningContext;
use crate::error::Result;
use crate::graph::NodeIndex;

/// Station chosen for the next stop.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedStation {
    /// Index into [`crate::graph::Graph::stations`].
    pub station: usize,
    pub score: f64,
    /// Number of candidates that were scored.
    pub considered: usize,
}

/// Where to look for stations and how far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationSearch {
    /// Node the remaining range is measured from.
    pub search_node: NodeIndex,
    /// Remaining range at `search_node`, used as the first radius.
    pub radius: f64,
    /// Start of the current leg, used for the wider fallback pass.
    pub fallback_node: NodeIndex,
    /// Range at `fallback_node`.
    pub fallback_radius: f64,
    /// Start of the whole plan; with `destination` defines the detour line.
    pub origin: NodeIndex,
    pub destination: NodeIndex,
}

/// Discover and score stations, returning the best one.
///
/// When nothing lies within `radius` of the search node, the search is
/// repeated from the fallback node with the fallback radius.
pub fn select_station(
    ctx: &PlanningContext<'_>,
    search: &StationSearch,
) -> Result<Option<SelectedStation>> {
    let mut candidates = find_candidates(
        ctx,
        search.search_node,
        search.origin,
        search.destination,
        search.radius,
    )?;

    if candidates.is_empty() {
        debug!(
            node = ctx.graph.node_id(search.fallback_node),
            radius = search.fallback_radius,
            "no stations near search node, widening search"
        );
        candidates = find_candidates(
            ctx,
            search.fallback_node,
            search.origin,
            search.destination,
            search.fallback_radius,
        )?;
    }

    let scores = score_candidates(&candidates, &ctx.weightings);
    for (candidate, score) in candidates.iter().zip(&scores) {
        debug!(
            station = %ctx.graph.stations()[candidate.station].id,
            score,
            "scored charging station"
        );
    }

    Ok(select_best(&scores).map(|(index, score)| SelectedStation {
        station: candidates[index].station,
        score,
        considered: candidates.len(),
    }))
}
