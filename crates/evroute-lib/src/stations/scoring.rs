//! Simple Additive Weighting with vector normalisation.
//!
//! Each attribute is divided by its Euclidean norm across all candidates
//! before weighting. Distance, detour, price and occupancy are "lower is
//! better" and contribute `(1 - normalised) * weight`; charge rate is "higher
//! is better" and contributes `normalised * weight`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::range::safe_div;

use super::candidates::Candidate;

/// Relative importance of each station attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weightings {
    pub distance_from_start: f64,
    pub distance_from_route_line: f64,
    pub price: f64,
    pub occupancy: f64,
    pub charge_rate: f64,
}

impl Default for Weightings {
    fn default() -> Self {
        Self {
            distance_from_start: 0.2,
            distance_from_route_line: 0.2,
            price: 0.2,
            occupancy: 0.2,
            charge_rate: 0.2,
        }
    }
}

impl Weightings {
    /// Validate that all weights are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("distance_from_start", self.distance_from_start),
            ("distance_from_route_line", self.distance_from_route_line),
            ("price", self.price),
            ("occupancy", self.occupancy),
            ("charge_rate", self.charge_rate),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeightings {
                    message: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }
}

fn norm(candidates: &[Candidate], attribute: impl Fn(&Candidate) -> f64) -> f64 {
    candidates
        .iter()
        .map(|candidate| attribute(candidate).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Score every candidate. The result is parallel to `candidates`.
pub fn score_candidates(candidates: &[Candidate], weightings: &Weightings) -> Vec<f64> {
    let distance_norm = norm(candidates, |c| c.distance_from_start);
    let line_norm = norm(candidates, |c| c.distance_from_route_line);
    let price_norm = norm(candidates, |c| c.price);
    let occupancy_norm = norm(candidates, |c| c.occupancy);
    let rate_norm = norm(candidates, |c| c.charge_rate);

    candidates
        .iter()
        .map(|c| {
            let distance = (1.0 - safe_div(c.distance_from_start, distance_norm))
                * weightings.distance_from_start;
            let detour = (1.0 - safe_div(c.distance_from_route_line, line_norm))
                * weightings.distance_from_route_line;
            let price = (1.0 - safe_div(c.price, price_norm)) * weightings.price;
            let occupancy = (1.0 - safe_div(c.occupancy, occupancy_norm)) * weightings.occupancy;
            let rate = safe_div(c.charge_rate, rate_norm) * weightings.charge_rate;

            distance + detour + price + occupancy + rate
        })
        .collect()
}

/// Index and score of the highest-scoring entry; the first maximum wins.
pub fn select_best(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((index, score)),
        }
    }
    best
}
