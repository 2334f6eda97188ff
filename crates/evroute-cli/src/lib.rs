//! EV route planner CLI library.
//!
//! This crate provides command-line interface utilities for the EV route
//! planner, including terminal styling and output formatting.

pub mod output;
pub mod terminal;
