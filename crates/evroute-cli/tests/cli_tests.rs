//! Integration tests for the CLI.
//!
//! These tests use `assert_cmd` to verify:
//! - plan output in text and JSON formats
//! - exit codes for infeasible plans and load failures
//! - the inspect subcommand

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("evroute-cli");
    cmd.env("RUST_LOG", "error").env("NO_COLOR", "1");
    cmd
}

fn plan_command(vehicle: &str) -> Command {
    let mut cmd = cli();
    cmd.arg("plan")
        .arg("--network")
        .arg(fixture("chain_network.json"))
        .arg("--telemetry")
        .arg(fixture("chain_telemetry.json"))
        .arg("--vehicle")
        .arg(vehicle)
        .arg("--from")
        .arg("e1")
        .arg("--to")
        .arg("e2");
    cmd
}

#[test]
fn plan_with_full_battery_goes_direct() {
    plan_command("ev-full")
        .assert()
        .success()
        .stdout(predicate::str::contains("STRT e1"))
        .stdout(predicate::str::contains("GOAL e2"))
        .stdout(predicate::str::contains("0 stops"));
}

#[test]
fn plan_with_low_battery_charges_on_the_way() {
    plan_command("ev-low")
        .assert()
        .success()
        .stdout(predicate::str::contains("CHRG cs1"))
        .stdout(predicate::str::contains("1 stops"));
}

#[test]
fn json_output_lists_route_and_stops() {
    let output = plan_command("ev-low")
        .arg("--format")
        .arg("json")
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["state"], "done");
    assert_eq!(json["route"], serde_json::json!(["e1", "e2"]));
    assert_eq!(json["charging_stops"][0]["station"], "cs1");
    assert!(json["charging_stops"][0]["duration_s"].as_u64().unwrap_or(0) > 0);
}

#[test]
fn infeasible_plan_exits_successfully() {
    plan_command("ev-empty")
        .assert()
        .success()
        .stdout(predicate::str::contains("No feasible route for ev-empty"));
}

#[test]
fn unknown_vehicle_fails() {
    plan_command("ev-ghost")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ev-ghost"));
}

#[test]
fn unknown_edge_suggests_alternatives() {
    cli()
        .arg("plan")
        .arg("--network")
        .arg(fixture("chain_network.json"))
        .arg("--telemetry")
        .arg(fixture("chain_telemetry.json"))
        .arg("--vehicle")
        .arg("ev-full")
        .arg("--from")
        .arg("e1")
        .arg("--to")
        .arg("e22")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown edge 'e22'"))
        .stderr(predicate::str::contains("e2"));
}

#[test]
fn custom_weights_and_config_are_accepted() {
    let temp = tempdir().expect("create temp dir");
    let config = temp.path().join("config.json");
    fs::write(&config, r#"{ "final_goal_percent": 50.0 }"#).expect("write config");

    plan_command("ev-low")
        .arg("--weights")
        .arg(fixture("weightings.json"))
        .arg("--config")
        .arg(&config)
        .arg("--format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("charge at cs1 on e2"));
}

#[test]
fn invalid_weights_are_rejected() {
    let temp = tempdir().expect("create temp dir");
    let weights = temp.path().join("weights.json");
    fs::write(&weights, r#"{ "price": -1.0 }"#).expect("write weights");

    plan_command("ev-low")
        .arg("--weights")
        .arg(&weights)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid weightings"));
}

#[test]
fn missing_network_file_fails() {
    cli()
        .arg("inspect")
        .arg("--network")
        .arg("/nonexistent/network.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load network"));
}

#[test]
fn inspect_reports_counts() {
    cli()
        .arg("inspect")
        .arg("--network")
        .arg(fixture("chain_network.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 3"))
        .stdout(predicate::str::contains("Charging stations: 1"))
        .stdout(predicate::str::contains("Max speed: 13.89 m/s"));
}

#[test]
fn inspect_json_format() {
    let output = cli()
        .arg("--format")
        .arg("json")
        .arg("inspect")
        .arg("--network")
        .arg(fixture("chain_network.json"))
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["edges"], 2);
    assert_eq!(json["connections"], 1);
}
