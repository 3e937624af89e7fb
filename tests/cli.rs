use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("lgamap"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn values_prints_golden_demo_data() {
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.arg("values");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("name,value\nAguata,24\nAnambra East,87\n"))
        .stdout(predicate::str::contains("Oyi,15"));
}

#[test]
fn values_with_seed_and_region_file() {
    let dir = tempfile::tempdir().unwrap();
    let regions = dir.path().join("regions.txt");
    std::fs::write(&regions, "A\nB\n").unwrap();
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.args(["values", "--seed", "x", "--regions"]).arg(&regions);
    cmd.assert()
        .success()
        .stdout(predicate::eq("name,value\nA,95\nB,1\n"));
}

#[test]
fn values_saved_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("values.json");
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.args(["values", "--out"]).arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Saved 21 values"));
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["Ihiala"], 87);
}

#[test]
fn legend_lists_five_bands() {
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.arg("legend");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0–20%"))
        .stdout(predicate::str::contains("#800026"));
}

#[test]
fn render_geojson_from_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.geojson");
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.args([
        "render",
        "--boundaries",
        "tests/fixtures/anambra_sample.geojson",
        "--out",
    ])
    .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("4 regions"));
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("Ihiala: 87"));
}

#[test]
fn render_with_missing_boundaries_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.svg");
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.args(["render", "--boundaries", "does/not/exist.geojson", "--out"])
        .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Boundaries unavailable"));
    assert!(out.exists());
}

#[test]
fn config_file_sets_seed() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("lgamap.toml");
    std::fs::write(&cfg, "[data]\nseed = \"x\"\n").unwrap();
    let mut cmd = Command::cargo_bin("lgamap").unwrap();
    cmd.arg("--config").arg(&cfg).arg("values");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Aguata,95"));
}
