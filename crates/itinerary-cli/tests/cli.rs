use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const AIRPORTS: &str = "\
name,iso_country,municipality,icao_code,iata_code,coordinates
John F Kennedy Intl,US,New York,KJFK,JFK,\"-73.7789, 40.6398\"
Heathrow Airport,GB,London,EGLL,LHR,\"-0.461941, 51.4706\"
";

const ITINERARY: &str = "\
Depart #JFK on D(2024-03-05T10:00Z)



Arrive *##EGLL at T24(2024-03-06T07:55+00:00)
";

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("input.txt"), ITINERARY).unwrap();
    fs::write(dir.path().join("airport-lookup.csv"), AIRPORTS).unwrap();
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn read_report(path: &Path) -> serde_json::Value {
    serde_json::from_str(&read(path)).unwrap()
}

#[test]
fn writes_plain_output_file() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path())
        .arg("input.txt")
        .arg("output.txt")
        .arg("airport-lookup.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Processing complete."));

    assert_eq!(
        read(&dir.path().join("output.txt")),
        "Depart John F Kennedy Intl on 05 Mar 2024\n\nArrive London at 07:55 (+00:00)"
    );
}

#[test]
fn stdout_mode_applies_styles() {
    let dir = workspace();
    fs::write(dir.path().join("user_settings.txt"), "[Airport]\nColor = 32\n").unwrap();

    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).arg("--stdout");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\x1b[32mJohn F Kennedy Intl\x1b[0m"));
}

#[test]
fn stdout_mode_plain_override() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).args(["-o", "--plain", "input.txt", "airport-lookup.csv"]);

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("Depart John F Kennedy Intl")
                .and(predicate::str::contains("\x1b[").not()),
        );
}

#[test]
fn missing_settings_still_succeeds_in_styled_mode() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).args(["-o", "--settings", "nowhere.txt"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("John F Kennedy Intl"))
        .stderr(predicate::str::contains("STYLE_SETTINGS_UNAVAILABLE"));
}

#[test]
fn missing_input_is_fatal() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).args(["absent.txt", "output.txt", "airport-lookup.csv"]);

    cmd.assert().failure().stderr(predicate::str::contains("Input not found"));
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn missing_lookup_is_fatal() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).args(["input.txt", "output.txt", "absent.csv"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Airport lookup not found"));
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn malformed_lookup_is_fatal_and_reported() {
    let dir = workspace();
    fs::write(
        dir.path().join("broken.csv"),
        "name,iso_country,municipality,icao_code,iata_code,coordinates\nNowhere,XX,,XXXX,XXX,0\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path())
        .args(["input.txt", "output.txt", "broken.csv", "--report", "report.json"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Airport lookup malformed"));
    assert!(!dir.path().join("output.txt").exists());

    let report = read_report(&dir.path().join("report.json"));
    assert_eq!(report["diagnostics"][0]["code"], "REFERENCE_TABLE_MALFORMED");
}

#[test]
fn wrong_argument_count_is_usage_error() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).arg("input.txt");

    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn report_lists_unresolved_codes() {
    let dir = workspace();
    fs::write(dir.path().join("input.txt"), "Stop at #ZZZ\nthen #ZZZ\n").unwrap();

    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path())
        .args(["input.txt", "output.txt", "airport-lookup.csv", "--report", "report.json"]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("AIRPORT_CODE_UNRESOLVED"));

    assert_eq!(read(&dir.path().join("output.txt")), "Stop at #ZZZ\nthen #ZZZ");

    let report = read_report(&dir.path().join("report.json"));
    assert_eq!(report["summary"]["warnings"], 1);
    assert_eq!(report["summary"]["lines_processed"], 2);
    assert_eq!(report["diagnostics"][0]["code"], "AIRPORT_CODE_UNRESOLVED");
    assert_eq!(report["diagnostics"][0]["occurrences"], 2);
}

#[test]
fn lookup_from_config_file() {
    let dir = workspace();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::rename(
        dir.path().join("airport-lookup.csv"),
        dir.path().join("data").join("airports.csv"),
    )
    .unwrap();
    fs::write(dir.path().join("itinerary.toml"), "lookup = \"data/airports.csv\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path()).args(["input.txt", "output.txt"]);

    cmd.assert().success();
    assert!(read(&dir.path().join("output.txt")).starts_with("Depart John F Kennedy Intl"));
}

#[test]
fn log_file_receives_warnings() {
    let dir = workspace();
    fs::write(dir.path().join("input.txt"), "#ZZZ\n").unwrap();

    let mut cmd = cargo_bin_cmd!("itinerary");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["input.txt", "output.txt", "airport-lookup.csv", "--log-file", "run.log"]);

    cmd.assert().success();
    assert!(read(&dir.path().join("run.log")).contains("airport code not found: #ZZZ"));
}
