// End-to-end tests for the `addrmatch` binary.
// Run with: cargo test -p addrmatch-cli --test match_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn addrmatch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_addrmatch"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("ADDRMATCH_STATES");
    cmd.env_remove("ADDRMATCH_CONFIG");
    cmd.env("RUST_LOG", "off");
    cmd
}

// Shared with the engine's integration tests.
const VOTERS: &str = "../recon/tests/fixtures/voters.csv";
const POLLING: &str = "../recon/tests/fixtures/polling.csv";

fn engine_fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(format!("../recon/tests/fixtures/{}", name))
}

fn run(args: &[&str]) -> Output {
    addrmatch().args(args).output().expect("run addrmatch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const HEADER: &str = "voter_street,voter_apt,voter_city,voter_state,voter_zip,polling_street,\
                      polling_city,polling_state,polling_country,polling_precinct_id,requires_investigation";

// ── Happy path ──

#[test]
fn writes_report_to_stdout() {
    let output = run(&[VOTERS, POLLING]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], "101 Pine St,,Seattle,WA,98101,1 City Hall Plaza,Seattle,WA,US,0101,false");
    assert_eq!(lines[6], "9 Cedar Ln,Unit B,Fresno,CA,93650,,,,,,true");

    let err = stderr(&output);
    assert!(err.contains("6 voter rows"), "stderr: {err}");
    assert!(err.contains("1 require investigation"), "stderr: {err}");
}

#[test]
fn quiet_suppresses_summary() {
    let output = run(&[VOTERS, POLLING, "-q"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).is_empty(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).lines().count(), 7);
}

#[test]
fn json_report_written() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("run.json");
    let output = run(&[
        VOTERS,
        POLLING,
        "--report",
        report.to_str().unwrap(),
        "-q",
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["meta"]["states_source"], "bundled");
    assert_eq!(json["meta"]["voter_file"], VOTERS);
    assert_eq!(json["summary"]["voter_rows"], 6);
    assert_eq!(json["summary"]["matched"], 5);
    assert_eq!(json["summary"]["malformed_polling_rows"], 1);
    assert_eq!(json["summary"]["polling_only_discarded"], 3);
}

#[test]
fn config_selects_extended_schema_and_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("match.toml");
    std::fs::write(&config, "[output]\nschema = \"extended\"\ndelimiter = \";\"\n").unwrap();

    let output = run(&[
        VOTERS,
        POLLING,
        "--config",
        config.to_str().unwrap(),
        "-q",
    ]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    let header = out.lines().next().unwrap();
    assert!(header.contains(";polling_state;polling_state_zip;polling_country;"));
    assert_eq!(
        out.lines().nth(1).unwrap(),
        "101 Pine St;;Seattle;WA;98101;1 City Hall Plaza;Seattle;WA;98104;US;0101;false"
    );
}

#[test]
fn states_from_environment() {
    let output = addrmatch()
        .env("ADDRMATCH_STATES", engine_fixture("states-collide.csv"))
        .args([VOTERS, POLLING])
        .output()
        .unwrap();
    // the colliding table proves the env var was honoured
    assert_eq!(output.status.code(), Some(4));
}

// ── Fatal paths ──

#[test]
fn missing_voter_file_names_argument() {
    let output = run(&["../recon/tests/fixtures/nope.csv", POLLING]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("voter_address_file"), "stderr: {err}");
    assert!(err.contains("../recon/tests/fixtures/nope.csv"), "stderr: {err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn missing_polling_file_names_argument() {
    let output = run(&[VOTERS, "missing/polling.csv"]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("polling_place_file"), "stderr: {err}");
    assert!(err.contains("missing/polling.csv"), "stderr: {err}");
}

#[test]
fn missing_states_file_names_flag() {
    let output = run(&[
        VOTERS,
        POLLING,
        "--states",
        "nowhere/states.csv",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--states"));
}

#[test]
fn missing_positional_is_usage_error() {
    let output = run(&[VOTERS]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_column_is_input_error() {
    let output = run(&[VOTERS, "tests/fixtures/polling-no-precinct-column.csv"]);
    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("missing column 'Precinct'"), "stderr: {err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn colliding_state_table_is_integrity_failure() {
    let states = engine_fixture("states-collide.csv");
    let output = run(&[
        VOTERS,
        POLLING,
        "--states",
        states.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("precinct key 'nort'"), "stderr: {err}");
    // no partial output
    assert!(stdout(&output).is_empty());
}

#[test]
fn ambiguous_match_refused_by_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("match.toml");
    std::fs::write(&config, "on_ambiguous = \"error\"\n").unwrap();

    let output = run(&[
        VOTERS,
        "tests/fixtures/polling-duplicate.csv",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output).is_empty());
}

#[test]
fn ambiguous_match_expands_by_default() {
    let output = run(&[VOTERS, "tests/fixtures/polling-duplicate.csv", "-q"]);
    assert_eq!(output.status.code(), Some(0));
    // header + 6 voters + 1 extra row for the duplicated precinct
    assert_eq!(stdout(&output).lines().count(), 8);
}

#[test]
fn unwritable_json_report_leaves_stdout_empty() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("no_such_dir").join("run.json");
    let output = run(&[VOTERS, POLLING, "--report", report.to_str().unwrap(), "-q"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("cannot write"), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty(), "stdout: {}", stdout(&output));
}

#[test]
fn unreadable_config_is_usage_error() {
    // exists, but is a directory
    let dir = tempfile::tempdir().unwrap();
    let output = run(&[VOTERS, POLLING, "--config", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("cannot read"), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn invalid_config_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("match.toml");
    std::fs::write(&config, "malformed_sentinel = \"bad-value\"\n").unwrap();

    let output = run(&[
        VOTERS,
        POLLING,
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("malformed_sentinel"));
}
