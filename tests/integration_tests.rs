//! Integration tests for the SRT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get an srt command isolated from the user's config and env
fn srt(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("srt").unwrap();
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("SRT_FORMAT")
        .env_remove("SRT_RUN_RATE")
        .env_remove("RUST_LOG");
    cmd
}

const MCU_TW: &str = r#"
part_number: MCU-TW
supplier: Acme Semi
category: MCU
plants:
  - country: Taiwan
    stage: both
lead_time_weeks: 20
buffer_stock:
  weeks: 2
proprietary: true
standalone: false
requalification_weeks: 14
alternative_sources: 0
unit_price: 4.0
"#;

const CAP_EU: &str = r#"
part_number: CAP-EU
supplier: Euro Passives
plants:
  - country: Germany
  - country: France
  - country: Italy
lead_time_weeks: 4
buffer_stock:
  weeks: 12
commodity: true
proprietary: false
standalone: true
unit_price: 0.02
"#;

const BOARD: &str = r#"
id: BOARD-1
name: Controller board
run_rate: 1000
lines:
  - part_number: MCU-TW
    quantity: 1
  - part_number: CAP-EU
    quantity: 10
  - part_number: MISSING-1
dependencies:
  - dependent: CAP-EU
    depends_on: MCU-TW
"#;

/// Helper to create a project with two components and one BOM
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    srt(&tmp).arg("init").assert().success();
    fs::write(tmp.path().join("components/mcu-tw.yaml"), MCU_TW).unwrap();
    fs::write(tmp.path().join("components/cap-eu.yaml"), CAP_EU).unwrap();
    fs::write(tmp.path().join("boms/board.yaml"), BOARD).unwrap();
    tmp
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    srt(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("supply-chain risk"))
        .stdout(predicate::str::contains("whatif"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    srt(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("srt"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    srt(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("srt"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();
    srt(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized SRT project"));

    assert!(tmp.path().join(".srt/config.yaml").is_file());
    for dir in ["components", "clients", "overrides", "materials", "links", "boms"] {
        assert!(tmp.path().join(dir).is_dir(), "{} missing", dir);
    }
}

#[test]
fn test_fresh_project_config_is_read_without_warnings() {
    let tmp = TempDir::new().unwrap();
    srt(&tmp).arg("init").assert().success();

    srt(&tmp)
        .args(["config", "show", "scoring.thresholds.high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("55"))
        .stderr(predicate::str::contains("Ignoring").not());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();
    srt(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Score Tests
// ============================================================================

#[test]
fn test_score_outside_project_fails() {
    let tmp = TempDir::new().unwrap();
    srt(&tmp)
        .args(["score", "MCU-TW"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an SRT project"));
}

#[test]
fn test_score_high_risk_component() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["score", "MCU-TW"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MCU-TW"))
        .stdout(predicate::str::contains("ALTO"))
        .stdout(predicate::str::contains("Mitigations"));
}

#[test]
fn test_score_low_risk_component() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["score", "cap-eu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BASSO"));
}

#[test]
fn test_score_json_output() {
    let tmp = setup_test_project();
    let json = json_output(srt(&tmp).args(["--format", "json", "score", "MCU-TW"]));

    let outcomes = json.as_array().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0]["outcome"], "assessed");
    assert_eq!(outcomes[0]["level"], "ALTO");
    assert_eq!(outcomes[0]["single_source_maximal"], true);
    let score = outcomes[0]["score"].as_f64().unwrap();
    assert!((55.0..=100.0).contains(&score));
}

#[test]
fn test_score_keeps_order_and_reports_not_found() {
    let tmp = setup_test_project();
    let output = srt(&tmp)
        .args(["--format", "tsv", "score", "CAP-EU", "NOPE", "MCU-TW"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parts: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|l| l.split('\t').next())
        .collect();
    assert_eq!(parts, vec!["CAP-EU", "NOPE", "MCU-TW"]);
    assert!(stdout.contains("NOT FOUND"));
}

#[test]
fn test_score_unknown_part_fails() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["score", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No component found"));
}

#[test]
fn test_client_override_lowers_score() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("clients/acme.yaml"),
        "id: ACME\nname: Acme Corp\ndefault_run_rate: 1000\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("overrides/acme-mcu.yaml"),
        "client_id: ACME\npart_number: MCU-TW\nlead_time_weeks: 2\nbuffer_stock:\n  weeks: 40\n",
    )
    .unwrap();

    let plain = json_output(srt(&tmp).args(["-f", "json", "score", "MCU-TW"]));
    let client = json_output(srt(&tmp).args(["-f", "json", "score", "MCU-TW", "--client", "acme"]));

    let before = plain[0]["score"].as_f64().unwrap();
    let after = client[0]["score"].as_f64().unwrap();
    assert!(after < before, "{} should be below {}", after, before);
}

#[test]
fn test_malformed_record_is_skipped() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("components/broken.yaml"), "part_number: [unclosed\n").unwrap();

    srt(&tmp)
        .args(["score", "MCU-TW"])
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped"));
}

// ============================================================================
// BOM Tests
// ============================================================================

#[test]
fn test_bom_summary() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["bom", "board"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Controller board"))
        .stdout(predicate::str::contains("NOT FOUND"))
        .stdout(predicate::str::contains("SPOF"));
}

#[test]
fn test_bom_json_analysis() {
    let tmp = setup_test_project();
    let json = json_output(srt(&tmp).args(["-f", "json", "bom", "BOARD-1"]));

    assert_eq!(json["run_rate"], 1000.0);
    assert_eq!(json["outcomes"].as_array().unwrap().len(), 3);
    assert_eq!(json["outcomes"][2]["outcome"], "not_found");
    assert_eq!(json["summary"]["not_found"], 1);
    assert_eq!(json["summary"]["component_count"], 2);
    assert_eq!(json["summary"]["spof_count"], 1);
    assert_eq!(json["graph"]["spofs"][0]["part_number"], "MCU-TW");

    // the capacitor inherits risk from the MCU it depends on
    let cap = &json["outcomes"][1];
    assert!(cap["chain"]["score"].as_f64().unwrap() > cap["score"].as_f64().unwrap());
}

#[test]
fn test_bom_from_csv() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("lines.csv"),
        "part_number,quantity,depends_on\nMCU-TW,1,\nCAP-EU,10,MCU-TW\n",
    )
    .unwrap();

    let json = json_output(srt(&tmp).args(["-f", "json", "bom", "lines.csv"]));
    assert_eq!(json["summary"]["component_count"], 2);
    assert_eq!(json["summary"]["not_found"], 0);
    assert_eq!(json["summary"]["spof_count"], 1);
}

#[test]
fn test_bom_not_found() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["bom", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Dependency Graph Tests
// ============================================================================

#[test]
fn test_deps_table() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["deps", "board"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 SPOF(s)"))
        .stdout(predicate::str::contains("Single points of failure"));
}

#[test]
fn test_deps_dot() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["deps", "board", "--graph", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph dependencies {"))
        .stdout(predicate::str::contains("\"CAP-EU\" -> \"MCU-TW\";"));
}

#[test]
fn test_deps_mermaid() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["deps", "board", "-g", "mermaid"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph LR"))
        .stdout(predicate::str::contains("n_CAP_EU --> n_MCU_TW"));
}

#[test]
fn test_deps_reports_cycles() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("boms/loop.yaml"),
        "id: LOOP\nlines:\n  - part_number: MCU-TW\n  - part_number: CAP-EU\ndependencies:\n  - dependent: MCU-TW\n    depends_on: CAP-EU\n  - dependent: CAP-EU\n    depends_on: MCU-TW\n",
    )
    .unwrap();

    srt(&tmp)
        .args(["deps", "loop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 cycle(s)"))
        .stdout(predicate::str::contains("dependency cycle"));
}

// ============================================================================
// Tier-2 Tests
// ============================================================================

#[test]
fn test_tier2_json() {
    let tmp = setup_test_project();
    let json = json_output(srt(&tmp).args(["-f", "json", "tier2", "board"]));
    assert_eq!(json["component_count"], 2);
    assert!(json["materials"].is_array());
}

// ============================================================================
// What-if Tests
// ============================================================================

#[test]
fn test_whatif_country_block() {
    let tmp = setup_test_project();
    let json = json_output(srt(&tmp).args([
        "-f",
        "json",
        "whatif",
        "board",
        "--country",
        "taiwan",
        "--weeks",
        "8",
        "--start",
        "2025-01-06",
    ]));

    assert_eq!(json["summary"]["affected_count"], 1);
    assert_eq!(json["summary"]["critical_count"], 1);
    let mcu = &json["impacted"][0];
    assert_eq!(mcu["part_number"], "MCU-TW");
    assert_eq!(mcu["weeks_lost"], 6.0);
    assert_eq!(mcu["depletion_date"], "2025-01-20");
    assert_eq!(mcu["production_lost_units"], 6000.0);
}

#[test]
fn test_whatif_predefined_scenario() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["whatif", "board", "--scenario", "taiwan-blockade", "--start", "2025-01-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Production blocked in taiwan"));
}

#[test]
fn test_whatif_unknown_scenario() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["whatif", "board", "--scenario", "meteor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scenario"));
}

#[test]
fn test_whatif_requires_a_scenario() {
    let tmp = setup_test_project();
    srt(&tmp).args(["whatif", "board"]).assert().failure();
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_show_default_threshold() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["config", "show", "scoring.thresholds.high"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("55"));
}

#[test]
fn test_project_config_changes_thresholds() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".srt/config.yaml"),
        "scoring:\n  thresholds:\n    high: 101\n",
    )
    .unwrap();

    srt(&tmp)
        .args(["config", "show", "scoring.thresholds.high"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("101"));

    // nothing can reach ALTO now
    let json = json_output(srt(&tmp).args(["-f", "json", "score", "MCU-TW"]));
    assert_eq!(json[0]["level"], "MEDIO");
}

#[test]
fn test_invalid_project_config_is_rejected() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".srt/config.yaml"),
        "scoring:\n  chain:\n    decay: 1.5\n",
    )
    .unwrap();

    srt(&tmp)
        .args(["score", "MCU-TW"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scoring configuration"));
}

#[test]
fn test_env_format_default() {
    let tmp = setup_test_project();
    let output = srt(&tmp)
        .env("SRT_FORMAT", "json")
        .args(["score", "MCU-TW"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json.is_array());
}

#[test]
fn test_config_path() {
    let tmp = setup_test_project();
    srt(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Global:"))
        .stdout(predicate::str::contains(".srt"));
}
