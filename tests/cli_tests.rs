//! Integration tests for the diaglint CLI
//!
//! These tests validate the command-line interface and end-to-end behavior:
//! exit codes, report contents, and the dynamic plugin staging flow.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Test helper to get the CLI binary with an isolated environment.
fn diaglint_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("diaglint").unwrap();
    cmd.current_dir(dir);
    for var in [
        "VERBOSE",
        "REPORT_FORMAT",
        "REPORT_FILEPATH",
        "CONSOLE_TABLE",
        "DIAGLINT_PLUGIN_DIR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

const CLEAN_PROCESS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Definitions_1" targetNamespace="http://example.com/bpmn">
  <bpmn:process id="Process_1" isExecutable="false">
    <bpmn:startEvent id="StartEvent_1"/>
    <bpmn:endEvent id="EndEvent_1"/>
    <bpmn:sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="EndEvent_1"/>
  </bpmn:process>
</bpmn:definitions>"#;

const MISSING_END_EVENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Definitions_2" targetNamespace="http://example.com/bpmn">
  <bpmn:process id="Process_1" isExecutable="false">
    <bpmn:startEvent id="StartEvent_1"/>
  </bpmn:process>
</bpmn:definitions>"#;

const MANUAL_TASK_PROCESS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Definitions_3" targetNamespace="http://example.com/bpmn">
  <bpmn:process id="Process_1" isExecutable="false">
    <bpmn:startEvent id="StartEvent_1"/>
    <bpmn:manualTask id="Manual_1" name="Stamp paper"/>
    <bpmn:endEvent id="EndEvent_1"/>
  </bpmn:process>
</bpmn:definitions>"#;

/// Write the default BPMN lintrc into `dir`.
fn write_lintrc(dir: &Path) {
    fs::write(
        dir.join(".bpmnlintrc"),
        r#"{"extends":["bpmnlint:recommended"],"rules":{}}"#,
    )
    .unwrap();
}

#[test]
fn cli_help_command() {
    let dir = tempdir().unwrap();
    diaglint_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lint BPMN and DMN diagram files"))
        .stdout(predicate::str::contains("--type"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--install-custom-deps"));
}

#[test]
fn cli_version_command() {
    let dir = tempdir().unwrap();
    diaglint_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_required_arguments_fail() {
    let dir = tempdir().unwrap();
    diaglint_cmd(dir.path()).assert().failure();

    // pattern without --type
    diaglint_cmd(dir.path()).arg("*.bpmn").assert().failure();
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("order.bpmn"), CLEAN_PROCESS).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR:"))
        .stderr(predicate::str::contains("configuration file"));
}

#[test]
fn zero_matching_files_exits_cleanly() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found"));

    assert!(!dir.path().join("lint-report.json").exists());
}

#[test]
fn clean_files_produce_an_empty_report_and_exit_zero() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("order.bpmn"), CLEAN_PROCESS).unwrap();
    fs::write(dir.path().join("shipping.bpmn"), CLEAN_PROCESS).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LINT RESULTS"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lint-report.json")).unwrap())
            .unwrap();
    assert_eq!(report["summary"]["totalFiles"], 2);
    assert_eq!(report["summary"]["totalErrors"], 0);
    assert_eq!(report["summary"]["totalWarnings"], 0);
    assert_eq!(report["issues"].as_array().unwrap().len(), 0);
}

#[test]
fn lint_errors_drive_the_exit_code_after_writing_the_report() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("incomplete.bpmn"), MISSING_END_EVENT).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("lint error"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lint-report.json")).unwrap())
            .unwrap();
    assert_eq!(report["summary"]["totalErrors"], 1);

    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["category"], "error");
    assert_eq!(issues[0]["rule"], "end-event-required");
    assert!(issues[0]["file"]
        .as_str()
        .unwrap()
        .ends_with("incomplete.bpmn"));
}

#[test]
fn report_totals_match_issue_categories() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("incomplete.bpmn"), MISSING_END_EVENT).unwrap();
    fs::write(dir.path().join("broken.bpmn"), "<bpmn:definitions><oops>").unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn"])
        .assert()
        .failure();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lint-report.json")).unwrap())
            .unwrap();
    let issues = report["issues"].as_array().unwrap();
    let errors = issues
        .iter()
        .filter(|issue| issue["category"].as_str().unwrap().contains("error"))
        .count();
    assert_eq!(report["summary"]["totalErrors"].as_u64().unwrap() as usize, errors);
    assert_eq!(
        report["summary"]["totalWarnings"].as_u64().unwrap() as usize,
        issues.len() - errors
    );
    // the unparsable file is isolated as a single internal error
    assert!(issues
        .iter()
        .any(|issue| issue["category"] == "internal-error" && issue["elementId"] == "Fatal"));
}

#[test]
fn junit_report_has_one_testcase_per_file() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("failing.bpmn"), MISSING_END_EVENT).unwrap();
    fs::write(dir.path().join("passing.bpmn"), CLEAN_PROCESS).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--format", "junit", "--output", "junit-report"])
        .assert()
        .failure()
        .code(1);

    let xml = fs::read_to_string(dir.path().join("junit-report.xml")).unwrap();
    assert_eq!(xml.matches("<testcase").count(), 2);
    assert_eq!(xml.matches("<failure").count(), 1);
    assert!(xml.contains("bpmn-lint-report"));
    assert!(xml.contains("end-event-required"));
}

#[test]
fn html_report_is_written_with_the_linter_title() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("order.bpmn"), CLEAN_PROCESS).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--format", "html"])
        .assert()
        .success();

    let html = fs::read_to_string(dir.path().join("lint-report.html")).unwrap();
    assert!(html.contains("BPMN Lint Report"));
    assert!(html.contains("No issues found."));
}

#[test]
fn report_format_env_var_selects_the_format() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("order.bpmn"), CLEAN_PROCESS).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn"])
        .env("REPORT_FORMAT", "junit")
        .assert()
        .success();

    assert!(dir.path().join("lint-report.xml").exists());
}

#[test]
fn output_stem_creates_missing_directories() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("order.bpmn"), CLEAN_PROCESS).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--output", "reports/nested/lint"])
        .assert()
        .success();

    assert!(dir.path().join("reports/nested/lint.json").exists());
}

#[test]
fn custom_rules_with_dependencies_require_the_install_flag() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("order.bpmn"), CLEAN_PROCESS).unwrap();

    // no package.json next to the rules: the default dependency set applies
    let rules_dir = dir.path().join("custom-rules");
    fs::create_dir(&rules_dir).unwrap();
    fs::write(
        rules_dir.join("no-manual-task.json"),
        r#"{"appliesTo":["bpmn:ManualTask"],"check":"forbidden"}"#,
    )
    .unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--custom-rules-path", "custom-rules"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--install-custom-deps"));

    // the run failed before enumerating files, so no report was written
    assert!(!dir.path().join("lint-report.json").exists());
}

#[test]
fn custom_rules_are_staged_applied_and_cleaned_up() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("approval.bpmn"), MANUAL_TASK_PROCESS).unwrap();

    let rules_dir = dir.path().join("custom-rules");
    fs::create_dir(&rules_dir).unwrap();
    fs::write(
        rules_dir.join("package.json"),
        r#"{"name":"my-rules","version":"1.0.0","dependencies":{}}"#,
    )
    .unwrap();
    fs::write(
        rules_dir.join("no-manual-task.json"),
        r#"{"appliesTo":["bpmn:ManualTask"],"check":"forbidden","message":"Manual tasks are not allowed"}"#,
    )
    .unwrap();

    diaglint_cmd(dir.path())
        .args([
            "*.bpmn",
            "--type",
            "bpmn",
            "--custom-rules-path",
            "custom-rules",
            "--custom-rules-severity",
            "error",
        ])
        .assert()
        .failure()
        .code(1);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lint-report.json")).unwrap())
            .unwrap();
    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["rule"], "dynamic-rules/no-manual-task");
    assert_eq!(issues[0]["category"], "error");
    assert_eq!(issues[0]["elementId"], "Manual_1");

    // staging area was cleaned: empty rules directory, default manifest restored
    let staging = dir.path().join(".diaglint/dynamic-rules");
    assert_eq!(fs::read_dir(staging.join("rules")).unwrap().count(), 0);
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(staging.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["dependencies"]["bpmnlint"], "^11.6.0");
}

#[test]
fn custom_rules_severity_warn_does_not_fail_the_run() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("approval.bpmn"), MANUAL_TASK_PROCESS).unwrap();

    let rules_dir = dir.path().join("custom-rules");
    fs::create_dir(&rules_dir).unwrap();
    fs::write(rules_dir.join("package.json"), r#"{"dependencies":{}}"#).unwrap();
    fs::write(
        rules_dir.join("no-manual-task.json"),
        r#"{"appliesTo":["bpmn:ManualTask"],"check":"forbidden"}"#,
    )
    .unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--custom-rules-path", "custom-rules"])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lint-report.json")).unwrap())
            .unwrap();
    assert_eq!(report["summary"]["totalErrors"], 0);
    assert_eq!(report["summary"]["totalWarnings"], 1);
}

#[test]
fn dmn_linting_uses_the_dmn_ruleset() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".dmnlintrc"),
        r#"{"extends":["dmnlint:recommended"],"rules":{}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("decisions.dmn"),
        r#"<definitions xmlns="https://www.omg.org/spec/DMN/20191111/MODEL/" id="Definitions_1" name="decisions">
  <decision id="Decision_1"><decisionTable id="Table_1"/></decision>
</definitions>"#,
    )
    .unwrap();

    diaglint_cmd(dir.path())
        .args(["*.dmn", "--type", "dmn"])
        .assert()
        .failure()
        .code(1);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("lint-report.json")).unwrap())
            .unwrap();
    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["rule"], "decision-name-required");
}

#[test]
fn identical_runs_write_identical_issue_content() {
    let dir = tempdir().unwrap();
    write_lintrc(dir.path());
    fs::write(dir.path().join("incomplete.bpmn"), MISSING_END_EVENT).unwrap();

    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--output", "first"])
        .assert()
        .failure();
    diaglint_cmd(dir.path())
        .args(["*.bpmn", "--type", "bpmn", "--output", "second"])
        .assert()
        .failure();

    let first = fs::read_to_string(dir.path().join("first.json")).unwrap();
    let second = fs::read_to_string(dir.path().join("second.json")).unwrap();
    assert_eq!(first, second);
}
