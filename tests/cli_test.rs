//! Integration tests for the gatecheck CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_cmd() -> Command {
    Command::cargo_bin("gatecheck").unwrap()
}

const OFFLINE_RULESET: &str = r#"
name = "offline"
required_files = ["README.md"]
required_folders = ["infra"]

[infra.security]
enabled = false

[deployment]
require_manifest = true
must_define_services = false
"#;

fn write_compliant_repo(dir: &TempDir) {
    fs::write(dir.path().join(".gatecheck.toml"), OFFLINE_RULESET).unwrap();
    fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();
    fs::create_dir_all(dir.path().join("infra")).unwrap();
    fs::write(dir.path().join("infra/main.bicep"), "param location string\n").unwrap();
    fs::write(dir.path().join("azure.yaml"), "name: demo\n").unwrap();
}

#[tokio::test]
async fn test_init_creates_ruleset_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".gatecheck.toml");

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--preset", "standard"])
        .assert()
        .success();

    assert!(config_path.exists(), "Ruleset file should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("name = \"standard\""));
    assert!(content.contains("README.md"));
}

#[tokio::test]
async fn test_init_with_each_preset() {
    for preset in ["standard", "partner", "minimal"] {
        let temp_dir = TempDir::new().unwrap();

        get_cmd()
            .current_dir(temp_dir.path())
            .args(["init", "--preset", preset])
            .assert()
            .success();

        let content = fs::read_to_string(temp_dir.path().join(".gatecheck.toml")).unwrap();
        assert!(
            content.contains(&format!("name = \"{}\"", preset)),
            "preset {} should be recorded",
            preset
        );
    }
}

#[tokio::test]
async fn test_init_rejects_unknown_preset() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--preset", "nonsense"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown preset"));
}

#[tokio::test]
async fn test_init_refuses_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--preset", "standard"])
        .assert()
        .success();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--preset", "minimal"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--preset", "minimal", "--force"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_audit_compliant_repository_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    write_compliant_repo(&temp_dir);

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"));
}

#[tokio::test]
async fn test_audit_with_violations_exits_one() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".gatecheck.toml"), OFFLINE_RULESET).unwrap();
    // Empty repository: README, infra, and azure.yaml all missing

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("audit")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ERRORS"));
}

#[tokio::test]
async fn test_audit_json_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    write_compliant_repo(&temp_dir);
    let output_path = temp_dir.path().join("report.json");

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["audit", "--format", "json", "--output"])
        .arg(&output_path)
        .assert()
        .success();

    let content = fs::read_to_string(&output_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["ruleset"], "offline");
    assert_eq!(report["percentage"], 100);
    assert!(report["findings"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn test_audit_with_explicit_config_path() {
    let temp_dir = TempDir::new().unwrap();
    write_compliant_repo(&temp_dir);
    let custom_path = temp_dir.path().join("custom-rules.toml");
    fs::rename(temp_dir.path().join(".gatecheck.toml"), &custom_path).unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["audit", "--config"])
        .arg(&custom_path)
        .assert()
        .success();
}

#[tokio::test]
async fn test_audit_rejects_malformed_repo_reference() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["audit", "--repo", "no-slash-here"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("owner/name"));
}

#[tokio::test]
async fn test_broken_ruleset_is_a_runtime_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".gatecheck.toml"),
        "this is not [valid toml",
    )
    .unwrap();

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("audit")
        .assert()
        .code(3);
}

#[tokio::test]
async fn test_help_lists_all_commands() {
    get_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("audit"))
                .and(predicate::str::contains("validate"))
                .and(predicate::str::contains("cancel")),
        );
}

#[tokio::test]
async fn test_validate_rejects_malformed_repo_reference() {
    get_cmd()
        .args(["validate", "--repo", "not-a-repo"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("owner/name"));
}
