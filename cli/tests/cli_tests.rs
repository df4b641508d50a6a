use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper function to create a directory of principal and lead fixtures
fn create_fixtures() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(
        root.join("admin.json"),
        r#"{"userId": "admin-1", "role": "admin"}"#,
    )
    .unwrap();

    fs::write(
        root.join("kam.yaml"),
        r#"userId: kam-1
role: kam
territories:
  - North
"#,
    )
    .unwrap();

    fs::write(
        root.join("partner.json"),
        r#"{"userId": "cp-1", "role": "channel_partner"}"#,
    )
    .unwrap();

    fs::write(
        root.join("ghost.json"),
        r#"{"userId": "g-1", "role": "ghost"}"#,
    )
    .unwrap();

    fs::write(
        root.join("north-lead.json"),
        r#"{"id": "lead-north", "territory": "North", "assignedTo": "cp-1"}"#,
    )
    .unwrap();

    fs::write(
        root.join("east-lead.json"),
        r#"{"id": "lead-east", "territory": "East"}"#,
    )
    .unwrap();

    fs::write(
        root.join("leads.yaml"),
        r#"- id: lead-1
  territory: North
  assignedTo: cp-1
- id: lead-2
  territory: East
- id: lead-3
  territory: North
- id: lead-4
  assignedTo: cp-2
"#,
    )
    .unwrap();

    // Sixty northern leads to exercise the selection cap
    let many: Vec<String> = (0..60)
        .map(|i| format!(r#"{{"id": "bulk-{}", "territory": "North"}}"#, i))
        .collect();
    fs::write(root.join("many.json"), format!("[{}]", many.join(","))).unwrap();

    temp_dir
}

/// Command running inside the fixture directory with a clean environment
fn accessctl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("accessctl").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("ACCESS_POLICY_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn fixture(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();

    accessctl(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("access policy"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("select"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();

    accessctl(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("accessctl"));
}

#[test]
fn test_check_allowed_text() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["check", "-p", "kam.yaml", "-r", "north-lead.json", "-a", "write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access Decision"))
        .stdout(predicate::str::contains("ALLOWED"));
}

#[test]
fn test_check_denied_exits_with_code_2() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["check", "-p", "kam.yaml", "-r", "east-lead.json", "-a", "read"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("DENIED"))
        .stdout(predicate::str::contains("TERRITORY_MISMATCH"));
}

#[test]
fn test_check_json_output() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args([
            "check",
            "-p",
            "partner.json",
            "-r",
            "north-lead.json",
            "-a",
            "delete",
            "--format",
            "json",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"hasAccess\": false"))
        .stdout(predicate::str::contains("\"reason\": \"ROLE_NOT_AUTHORIZED\""));
}

#[test]
fn test_check_admin_with_absolute_paths() {
    let dir = create_fixtures();

    accessctl(&dir)
        .arg("check")
        .arg("--principal")
        .arg(fixture(&dir, "admin.json"))
        .arg("--resource")
        .arg(fixture(&dir, "east-lead.json"))
        .args(["--action", "delete", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hasAccess: true"));
}

#[test]
fn test_check_unknown_action_is_a_denial() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["check", "-p", "admin.json", "-r", "north-lead.json", "-a", "archive"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("INVALID_ACTION"));
}

#[test]
fn test_check_unknown_role_fails() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["check", "-p", "ghost.json", "-r", "north-lead.json", "-a", "read"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown role: ghost"));
}

#[test]
fn test_check_missing_fixture_fails() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["check", "-p", "nobody.json", "-r", "north-lead.json", "-a", "read"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_filter_kam_text() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["filter", "-p", "kam.yaml", "-r", "leads.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lead-1"))
        .stdout(predicate::str::contains("lead-3"))
        .stdout(predicate::str::contains("lead-2").not())
        .stdout(predicate::str::contains("Accessible: 3 of 4"));
}

#[test]
fn test_filter_partner_json() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["filter", "-p", "partner.json", "-r", "leads.yaml", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"lead-1\""))
        .stdout(predicate::str::contains("lead-4").not());
}

#[test]
fn test_filter_rejects_unknown_action() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["filter", "-p", "kam.yaml", "-r", "leads.yaml", "-a", "archive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action: archive"));
}

#[test]
fn test_select_ids_reports_skipped() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args([
            "select",
            "-p",
            "kam.yaml",
            "-r",
            "leads.yaml",
            "-a",
            "write",
            "--ids",
            "lead-1,lead-2,lead-9",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 leads selected"))
        .stdout(predicate::str::contains("2 skipped"));
}

#[test]
fn test_select_all_is_capped() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["select", "-p", "kam.yaml", "-r", "many.json", "-a", "read", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50 leads selected (maximum)"));
}

#[test]
fn test_select_requires_ids_or_all() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["select", "-p", "kam.yaml", "-r", "leads.yaml", "-a", "read"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --ids or --all"));
}

#[test]
fn test_select_with_policy_config_flag() {
    let dir = create_fixtures();
    fs::write(fixture(&dir, "policy.yaml"), "max_bulk_selection: 5\n").unwrap();

    accessctl(&dir)
        .args([
            "--policy-config",
            "policy.yaml",
            "select",
            "-p",
            "admin.json",
            "-r",
            "many.json",
            "-a",
            "delete",
            "--all",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"capped\": true"))
        .stdout(predicate::str::contains("bulk-4"))
        .stdout(predicate::str::contains("bulk-5").not());
}

#[test]
fn test_hidden_territoryless_leads_via_env() {
    let dir = create_fixtures();
    fs::write(
        fixture(&dir, "strict.yaml"),
        "territoryless_resources_visible: false\n",
    )
    .unwrap();

    accessctl(&dir)
        .env("ACCESS_POLICY_CONFIG", fixture(&dir, "strict.yaml"))
        .args(["filter", "-p", "kam.yaml", "-r", "leads.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lead-4").not())
        .stdout(predicate::str::contains("Accessible: 2 of 4"));
}

#[test]
fn test_policy_config_from_dotenv() {
    let dir = create_fixtures();
    fs::write(fixture(&dir, "policy.yaml"), "max_bulk_selection: 7\n").unwrap();
    fs::write(fixture(&dir, ".env"), "ACCESS_POLICY_CONFIG=policy.yaml\n").unwrap();

    accessctl(&dir)
        .args(["config", "show", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_bulk_selection: 7"));
}

#[test]
fn test_invalid_policy_config_fails() {
    let dir = create_fixtures();
    fs::write(fixture(&dir, "policy.yaml"), "max_bulk_selection: 500\n").unwrap();

    accessctl(&dir)
        .args(["--policy-config", "policy.yaml", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot exceed 50"));
}

#[test]
fn test_config_show_defaults_text() {
    let dir = TempDir::new().unwrap();

    accessctl(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access Policy Configuration"))
        .stdout(predicate::str::contains("defaults"))
        .stdout(predicate::str::contains("max_bulk_selection: 50"));
}

#[test]
fn test_config_show_json() {
    let dir = TempDir::new().unwrap();

    accessctl(&dir)
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_bulk_selection\": 50"))
        .stdout(predicate::str::contains("\"territoryless_resources_visible\": true"));
}

#[test]
fn test_verbose_logs_loaded_fixtures() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["--verbose", "filter", "-p", "kam.yaml", "-r", "leads.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded principal"))
        .stderr(predicate::str::contains("Loaded resources"))
        .stderr(predicate::str::contains("using defaults"));
}

#[test]
fn test_quiet_by_default() {
    let dir = create_fixtures();

    accessctl(&dir)
        .args(["filter", "-p", "kam.yaml", "-r", "leads.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded resources").not());
}
