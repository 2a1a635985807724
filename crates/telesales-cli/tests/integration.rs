#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn telesales(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("telesales").unwrap();
    cmd.current_dir(dir.path())
        .env("TELESALES_ROOT", dir.path())
        .env_remove("TELESALES_ADMIN_TOKEN");
    cmd
}

fn init_project(dir: &TempDir) {
    telesales(dir).arg("init").assert().success();
}

fn json_out(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add_agent(dir: &TempDir, name: &str) -> String {
    let agent = json_out(telesales(dir).args(["agent", "add", name]));
    agent["id"].as_str().unwrap().to_string()
}

fn add_lead(dir: &TempDir, name: &str, score: Option<f64>) -> String {
    let mut cmd = telesales(dir);
    cmd.args(["lead", "add", name]);
    if let Some(s) = score {
        cmd.args(["--score", &s.to_string()]);
    }
    let lead = json_out(&mut cmd);
    lead["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// telesales init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_database() {
    let dir = TempDir::new().unwrap();
    telesales(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    assert!(dir.path().join(".telesales").is_dir());
    assert!(dir.path().join(".telesales/config.yaml").exists());
    assert!(dir.path().join(".telesales/telesales.db").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    telesales(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept existing"));
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    telesales(&dir)
        .arg("distribute")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// agents and leads
// ---------------------------------------------------------------------------

#[test]
fn agent_deactivate_hides_from_default_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = add_agent(&dir, "Ayu");
    add_agent(&dir, "Budi");

    telesales(&dir)
        .args(["agent", "deactivate", &id])
        .assert()
        .success();

    let active = json_out(telesales(&dir).args(["agent", "list"]));
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["name"], "Budi");

    let all = json_out(telesales(&dir).args(["agent", "list", "--all"]));
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[test]
fn lead_add_rejects_out_of_range_score() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    telesales(&dir)
        .args(["lead", "add", "Citra", "--score", "1.5"])
        .assert()
        .failure();
}

#[test]
fn lead_list_shows_tier() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_lead(&dir, "Citra", Some(0.82));
    add_lead(&dir, "Dewi", None);

    telesales(&dir)
        .args(["lead", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("platinum"))
        .stdout(predicate::str::contains("silver"));
}

// ---------------------------------------------------------------------------
// telesales distribute
// ---------------------------------------------------------------------------

#[test]
fn distribute_prints_summary() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    for name in ["A1", "A2", "A3"] {
        add_agent(&dir, name);
    }
    add_lead(&dir, "L1", Some(0.9));
    add_lead(&dir, "L2", Some(0.6));
    add_lead(&dir, "L3", Some(0.3));
    add_lead(&dir, "L4", Some(0.85));

    let out = json_out(telesales(&dir).arg("distribute"));
    assert_eq!(out["message"], "leads distributed");
    let summary = &out["summary"];
    assert_eq!(summary["total_leads"], 4);
    assert_eq!(summary["total_agents"], 3);
    assert_eq!(summary["distribution"]["platinum"], 2);
    assert_eq!(summary["distribution"]["gold"], 1);
    assert_eq!(summary["distribution"]["silver"], 1);
    assert_eq!(summary["assigned"], 4);

    let rows = json_out(telesales(&dir).arg("assignments"));
    assert_eq!(rows.as_array().unwrap().len(), 4);
}

#[test]
fn distribute_without_agents_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_lead(&dir, "L1", Some(0.9));

    telesales(&dir)
        .arg("distribute")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active agents"));
}

#[test]
fn distribute_without_leads_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_agent(&dir, "Ayu");

    telesales(&dir)
        .arg("distribute")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no eligible leads"));
}

#[test]
fn closed_leads_are_not_distributed() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_agent(&dir, "Ayu");
    let closed = add_lead(&dir, "L1", Some(0.9));
    add_lead(&dir, "L2", Some(0.1));
    telesales(&dir)
        .args(["lead", "close", &closed])
        .assert()
        .success();

    let out = json_out(telesales(&dir).arg("distribute"));
    assert_eq!(out["summary"]["total_leads"], 1);
    assert_eq!(out["summary"]["distribution"]["platinum"], 0);
}

#[test]
fn lead_history_keeps_previous_runs() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_agent(&dir, "Ayu");
    let lead = add_lead(&dir, "L1", Some(0.7));

    telesales(&dir).arg("distribute").assert().success();
    telesales(&dir).arg("distribute").assert().success();

    let history = json_out(telesales(&dir).args(["assignments", "--lead", &lead]));
    let rows = history.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|r| r["is_active"] == true).count(), 1);
}

#[test]
fn assignments_filter_by_agent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let first = add_agent(&dir, "Ayu");
    add_agent(&dir, "Budi");
    for i in 0..3 {
        add_lead(&dir, &format!("L{i}"), Some(0.9));
    }
    telesales(&dir).arg("distribute").assert().success();

    let rows = json_out(telesales(&dir).args(["assignments", "--agent", &first]));
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["agent_id"] == first.as_str()));
}

// ---------------------------------------------------------------------------
// telesales config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_warns_about_missing_token() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    telesales(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("admin_token"));
}

#[test]
fn config_validate_fails_on_inverted_tiers() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let path = dir.path().join(".telesales/config.yaml");
    let yaml = std::fs::read_to_string(&path).unwrap();
    let yaml = yaml.replace("gold: 0.5", "gold: 0.9");
    std::fs::write(&path, yaml).unwrap();

    telesales(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("must be below"));

    telesales(&dir).arg("distribute").assert().failure();
}

#[test]
fn config_show_never_prints_admin_token() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".telesales/config.yaml"),
        "version: 1\nserver:\n  port: 3141\n  admin_token: s3cret\n",
    )
    .unwrap();

    telesales(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token set"))
        .stdout(predicate::str::contains("s3cret").not());

    let output = telesales(&dir)
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("s3cret"), "{stdout}");
    let shown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["server"]["admin_token"], "***");
}
