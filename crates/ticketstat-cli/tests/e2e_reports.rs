//! E2E tests driving the `tstat` binary against a snapshot fixture:
//! every report subcommand in text and JSON mode, config overrides, and
//! failure paths.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshot.json")
}

/// Build a Command targeting the `tstat` binary, rooted in `dir` with no
/// user-level config in reach.
fn tstat_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tstat"));
    cmd.current_dir(dir);
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("TICKETSTAT_LOG", "error");
    cmd.env("TICKETSTAT_SNAPSHOT", fixture());
    cmd.env_remove("FORMAT");
    cmd
}

fn json_stdout(dir: &Path, args: &[&str]) -> Value {
    let output = tstat_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("tstat should not crash");
    assert!(
        output.status.success(),
        "tstat failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[test]
fn trend_renders_score_row() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .args(["trend", "--origin", "2024-03-31", "--span", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "## サマリー \n|項目|2024-02-01~2024-02-29|2024-03-01~2024-03-31|\n",
        ))
        .stdout(predicate::str::contains("|合計スコア|0.00|2.50|\n"))
        .stdout(predicate::str::contains("|クローズ件数|0|2|\n"))
        .stdout(predicate::str::contains("## 詳細 \n- [[INC0001234]"));
}

#[test]
fn trend_json_keys_summaries_by_span() {
    let dir = TempDir::new().unwrap();
    let json = json_stdout(dir.path(), &["trend", "--origin", "2024-03-31", "--span", "1"]);
    assert_eq!(json["kind"], "monthly");
    let summary = &json["summaries"]["2024-03-01~2024-03-31"];
    assert_eq!(summary["num_closed"], 2);
    assert_eq!(summary["num_created"], 4);
    assert_eq!(summary["scores"]["b"], 1);
    assert_eq!(summary["scores"]["c"], 1);
    assert_eq!(summary["total_score"], 2.5);
    assert_eq!(json["details"].as_array().map(Vec::len), Some(2));
}

#[test]
fn daily_lists_stale_tickets() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .args(["daily", "--now", "2024-03-31T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("■ *7日間* 以上更新がなかったチケット一覧\n"))
        .stdout(predicate::str::contains("総未更新チケット数: 2 件\n"))
        .stdout(predicate::str::contains("経過時間:4d23h 緊急度:高 @alice\n"));
}

#[test]
fn daily_threshold_excludes_recent_updates() {
    let dir = TempDir::new().unwrap();
    // Cutoff 2024-03-14T00:00Z: only ticket 4 (updated 03-13 23:00) is stale.
    let json = json_stdout(
        dir.path(),
        &["daily", "--day-ago", "1", "--now", "2024-03-15T00:00:00Z"],
    );
    assert_eq!(json["total"], 1);
    assert_eq!(json["digest"]["kind"], "stale");
    assert_eq!(json["digest"]["days"], 1);
    assert_eq!(json["details"][0]["title"], "pod eviction question");
}

#[test]
fn backlog_lists_all_open_tickets() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .args(["backlog", "--now", "2024-03-31"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("■ 現在オープン中のチケット一覧\n"))
        .stdout(predicate::str::contains("総オープンチケット数: 2 件\n"))
        .stdout(predicate::str::contains("    CaaS-B: 1 件\n"));
}

#[test]
fn analysis_exports_csv_rows() {
    let dir = TempDir::new().unwrap();
    let output = tstat_cmd(dir.path())
        .args(["analysis", "--origin", "2024-03-31", "--span", "1"])
        .output()
        .expect("tstat should not crash");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf-8");
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("期間,Title,起票日,クローズ日"));
    // Created basis: all four tickets, oldest first.
    assert_eq!(lines.len(), 5);
    assert!(lines[4].starts_with("2024-03-01~2024-03-31,pod eviction question,2024-03-11,,open,CaaS-B,,低,通常問合せ,false,0,71,"));
}

#[test]
fn analysis_closed_basis_filters_open_tickets() {
    let dir = TempDir::new().unwrap();
    let json = json_stdout(
        dir.path(),
        &["analysis", "--origin", "2024-03-31", "--span", "1", "--basis", "closed"],
    );
    assert_eq!(json["basis"], "closed");
    let details = json["details"].as_array().expect("details array");
    assert_eq!(details.len(), 2);
    assert!(details.iter().all(|d| d["state"] == "closed"));
}

#[test]
fn keyword_tables_include_zero_rows() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .args(["keyword", "--origin", "2024-03-31", "--span", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## サマリー(全体) \n"))
        .stdout(predicate::str::contains("|keyword:Network|0|0|\n"))
        .stdout(predicate::str::contains("## サマリー(Escalationのみ計上) \n"));
}

#[test]
fn format_env_forces_json() {
    let dir = TempDir::new().unwrap();
    let output = tstat_cmd(dir.path())
        .env("FORMAT", "json")
        .args(["keyword", "--origin", "2024-03-31", "--span", "1"])
        .output()
        .expect("tstat should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(
        json["summaries"]["2024-03-01~2024-03-31"]["counts"]["keyword:Kubernetes"]["escalation"],
        1
    );
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn project_config_renames_primary_team() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".ticketstat")).unwrap();
    std::fs::write(
        dir.path().join(".ticketstat/config.toml"),
        "[report]\nprimary_team = \"CaaS-B\"\n",
    )
    .unwrap();

    tstat_cmd(dir.path())
        .args(["trend", "--origin", "2024-03-31", "--span", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("|全体CaaS-B完結率(％)|50.0|\n"));
}

#[test]
fn invalid_timezone_fails_with_code() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[report]\ntimezone = \"Asia/Tokyo\"\n").unwrap();

    tstat_cmd(dir.path())
        .args(["trend", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid timezone offset"))
        .stderr(predicate::str::contains("hint:"));
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[test]
fn missing_snapshot_file_fails_with_json_error() {
    let dir = TempDir::new().unwrap();
    let output = tstat_cmd(dir.path())
        .args(["trend", "--json", "--snapshot"])
        .arg(dir.path().join("absent.json"))
        .output()
        .expect("tstat should not crash");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "E2001");
}

#[test]
fn malformed_snapshot_is_rejected() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("broken.json");
    std::fs::write(&snapshot, r#"{"tickets": [{"id": 1, "state": "open"}]}"#).unwrap();

    tstat_cmd(dir.path())
        .args(["daily", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse snapshot"));
}

#[test]
fn closed_ticket_without_close_time_is_rejected() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("closed.json");
    std::fs::write(
        &snapshot,
        r#"{"tickets": [{"id": 5, "title": "t", "url": "u", "state": "closed",
            "created_at": "2024-03-01T00:00:00Z", "updated_at": "2024-03-02T00:00:00Z",
            "comments": 0}]}"#,
    )
    .unwrap();

    let output = tstat_cmd(dir.path())
        .args(["analysis", "--origin", "2024-03-31", "--json", "--snapshot"])
        .arg(&snapshot)
        .output()
        .expect("tstat should not crash");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "E2002");
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("ticket #5 is closed but has no closed_at"))
    );
}

#[test]
fn oversized_day_ago_fails_with_code() {
    let dir = TempDir::new().unwrap();
    let output = tstat_cmd(dir.path())
        .args(["daily", "--json", "--now", "2024-03-31", "--day-ago", "4294967295"])
        .output()
        .expect("tstat should not crash");
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "E3002");
}

#[test]
fn zero_span_is_rejected_by_argument_parsing() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .args(["trend", "--span", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--span"));
}

#[test]
fn no_snapshot_configured_is_an_error() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .env_remove("TICKETSTAT_SNAPSHOT")
        .arg("backlog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--snapshot"));
}

#[test]
fn completions_emit_script() {
    let dir = TempDir::new().unwrap();
    tstat_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tstat"));
}
