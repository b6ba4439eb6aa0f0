//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("swg.json")
}

/// Command running in an empty directory against the offline fixture.
fn jiramap(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jiramap"));
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("JIRAMAP_SERVER")
        .env_remove("JIRA_USERNAME")
        .env_remove("JIRA_PASSWORD")
        .arg("--snapshot")
        .arg(fixture());
    cmd
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jiramap"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("jiramap"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jiramap"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("outline"))
        .stdout(predicate::str::contains("estimate"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_outline_writes_project_mind_map_by_default() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir).args(["outline", "-p", "SWG"]).assert().success().stdout(predicate::str::is_empty());

    let map = fs::read_to_string(dir.path().join("SWG.mm")).unwrap();
    assert!(map.starts_with("<map version=\"freeplane 1.6.0\">\n"));
    assert!(map.contains("LINK=\"https://projects.linaro.org/projects/SWG\""));
    assert!(map.contains("TEXT=\"I/SWG-1: Faster boot and smaller images\" FOLDED=\"false\""));
    assert!(map.contains("LINK=\"https://projects.linaro.org/browse/SWG-12\""));
    assert!(map.contains("TEXT=\"S/SWG-200: Drop unused services\" FOLDED=\"true\""));
    assert!(map.contains("TEXT=\"Assignee: Ann Example\""));
    assert!(map.contains("<node TEXT=\"Linaro\""));
    assert!(!map.contains("SWG-201"), "closed stories are pruned");
    assert!(!map.contains("SWG-2:"), "closed initiatives are pruned");
    assert!(!map.contains("SWG-77"), "bugs are never surfaced");
    assert!(map.trim_end().ends_with("</map>"));
}

#[test]
fn test_outline_places_orphans_on_the_left() {
    let dir = TempDir::new().unwrap();
    let output = jiramap(&dir).args(["outline", "-o", "-"]).assert().success().get_output().stdout.clone();
    let map = String::from_utf8(output).unwrap();

    let orphans = map.find("<node TEXT=\"Orphans\" POSITION=\"left\"").expect("orphans node");
    let stray = map.find("S/SWG-500: Nobody links to me").expect("orphan story");
    let via_parent_field = map.find("E/SWG-13:").expect("parent-field epic");
    assert!(stray > orphans);
    assert!(via_parent_field < orphans, "SWG-13 belongs under SWG-1");

    // In Progress sorts before To Do among SWG-1's children.
    let in_progress = map.find("E/SWG-14:").unwrap();
    let to_do = map.find("E/SWG-12:").unwrap();
    assert!(in_progress < to_do && to_do < via_parent_field);
}

#[test]
fn test_outline_text_format_goes_to_stdout() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["outline", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SWG-1: Faster boot and smaller images [Initiative]"))
        .stdout(predicate::str::contains("\nOrphans\n    SWG-500: Nobody links to me [Story]"));
    assert!(!dir.path().join("SWG.mm").exists());
}

#[test]
fn test_outline_server_comes_from_config_then_env() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("jiramap.yml"), "server: https://jira.example.org/\n").unwrap();

    jiramap(&dir)
        .args(["outline", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://jira.example.org/browse/SWG-1\""));

    jiramap(&dir)
        .env("JIRAMAP_SERVER", "https://env.example.org")
        .args(["outline", "-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://env.example.org/browse/SWG-1\""));
}

#[test]
fn test_rust_log_overrides_the_default_level() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .env("RUST_LOG", "info")
        .args(["outline", "-o", "-"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 1 open initiatives in SWG"));
}

#[test]
fn test_captured_diagnostics_carry_no_color_codes() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .arg("--verbose")
        .args(["outline", "-o", "-"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 1 open initiatives in SWG"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_outline_rejects_bad_project_key() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["outline", "-p", "SWG-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a project key"));
}

#[test]
fn test_explicit_broken_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.yml"), "page_size: [1, 2\n").unwrap();
    jiramap(&dir)
        .args(["--config", "broken.yml", "outline", "-o", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.yml"));
}

#[test]
fn test_missing_snapshot_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jiramap"));
    cmd.current_dir(dir.path())
        .args(["--snapshot", "nope.json", "outline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_estimate_prints_one_line_per_initiative() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["estimate", "-p", "SWG"])
        .assert()
        .success()
        .stdout("Initiative SWG-1 (0.00/1.50): true-next: 0.25 true-remaining: 0.75\n");
}

#[test]
fn test_estimate_respects_epic_filter() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["estimate", "--epic", "swg-14"])
        .assert()
        .success()
        .stdout("Initiative SWG-1 (0.00/1.50): true-next: 0.25 true-remaining: 0.25\n");
}

#[test]
fn test_estimate_rejects_malformed_epic_keys() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["estimate", "--epic", "SWG-1) OR project = OTHER OR key in (X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not an issue key"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_estimate_creates_ignore_list() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir).args(["estimate", "--create-ignore-list"]).assert().success();
    let list = fs::read_to_string(dir.path().join("ignore_estimate.txt")).unwrap();
    assert_eq!(list, "SWG-1 Faster boot & smaller images\n");
}

#[test]
fn test_estimate_update_honours_ignore_list() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("skip.txt"), "SWG-1 not this one\n").unwrap();
    jiramap(&dir)
        .args(["estimate", "--update", "--ignore", "skip.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("NOT updating SWG-1"));
}

#[test]
fn test_estimate_next_cycle_requires_update() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir).args(["estimate", "--next-cycle"]).assert().failure();
}

#[test]
fn test_report_groups_closed_work_by_initiative() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["report", "--show-comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}\nLead Project: LEG\n", "=".repeat(80))))
        .stdout(predicate::str::contains("Faster boot & smaller images (SWG-1)\n* No. tickets closed: 1\n"))
        .stdout(predicate::str::contains("* SWG-30: Measure boot time\n---\nNumbers are in\n\nClosing\n---\n"))
        .stdout(predicate::str::contains("SWG-201").not());
}

#[test]
fn test_stats_counts_fix_version_changes() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir)
        .args(["stats", "--key", "SWG-30", "-o", "-"])
        .assert()
        .success()
        .stdout("SWG-30, 2, 2019.06, 2019.12\n");
}

#[test]
fn test_stats_writes_stats_txt_for_the_project() {
    let dir = TempDir::new().unwrap();
    jiramap(&dir).arg("stats").assert().success();
    let stats = fs::read_to_string(dir.path().join("stats.txt")).unwrap();
    let keys: Vec<&str> = stats.lines().map(|l| l.split(',').next().unwrap_or_default()).collect();
    assert_eq!(keys, vec!["SWG-1", "SWG-2", "SWG-12", "SWG-13", "SWG-14", "SWG-30"]);
}

#[test]
fn test_completions_for_bash() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jiramap"));
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("jiramap"));
}
