//! Integration tests for the `ibadah` CLI.
//!
//! Each test creates a temp data directory, runs `ibadah` as a subprocess,
//! and verifies stdout and/or the stored JSON documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

/// Get the path to the built `ibadah` binary.
fn ibadah_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("ibadah");
    path
}

fn run(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(ibadah_bin())
        .arg("-C")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run ibadah");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn run_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, ok) = run(dir, args);
    assert!(ok, "ibadah {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    stdout
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    serde_json::from_str(&run_ok(dir, &full)).unwrap()
}

/// A data directory with one initialized user
fn init_dir(name: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("data");
    run_ok(&dir, &["init", name]);
    (tmp, dir)
}

fn active_user_id(dir: &Path) -> String {
    let users = run_json(dir, &["user", "list"]);
    users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["active"] == true)
        .map(|u| u["id"].as_str().unwrap().to_string())
        .unwrap()
}

fn stored_snapshot(dir: &Path) -> Value {
    let id = active_user_id(dir);
    let text = fs::read_to_string(dir.join(format!("data-{}.json", id))).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn item_ids(show: &Value, category: usize) -> Vec<String> {
    show["categories"][category]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Init and users
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_user_and_config() {
    let (_tmp, dir) = init_dir("Amina");
    assert!(dir.join("config.toml").exists());
    assert!(dir.join("users.json").exists());

    let out = run_ok(&dir, &["user", "list"]);
    assert!(out.starts_with("* Amina (user-"));
}

#[test]
fn test_init_twice_fails() {
    let (_tmp, dir) = init_dir("Amina");
    let (_, stderr, ok) = run(&dir, &["init", "Bilal"]);
    assert!(!ok);
    assert!(stderr.contains("already initialized"));
}

#[test]
fn test_commands_need_a_user() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, ok) = run(tmp.path(), &["show"]);
    assert!(!ok);
    assert!(stderr.starts_with("error: no active user"));
}

#[test]
fn test_user_add_switch_rm() {
    let (_tmp, dir) = init_dir("Amina");
    let first = active_user_id(&dir);
    let second = run_ok(&dir, &["user", "add", "Bilal"]).trim().to_string();
    assert_eq!(active_user_id(&dir), second);

    run_ok(&dir, &["toggle", "1", "fajr"]);
    run_ok(&dir, &["user", "switch", &first]);
    let show = run_json(&dir, &["show", "--day", "1"]);
    assert_eq!(show["user"], "Amina");
    assert_eq!(show["categories"][0]["items"][0]["checked"], false);

    let out = run_ok(&dir, &["user", "rm", &first]);
    assert!(out.contains("active user: Bilal"));
    assert!(!dir.join(format!("data-{}.json", first)).exists());
    let show = run_json(&dir, &["show", "--day", "1"]);
    assert_eq!(show["categories"][0]["items"][0]["checked"], true);
}

#[test]
fn test_user_rename_and_unknown_ids() {
    let (_tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["user", "rename", "Amina K"]);
    let users = run_json(&dir, &["user", "list"]);
    assert_eq!(users[0]["name"], "Amina K");

    let (_, stderr, ok) = run(&dir, &["user", "switch", "user-nope"]);
    assert!(!ok);
    assert!(stderr.contains("user not found: user-nope"));
    assert!(!run(&dir, &["user", "rm", "user-nope"]).2);
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_round_trip() {
    let (_tmp, dir) = init_dir("Amina");
    let out = run_ok(&dir, &["toggle", "3", "asr"]);
    assert_eq!(out, "[x] আসর (day 3)\n");
    assert_eq!(stored_snapshot(&dir)["entries"], serde_json::json!({"day-3": {"asr": true}}));

    let out = run_ok(&dir, &["toggle", "3", "asr"]);
    assert_eq!(out, "[ ] আসর (day 3)\n");
    assert_eq!(stored_snapshot(&dir)["entries"], serde_json::json!({}));
}

#[test]
fn test_toggle_rejects_bad_input() {
    let (_tmp, dir) = init_dir("Amina");
    let (_, stderr, ok) = run(&dir, &["toggle", "31", "fajr"]);
    assert!(!ok);
    assert!(stderr.contains("day must be between 1 and 30"));

    let (_, stderr, ok) = run(&dir, &["toggle", "1", "witr"]);
    assert!(!ok);
    assert!(stderr.contains("item not found: witr"));
}

#[test]
fn test_show_day_text() {
    let (_tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["toggle", "2", "fajr"]);
    let out = run_ok(&dir, &["show", "--day", "2"]);
    assert!(out.starts_with("== Day 2 (4%) =="));
    assert!(out.contains("  [x] ফজর  fajr\n"));
    assert!(out.contains("      [ ] সুন্নাত সালাত আদায়  dhuhr-sunnah\n"));
}

#[test]
fn test_show_grid_and_collapse() {
    let (_tmp, dir) = init_dir("Amina");
    let out = run_ok(&dir, &["show"]);
    assert!(out.lines().next().unwrap().ends_with("123456789012345678901234567890"));
    assert!(out.contains("  taraweeh\n"));

    assert_eq!(run_ok(&dir, &["collapse", "sunnah-salat"]), "collapsed sunnah-salat\n");
    let out = run_ok(&dir, &["show"]);
    assert!(!out.contains("  taraweeh\n"));
    assert!(out.contains("▸ "));
    assert_eq!(run_ok(&dir, &["collapse", "sunnah-salat"]), "expanded sunnah-salat\n");
}

#[test]
fn test_stats_json() {
    let (_tmp, dir) = init_dir("Amina");
    for day in ["1", "2"] {
        run_ok(&dir, &["toggle", day, "duha"]);
    }
    let stats = run_json(&dir, &["stats"]);
    assert_eq!(stats["total_checked"], 2);
    assert_eq!(stats["total_possible"], 690);
    assert_eq!(stats["days_active"], 2);
    assert_eq!(stats["categories"][1]["id"], "sunnah-salat");
    assert_eq!(stats["categories"][1]["percent"], 3);
    assert_eq!(stats["days"].as_array().unwrap().len(), 30);
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[test]
fn test_delete_category_purges_entries() {
    let (_tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["toggle", "1", "fajr"]);
    run_ok(&dir, &["toggle", "1", "quran-reading"]);
    run_ok(&dir, &["toggle", "4", "qiyamul-layl"]);

    run_ok(&dir, &["cat", "rm", "quran"]);

    let data = stored_snapshot(&dir);
    assert_eq!(data["categories"].as_array().unwrap().len(), 4);
    assert_eq!(data["items"].as_array().unwrap().len(), 20);
    assert_eq!(data["entries"], serde_json::json!({"day-1": {"fajr": true}}));
}

#[test]
fn test_category_add_color_and_moves() {
    let (_tmp, dir) = init_dir("Amina");
    let id = run_ok(&dir, &["cat", "add", "Charity", "--color", "lime"])
        .trim()
        .to_string();
    assert!(id.starts_with("cat-"));
    run_ok(&dir, &["cat", "up", &id]);
    run_ok(&dir, &["cat", "color", "duas", "violet"]);

    let show = run_json(&dir, &["show"]);
    let cats: Vec<&str> = show["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(cats, vec!["obligatory-salat", "sunnah-salat", "quran", "duas", id.as_str(), "other"]);
    assert_eq!(show["categories"][3]["color"], "violet");
    assert_eq!(show["categories"][4]["color"], "lime");

    // Boundary moves succeed as no-ops
    run_ok(&dir, &["cat", "up", "obligatory-salat"]);
    let (_, stderr, ok) = run(&dir, &["cat", "color", "duas", "plaid"]);
    assert!(!ok);
    assert!(stderr.contains("unknown color 'plaid'"));
}

#[test]
fn test_item_sub_and_block_moves() {
    let (_tmp, dir) = init_dir("Amina");
    let sub = run_ok(&dir, &["item", "sub", "fajr", "Fajr sunnah"]).trim().to_string();
    run_ok(&dir, &["item", "down", "fajr"]);

    let show = run_json(&dir, &["show"]);
    assert_eq!(item_ids(&show, 0), vec!["dhuhr", "fajr", "asr", "maghrib", "isha"]);
    assert_eq!(show["categories"][0]["items"][1]["children"][0]["id"], sub.as_str());

    let data = stored_snapshot(&dir);
    let seq: Vec<&str> = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .take(5)
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(seq, vec!["dhuhr", "dhuhr-sunnah", "fajr", sub.as_str(), "asr"]);

    let (_, stderr, ok) = run(&dir, &["item", "sub", &sub]);
    assert!(!ok);
    assert!(stderr.contains("already a sub-item"));
}

#[test]
fn test_item_add_rename_rm() {
    let (_tmp, dir) = init_dir("Amina");
    let id = run_ok(&dir, &["item", "add", "other", "Visit family"]).trim().to_string();
    run_ok(&dir, &["item", "rename", &id, "Visit relatives"]);
    let show = run_json(&dir, &["show"]);
    let last = show["categories"][4]["items"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["name"], "Visit relatives");

    run_ok(&dir, &["toggle", "1", "isha-sunnah"]);
    run_ok(&dir, &["item", "rm", "isha"]);
    assert_eq!(stored_snapshot(&dir)["entries"], serde_json::json!({}));

    let (_, stderr, ok) = run(&dir, &["item", "add", "nope"]);
    assert!(!ok);
    assert!(stderr.contains("category not found: nope"));
}

#[test]
fn test_blank_names_are_rejected() {
    let (_tmp, dir) = init_dir("Amina");
    let (_, stderr, ok) = run(&dir, &["item", "rename", "fajr", "   "]);
    assert!(!ok);
    assert!(stderr.contains("empty name"));
    let show = run_json(&dir, &["show"]);
    assert_eq!(show["categories"][0]["items"][0]["name"], "ফজর");
}

#[test]
fn test_reset_requires_confirmation() {
    let (_tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["cat", "rm", "other"]);

    let before = stored_snapshot(&dir);
    let out = run_ok(&dir, &["reset"]);
    assert!(out.starts_with("nothing changed; run `ibadah reset --yes`"));
    assert_eq!(stored_snapshot(&dir), before);

    // A second bare reset is still only a prompt; confirmation is the flag
    run_ok(&dir, &["reset"]);
    assert_eq!(stored_snapshot(&dir), before);

    assert_eq!(run_ok(&dir, &["reset", "--yes"]), "restored the built-in checklist\n");
    let data = stored_snapshot(&dir);
    assert_eq!(data["categories"].as_array().unwrap().len(), 5);
    assert_eq!(data["items"].as_array().unwrap().len(), 23);
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[test]
fn test_export_import_round_trip() {
    let (tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["toggle", "5", "taraweeh"]);
    run_ok(&dir, &["toggle", "1", "fajr"]);
    run_ok(&dir, &["item", "up", "isha"]);
    let before = stored_snapshot(&dir);

    let file = tmp.path().join("backup.json");
    let out = run_ok(&dir, &["export", "--out", file.to_str().unwrap()]);
    assert_eq!(out.trim(), file.display().to_string());
    let payload: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(payload["version"], 1);
    assert_eq!(payload["userName"], "Amina");

    run_ok(&dir, &["reset", "--yes"]);
    run_ok(&dir, &["toggle", "5", "taraweeh"]);
    assert_ne!(stored_snapshot(&dir), before);

    let out = run_ok(&dir, &["import", file.to_str().unwrap()]);
    assert_eq!(out, "imported 5 categories, 23 items (exported by Amina)\n");
    assert_eq!(stored_snapshot(&dir), before);
}

#[test]
fn test_export_to_directory_uses_dated_name() {
    let (tmp, dir) = init_dir("Amina");
    let out = run_ok(&dir, &["export", "--out", tmp.path().to_str().unwrap()]);
    let path = PathBuf::from(out.trim());
    assert!(path.exists());
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("ibadah-Amina-"));
    assert!(name.ends_with(".json"));
}

#[test]
fn test_rejected_import_changes_nothing() {
    let (tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["toggle", "7", "sadaqah"]);
    let before = stored_snapshot(&dir);

    let file = tmp.path().join("bad.json");
    fs::write(&file, r#"{"version":1,"data":{"categories":[],"items":[]}}"#).unwrap();
    let (_, stderr, ok) = run(&dir, &["import", file.to_str().unwrap()]);
    assert!(!ok);
    assert!(stderr.contains("invalid import file"));
    assert_eq!(stored_snapshot(&dir), before);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_mirror_outbox_records_identity_changes() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("data");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[mirror]\nenabled = true\n").unwrap();

    run_ok(&dir, &["init", "Amina"]);
    let id = active_user_id(&dir);
    run_ok(&dir, &["user", "rename", "Amina K"]);
    run_ok(&dir, &["toggle", "1", "fajr"]);
    run_ok(&dir, &["user", "rm", &id]);

    let outbox = fs::read_to_string(dir.join("mirror-outbox.jsonl")).unwrap();
    let lines: Vec<Value> = outbox.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(
        lines,
        vec![
            serde_json::json!({"op": "upsert", "id": id, "name": "Amina"}),
            serde_json::json!({"op": "upsert", "id": id, "name": "Amina K"}),
            serde_json::json!({"op": "delete", "id": id}),
        ]
    );
}

#[test]
fn test_mirror_disabled_by_default() {
    let (_tmp, dir) = init_dir("Amina");
    run_ok(&dir, &["user", "add", "Bilal"]);
    assert!(!dir.join("mirror-outbox.jsonl").exists());
}

#[test]
fn test_colors_json() {
    let tmp = TempDir::new().unwrap();
    let colors = run_json(tmp.path(), &["colors"]);
    let colors = colors.as_array().unwrap();
    assert_eq!(colors.len(), 12);
    assert_eq!(colors[0]["name"], "emerald");
    assert_eq!(colors[0]["hex"], "#10b981");
}
