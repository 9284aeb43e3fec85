use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const SYLLABUS: &str = "\
CS 240 Data Structures, Spring 2026
Week 1: Arrays and Linked Lists
Week 2: Stacks, Queues and Deques
Week 3: Hash Tables and Collision Handling
Assignment 1 due 02/10/2026
Quiz 1 on 02/20/2026
Final exam 05/05/2026
Textbook: \"Data Structures and Algorithm Analysis in C++\"
";

/// Runs `sylx` isolated from the caller's credentials and config files.
fn sylx(dir: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("sylx").into();
    cmd.current_dir(dir);
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd.env_remove("SYLLABUS_AI_API_KEY");
    cmd.env_remove("GEMINI_API_KEY");
    cmd.env_remove("SYLLABUS_ENRICH_DIFFICULTY");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_doc(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("syllabus.txt");
    fs::write(&path, content).unwrap();
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// --- Binary startup ---

#[test]
fn binary_runs() {
    let mut cmd: Command = cargo_bin_cmd!("sylx").into();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sylx"));
}

// --- Extract ---

#[test]
fn extract_file_without_key_uses_patterns() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);

    let json = stdout_json(sylx(tmp.path()).arg("extract").arg(&doc));

    let topics = json["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 3);
    assert_eq!(topics[0]["title"], "Arrays and Linked Lists");
    assert_eq!(topics[0]["week"], 1);
    assert_eq!(topics[0]["difficultyLevel"], "MEDIUM");

    let deadlines = json["deadlines"].as_array().unwrap();
    assert_eq!(deadlines.len(), 3);
    assert_eq!(deadlines[0]["type"], "ASSIGNMENT");
    assert_eq!(deadlines[0]["date"], "2026-02-10T23:59:59");
    assert_eq!(deadlines[1]["type"], "QUIZ");

    let materials = json["materials"].as_array().unwrap();
    assert_eq!(materials[0]["type"], "TEXTBOOK");
    assert!(json["runId"].is_string());
    assert!(json.get("overview").is_none());
}

#[test]
fn extract_reads_stdin() {
    let tmp = TempDir::new().unwrap();
    let json = stdout_json(
        sylx(tmp.path())
            .args(["extract", "-", "--compact"])
            .write_stdin(SYLLABUS),
    );
    assert_eq!(json["topics"].as_array().unwrap().len(), 3);
}

#[test]
fn extract_only_selected_categories() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);

    let json = stdout_json(
        sylx(tmp.path())
            .arg("extract")
            .arg(&doc)
            .args(["--only", "materials,topics"]),
    );
    assert!(json["deadlines"].as_array().unwrap().is_empty());
    assert_eq!(json["topics"].as_array().unwrap().len(), 3);
    assert_eq!(json["materials"].as_array().unwrap().len(), 1);
}

#[test]
fn extract_with_overview_and_enrichment() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);

    let json = stdout_json(
        sylx(tmp.path())
            .arg("extract")
            .arg(&doc)
            .args(["--overview", "--enrich"]),
    );
    let overview = &json["overview"];
    assert_eq!(overview["totalWeeks"], 3);
    assert_eq!(overview["topicCount"], 3);
    assert_eq!(overview["deadlineCount"], 3);
    assert_eq!(overview["difficultyBreakdown"]["medium"], 3);
}

#[test]
fn extract_without_dates_synthesizes_exams() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(
        &tmp,
        "Week 1: Course welcome and expectations\nWeek 2: Reading primary sources critically\n",
    );

    let json = stdout_json(sylx(tmp.path()).arg("extract").arg(&doc));
    let titles: Vec<&str> = json["deadlines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Midterm Examination", "Final Examination"]);
}

#[test]
fn extract_rejects_empty_input() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, "   \n");

    sylx(tmp.path())
        .arg("extract")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Content cannot be null or empty"));
}

#[test]
fn extract_rejects_short_input() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, "Week 1: Intro");

    sylx(tmp.path())
        .arg("extract")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No suitable extraction strategy"));
}

#[test]
fn extract_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    sylx(tmp.path())
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));
}

#[test]
fn extract_rejects_unknown_category() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);
    sylx(tmp.path())
        .arg("extract")
        .arg(&doc)
        .args(["--only", "grades"])
        .assert()
        .failure();
}

// --- Config ---

#[test]
fn explicit_config_is_loaded() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);
    let config = tmp.path().join("custom.toml");
    fs::write(&config, "[ai]\napi_key = \"demo-key-placeholder\"\n").unwrap();

    let json = stdout_json(
        sylx(tmp.path())
            .args(["analyze", "--config"])
            .arg(&config)
            .arg(&doc),
    );
    assert_eq!(json["strategies"][0]["name"], "ai");
    assert_eq!(json["strategies"][0]["supported"], false);
}

#[test]
fn broken_config_fails() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);
    fs::write(tmp.path().join(".syllabus.toml"), "[ai\n").unwrap();

    sylx(tmp.path())
        .arg("extract")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

// --- Analyze ---

#[test]
fn analyze_reports_every_strategy() {
    let tmp = TempDir::new().unwrap();
    let doc = write_doc(&tmp, SYLLABUS);

    let json = stdout_json(sylx(tmp.path()).arg("analyze").arg(&doc));
    assert_eq!(json["contentLength"], SYLLABUS.chars().count());

    let strategies = json["strategies"].as_array().unwrap();
    assert_eq!(strategies.len(), 2);
    assert_eq!(strategies[0]["name"], "ai");
    assert_eq!(strategies[0]["priority"], 1);
    assert_eq!(strategies[0]["confidence"], 0);
    assert_eq!(strategies[1]["name"], "pattern");
    assert_eq!(strategies[1]["supported"], true);
}
