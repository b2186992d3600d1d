//! Integration tests for the treenav binary
//!
//! Runs the built executable against files in a temp dir.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const SOURCE: &str = "fn main() {\n    foo();\n    bar();\n}\n";

/// Helper to create a temp dir holding one Rust file
fn setup_test_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.rs");
    fs::write(&file, SOURCE).unwrap();
    (dir, file)
}

fn treenav(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treenav"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_run_help() {
    let output = treenav(&["run", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Run structural commands against a file"));
}

#[test]
fn test_languages_lists_rust_and_json() {
    let output = treenav(&["languages"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l == "Rust"));
    assert!(stdout.lines().any(|l| l == "Json"));
}

#[test]
fn test_run_json_report() {
    let (_dir, file) = setup_test_file();

    let output = treenav(&[
        "run",
        file.to_str().unwrap(),
        "--at",
        "17",
        "-c",
        "next",
        "-c",
        "first?",
        "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["language"], "rs");
    assert_eq!(report["point"], 27);
    assert_eq!(report["changed"], false);
    assert_eq!(report["current"]["kind"], "expression_statement");
    assert_eq!(report["commands"][0]["kind"], "moved");
    assert_eq!(report["commands"][0]["value"]["horizontal"], 1);
    assert_eq!(report["commands"][1]["value"], false);
}

#[test]
fn test_run_diff_does_not_touch_file() {
    let (_dir, file) = setup_test_file();

    let output = treenav(&["run", file.to_str().unwrap(), "--at", "16", "-c", "delete", "--diff"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-    foo();"));
    assert_eq!(fs::read_to_string(&file).unwrap(), SOURCE);
}

#[test]
fn test_run_in_place() {
    let (_dir, file) = setup_test_file();

    let output = treenav(&[
        "run",
        file.to_str().unwrap(),
        "--at",
        "16",
        "-c",
        "yank",
        "-c",
        "paste-after",
        "--in-place",
    ]);
    assert!(output.status.success());

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "fn main() {\n    foo();\n    foo();\n    bar();\n}\n"
    );
}

#[test]
fn test_run_rejects_unknown_command() {
    let (_dir, file) = setup_test_file();

    let output = treenav(&["run", file.to_str().unwrap(), "-c", "teleport"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid command 'teleport'"));
}

#[test]
fn test_run_with_config_file() {
    let (dir, file) = setup_test_file();
    let config = dir.path().join("treenav.toml");
    fs::write(
        &config,
        r#"
[engine]
keep_empty_lines = true
"#,
    )
    .unwrap();

    let output = treenav(&[
        "run",
        file.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--at",
        "16",
        "-c",
        "delete",
        "--json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["text"], "fn main() {\n    \n    bar();\n}\n");
    assert_eq!(report["kill_ring"][0], "foo();");
}

#[test]
fn test_selection_printed_with_highlight_disabled() {
    let (dir, file) = setup_test_file();
    let config = dir.path().join("treenav.toml");
    fs::write(&config, "[highlight]\nenabled = false\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_treenav"))
        .args([
            "run",
            file.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--at",
            "16",
            "-c",
            "next",
        ])
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG")
        .env("CLICOLOR_FORCE", "1")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\x1b[7mbar();\x1b[0m"), "{stdout:?}");
}

#[test]
fn test_inspect_prints_node_and_predicates() {
    let (_dir, file) = setup_test_file();

    let output = treenav(&["inspect", file.to_str().unwrap(), "--at", "17"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("expression_statement [16..22)"));
    assert!(stdout.contains("first?"));
}
