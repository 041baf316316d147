//! CLI integration tests for the `strider` binary.
//!
//! Each test writes its sources into a fresh temporary directory and runs
//! the binary there, so no stray `strider.toml` is picked up.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper: create a Command for the `strider` binary, rooted at `dir`.
fn strider(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("strider");
    cmd.current_dir(dir);
    cmd
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, text) in files {
        fs::write(dir.path().join(name), text).expect("write fixture");
    }
    dir
}

const AREA: &str = "/** Area of the shape. */\n\
                    public double area() { return width * height; }\n";

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    let dir = workspace(&[]);
    strider(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("frame-editor code elements"));
}

#[test]
fn version_exits_0() {
    let dir = workspace(&[]);
    strider(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("strider"));
}

#[test]
fn convert_without_files_is_a_usage_error() {
    let dir = workspace(&[]);
    strider(dir.path()).arg("convert").assert().failure().code(2);
}

// ──────────────────────────────────────────────
// 2. Convert subcommand
// ──────────────────────────────────────────────

#[test]
fn convert_prints_json_by_default() {
    let dir = workspace(&[("Area.java", AREA)]);
    let output = strider(dir.path())
        .args(["convert", "Area.java"])
        .output()
        .expect("run strider");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let method = &json["elements"][0];
    assert_eq!(method["element"], "normal_method");
    assert_eq!(method["access"], "public");
    assert_eq!(method["name"]["text"], "area");
    assert_eq!(method["documentation"], "Area of the shape.");
    assert_eq!(method["body"][0]["element"], "return");
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[test]
fn convert_text_output_is_an_outline() {
    let dir = workspace(&[("Area.java", AREA)]);
    strider(dir.path())
        .args(["convert", "--output", "text", "Area.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# Area of the shape.\npublic double area()\n  return width * height\n",
        ));
}

#[test]
fn convert_multiple_files_tags_each_result() {
    let dir = workspace(&[("a.java", "x = 1;"), ("b.java", "run();")]);
    let output = strider(dir.path())
        .args(["convert", "a.java", "b.java"])
        .output()
        .expect("run strider");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let files = json.as_array().expect("array of files");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file"], "a.java");
    assert_eq!(files[0]["elements"][0]["element"], "assign");
    assert_eq!(files[1]["file"], "b.java");
    assert_eq!(files[1]["elements"][0]["element"], "call");
}

#[test]
fn convert_syntax_error_exits_1_with_line() {
    let dir = workspace(&[("bad.java", "x = 1;\ny = (2;\n")]);
    strider(dir.path())
        .args(["convert", "--output", "text", "bad.java"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bad.java: line 2"));
}

#[test]
fn convert_syntax_error_json_names_the_file() {
    let dir = workspace(&[("bad.java", "y = (2;")]);
    let output = strider(dir.path())
        .args(["convert", "bad.java"])
        .output()
        .expect("run strider");
    assert_eq!(output.status.code(), Some(1));

    let err: serde_json::Value = serde_json::from_slice(&output.stderr).expect("json error");
    assert_eq!(err["file"], "bad.java");
    assert!(err["error"].as_str().unwrap().starts_with("line 1"));
}

#[test]
fn convert_nonexistent_file_exits_1() {
    let dir = workspace(&[]);
    strider(dir.path())
        .args(["convert", "--output", "text", "missing.java"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing.java"));
}

#[test]
fn convert_keeps_going_after_a_failed_file() {
    let dir = workspace(&[("good.java", "run();")]);
    strider(dir.path())
        .args(["convert", "--output", "text", "missing.java", "good.java"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("== good.java ==\nrun()"));
}

#[test]
fn convert_warnings_go_to_stderr_in_text_mode() {
    let dir = workspace(&[("loop.java", "for (;;) { x(); }\ny();\n")]);
    strider(dir.path())
        .args(["convert", "--output", "text", "loop.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("y()"))
        .stderr(predicate::str::contains("not supported"));
}

// ──────────────────────────────────────────────
// 3. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_clean_file_reports_ok() {
    let dir = workspace(&[("Area.java", AREA)]);
    strider(dir.path())
        .args(["check", "Area.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area.java: ok"));
}

#[test]
fn check_lists_warnings_and_exits_0() {
    let dir = workspace(&[("loop.java", "for (;;) { x(); }\n")]);
    strider(dir.path())
        .args(["check", "loop.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loop.java: line 1:"));
}

#[test]
fn check_deny_warnings_exits_2() {
    let dir = workspace(&[("loop.java", "for (;;) { x(); }\n")]);
    strider(dir.path())
        .args(["check", "--deny-warnings", "loop.java"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn check_json_output() {
    let dir = workspace(&[("loop.java", "for (;;) { x(); }\n")]);
    let output = strider(dir.path())
        .args(["check", "--output", "json", "loop.java"])
        .output()
        .expect("run strider");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json[0]["file"], "loop.java");
    assert_eq!(json[0]["warnings"].as_array().unwrap().len(), 1);
}

// ──────────────────────────────────────────────
// 4. Configuration
// ──────────────────────────────────────────────

#[test]
fn config_file_sets_format_and_comment_width() {
    let dir = workspace(&[
        (
            "Doc.java",
            "/** one two three four five six seven eight */\npublic void run() {}\n",
        ),
        (
            "strider.toml",
            "[convert]\ncomment_width = 20\n\n[output]\nformat = \"text\"\n",
        ),
    ]);
    strider(dir.path())
        .args(["convert", "Doc.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# one two"))
        .stdout(predicate::str::contains("one two three four five").not());
}

#[test]
fn explicit_config_path_is_used() {
    let dir = workspace(&[
        ("Area.java", AREA),
        ("custom.toml", "[output]\nformat = \"text\"\n"),
    ]);
    strider(dir.path())
        .args(["--config", "custom.toml", "convert", "Area.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("public double area()"));
}

#[test]
fn invalid_config_exits_1() {
    let dir = workspace(&[("Area.java", AREA), ("strider.toml", "[output]\ncolour = 1\n")]);
    strider(dir.path())
        .args(["convert", "Area.java"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn deny_warnings_from_config() {
    let dir = workspace(&[
        ("loop.java", "for (;;) { x(); }\n"),
        ("strider.toml", "[output]\ndeny_warnings = true\n"),
    ]);
    strider(dir.path())
        .args(["check", "loop.java"])
        .assert()
        .failure()
        .code(2);
}
