use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

fn script_file(content: &str) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".ld")
        .tempfile()
        .expect("temp file");
    fs::write(file.path(), content).expect("write script");
    file
}

#[test]
fn indent_prints_column_of_one_line() {
    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("indent")
        .arg(sample_path("000-sections.ld"))
        .arg("--line")
        .arg("6");

    cmd.assert().success().stdout("8\n");
}

#[test]
fn indent_rejects_line_zero() {
    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("indent")
        .arg(sample_path("000-sections.ld"))
        .arg("--line")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid line: 0"));
}

#[test]
fn comment_aware_flag_ignores_commented_braces() {
    let script = script_file("SECTIONS {\n.text /* } */\nx\n");

    let mut raw = cargo_bin_cmd!("ldmode");
    raw.arg("indent").arg(script.path()).arg("--line").arg("3");
    raw.assert().success().stdout("-4\n");

    let mut aware = cargo_bin_cmd!("ldmode");
    aware
        .arg("indent")
        .arg(script.path())
        .arg("--line")
        .arg("3")
        .arg("--comment-aware");
    aware.assert().success().stdout("4\n");
}

#[test]
fn reindent_prints_result_without_touching_file() {
    let script = script_file("MEMORY {\nram\n}\n");

    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("--unit").arg("2").arg("reindent").arg(script.path());
    cmd.assert().success().stdout("MEMORY {\n  ram\n}\n");

    assert_eq!(fs::read_to_string(script.path()).unwrap(), "MEMORY {\nram\n}\n");
}

#[test]
fn reindent_write_updates_file() {
    let script = script_file("MEMORY {\nram\n}\n");

    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("reindent").arg(script.path()).arg("--write");
    cmd.assert().success().stdout("");

    assert_eq!(
        fs::read_to_string(script.path()).unwrap(),
        "MEMORY {\n    ram\n}\n"
    );
}

#[test]
fn config_file_sets_unit() {
    let config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    fs::write(config.path(), "[indent]\nunit = 8\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("--config")
        .arg(config.path())
        .arg("indent")
        .arg(sample_path("000-sections.ld"))
        .arg("--line")
        .arg("5");
    cmd.assert().success().stdout("8\n");
}

#[test]
fn highlight_json_is_valid_json() {
    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("highlight")
        .arg(sample_path("040-discard.ld"))
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert!(value.as_array().is_some_and(|lines| !lines.is_empty()));
}

#[test]
fn process_lists_formats_on_bad_spec() {
    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("process")
        .arg(sample_path("000-sections.ld"))
        .arg("--format")
        .arg("parse-simple");

    cmd.assert().failure().stderr(
        predicate::str::contains("Invalid stage: parse")
            .and(predicate::str::contains("Available formats")),
    );
}

#[test]
fn list_formats_shows_every_spec() {
    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("list-formats");

    cmd.assert().success().stdout(
        predicate::str::contains("highlight-simple")
            .and(predicate::str::contains("indent-json"))
            .and(predicate::str::contains("reindent-simple")),
    );
}

#[test]
fn missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("ldmode");
    cmd.arg("process")
        .arg("does-not-exist.ld")
        .arg("--format")
        .arg("indent-simple");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
