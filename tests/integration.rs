use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_docindex")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture() -> String {
    std::fs::read_to_string(fixture_path("search_index.js")).unwrap()
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn index_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".js").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// -- check --

#[test]
fn check_fixture_is_clean() {
    cmd()
        .args(["check", "--strict", "--canonical"])
        .arg(fixture_path("search_index.js"))
        .assert()
        .success()
        .stdout("checked 1 file(s): 0 error(s), 0 warning(s)\n");
}

#[test]
fn check_reads_stdin() {
    cmd()
        .arg("check")
        .write_stdin(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("checked 1 file(s)"));
}

#[test]
fn check_reports_missing_field() {
    let input = index_file(
        r#"var documenterSearchIndex = {"docs":[{"location":"","page":"Home","title":"Home","category":"page"}]}"#,
    );

    cmd()
        .arg("check")
        .arg(input.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing field `text`"))
        .stderr(predicate::str::contains("1 of 1 file(s) failed validation"));
}

#[test]
fn check_reports_non_string_value() {
    let input = index_file(
        r#"{"docs":[{"location":"","page":"Home","title":"Home","text":"","category":1}]}"#,
    );

    cmd()
        .arg("check")
        .arg(input.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid type: integer `1`"));
}

#[test]
fn check_warnings_fail_only_when_strict() {
    let input = index_file(
        r##"var documenterSearchIndex = {"docs":
[{"location":"#Usage","page":"Home","title":"Getting started","text":"","category":"section"}]
}
"##,
    );

    cmd()
        .arg("check")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "record 0: warning: anchor `Usage` does not match title slug `Getting-started`",
        ));

    cmd()
        .args(["check", "--strict"])
        .arg(input.path())
        .assert()
        .failure();
}

#[test]
fn check_canonical_flags_reformatted_file() {
    let reformatted = fixture().replace("{\"docs\":\n[", "{\"docs\": [");
    let input = index_file(&reformatted);

    cmd().arg("check").arg(input.path()).assert().success();

    cmd()
        .args(["check", "--canonical"])
        .arg(input.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "error: not in canonical generator layout",
        ));
}

#[test]
fn check_scans_directories() {
    let dir = TempDir::new().unwrap();
    for name in ["PR1", "PR2"] {
        let sub = dir.path().join("previews").join(name);
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("search_index.js"), fixture()).unwrap();
    }
    std::fs::write(dir.path().join("unrelated.js"), "not an index").unwrap();

    cmd()
        .arg("check")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("checked 2 file(s)"));
}

#[test]
fn check_no_matches() {
    cmd()
        .args(["check", "/nonexistent/dir/*.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files matched"));
}

#[test]
fn check_missing_file_fails() {
    cmd()
        .args(["check", "--strict"])
        .arg(fixture_path("search_index.js"))
        .arg("/nonexistent/missing_search_index.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no such file: /nonexistent/missing_search_index.js",
        ));
}

// -- list --

#[test]
fn list_references_section() {
    let out = stdout_of(
        cmd()
            .args(["list", "--page", "References", "--category", "section", "-f", "json"])
            .arg(fixture_path("search_index.js"))
            .assert()
            .success(),
    );

    let records: serde_json::Value = serde_json::from_str(&out).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["location"], "References/#References");
}

#[test]
fn list_home_title_record() {
    let out = stdout_of(
        cmd()
            .args(["list", "--page", "Home"])
            .arg(fixture_path("search_index.js"))
            .assert()
            .success(),
    );

    let line = out
        .lines()
        .find(|l| l.ends_with("\tHome\tKinematic1D.jl"))
        .unwrap();
    assert_eq!(line, "2\tsection\t#Kinematic1D.jl\tHome\tKinematic1D.jl");
}

#[test]
fn list_limit_and_with_text() {
    let out = stdout_of(
        cmd()
            .args(["list", "--with-text", "-n", "2", "-"])
            .write_stdin(fixture())
            .assert()
            .success(),
    );
    assert_eq!(out, "3\tpage\t\tHome\tHome\n5\tpage\t\tHome\tHome\n");
}

#[test]
fn list_unknown_format() {
    cmd()
        .args(["list", "-f", "yaml"])
        .arg(fixture_path("search_index.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: yaml"));
}

// -- fmt --

#[test]
fn fmt_round_trips_generator_output() {
    cmd()
        .arg("fmt")
        .arg(fixture_path("search_index.js"))
        .assert()
        .success()
        .stdout(fixture());
}

#[test]
fn fmt_is_idempotent() {
    let first = stdout_of(cmd().arg("fmt").write_stdin(fixture()).assert().success());
    let second = stdout_of(cmd().arg("fmt").write_stdin(first.clone()).assert().success());
    assert_eq!(first, second);
}

#[test]
fn fmt_check_and_write() {
    let reformatted = fixture().replace("},{", "},\n  {");
    let input = index_file(&reformatted);

    cmd()
        .args(["fmt", "--check"])
        .arg(input.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("not in canonical form"));

    cmd()
        .args(["fmt", "--write"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("formatted"));

    assert_eq!(std::fs::read_to_string(input.path()).unwrap(), fixture());

    cmd()
        .args(["fmt", "--check"])
        .arg(input.path())
        .assert()
        .success();
}

#[test]
fn fmt_json_drops_binding() {
    let out = stdout_of(
        cmd()
            .args(["fmt", "-f", "json"])
            .arg(fixture_path("search_index.js"))
            .assert()
            .success(),
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["docs"].as_array().unwrap().len(), 13);
}

#[test]
fn fmt_multiple_files_needs_mode() {
    let a = index_file(&fixture());
    let b = index_file(&fixture());

    cmd()
        .arg("fmt")
        .arg(a.path())
        .arg(b.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("use --write or --check"));
}

#[test]
fn fmt_write_rejects_stdin() {
    cmd()
        .args(["fmt", "--write"])
        .write_stdin(fixture())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--write needs file arguments"));
}

// -- outline --

#[test]
fn outline_markdown_to_stdout() {
    let out = stdout_of(
        cmd()
            .arg("outline")
            .arg(fixture_path("search_index.js"))
            .assert()
            .success(),
    );

    assert!(out.starts_with("## Index\n\n* [References](#references)\n* [Home](#home)\n"));
    assert!(out.contains("* [References](References/#References)"));
    assert!(out.contains("* [Simulation setup](#Simulation-setup)"));
    assert!(out.contains("7 paragraphs"));
}

#[test]
fn outline_writes_named_files() {
    let src = TempDir::new().unwrap();
    let build = src.path().join("PR138");
    std::fs::create_dir_all(&build).unwrap();
    std::fs::write(build.join("search_index.js"), fixture()).unwrap();
    let out = TempDir::new().unwrap();

    cmd()
        .args(["outline", "-f", "json", "-o", out.path().to_str().unwrap()])
        .arg(src.path())
        .assert()
        .success();

    let written = std::fs::read_to_string(out.path().join("PR138.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["pages"][0]["page"], "References");
    assert_eq!(value["pages"][1]["sections"][0]["location"], "#Kinematic1D.jl");
}

// -- stats --

#[test]
fn stats_text() {
    cmd()
        .arg("stats")
        .arg(fixture_path("search_index.js"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("records:    13\npages:      2\n"));
}

#[test]
fn stats_json() {
    let out = stdout_of(
        cmd()
            .args(["stats", "--json"])
            .write_stdin(fixture())
            .assert()
            .success(),
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["records"], 13);
    assert_eq!(value["categories"][0]["category"], "section");
    assert_eq!(value["empty_text"], 6);
}

#[test]
fn empty_input_is_an_error() {
    cmd()
        .arg("stats")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty input"));
}
