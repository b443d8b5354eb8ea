use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn textmerge() -> Command {
    Command::cargo_bin("textmerge").unwrap()
}

fn fixture(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

#[test]
fn no_arguments_prints_help() {
    textmerge()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn bare_concat_writes_default_output_in_working_directory() {
    let dir = fixture(&[("a.txt", "X"), ("b.txt", "Y"), ("notes.md", "ignored")]);

    textmerge()
        .current_dir(dir.path())
        .args(["concat", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[\"a.txt\", \"b.txt\"]"))
        .stdout(predicate::str::contains("0\n1\n"));

    let output = fs::read_to_string(dir.path().join("negative_text.txt")).unwrap();
    assert_eq!(output, "X\nY\n");
}

#[test]
fn concat_without_terminal_prints_running_index() {
    let dir = fixture(&[("a.txt", "X"), ("b.txt", "Y")]);

    textmerge()
        .current_dir(dir.path())
        .arg("concat")
        .assert()
        .success()
        .stdout(predicate::str::contains("[0/2]"))
        .stdout(predicate::str::contains("[1/2]"));
}

#[test]
fn concat_twice_is_byte_identical() {
    let dir = fixture(&[("a.txt", "first\n"), ("b.txt", "second")]);

    for _ in 0..2 {
        textmerge()
            .current_dir(dir.path())
            .args(["concat", "-q"])
            .assert()
            .success();
    }

    let output = fs::read(dir.path().join("negative_text.txt")).unwrap();
    assert_eq!(output, b"first\n\nsecond\n");
}

#[test]
fn concat_with_explicit_directory_and_output() {
    let data = fixture(&[("one.txt", "1"), ("two.txt", "2")]);
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("merged.txt");

    textmerge()
        .args(["concat", "-q", "--dir"])
        .arg(data.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(output).unwrap(), "1\n2\n");
}

#[test]
fn concat_of_empty_directory_creates_empty_file() {
    let dir = TempDir::new().unwrap();

    textmerge()
        .current_dir(dir.path())
        .args(["concat", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: No files matching"));

    let output = fs::read_to_string(dir.path().join("negative_text.txt")).unwrap();
    assert_eq!(output, "");
}

#[test]
fn concat_fails_on_non_utf8_input_and_keeps_previous_output() {
    let dir = fixture(&[("a.txt", "X"), ("negative_text.txt", "previous")]);
    fs::write(dir.path().join("b.txt"), [0xff, 0xfe, 0xfd]).unwrap();

    textmerge()
        .current_dir(dir.path())
        .args(["concat", "--output-format", "plain"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("valid UTF-8"));

    let output = fs::read_to_string(dir.path().join("negative_text.txt")).unwrap();
    assert_eq!(output, "previous");
}

#[test]
fn concat_in_place_leaves_partial_output_on_failure() {
    let dir = fixture(&[("a.txt", "X")]);
    fs::write(dir.path().join("b.txt"), [0xff]).unwrap();

    textmerge()
        .current_dir(dir.path())
        .args(["concat", "-q", "--in-place"])
        .assert()
        .code(5);

    let output = fs::read_to_string(dir.path().join("negative_text.txt")).unwrap();
    assert_eq!(output, "X\n");
}

#[test]
fn concat_rejects_missing_directory() {
    let dir = TempDir::new().unwrap();

    textmerge()
        .current_dir(dir.path())
        .args(["concat", "--dir", "does-not-exist"])
        .assert()
        .code(2);
}

#[test]
fn matrix_prints_shape_and_rows() {
    let dir = fixture(&[("a.txt", "line1\nline2")]);

    textmerge()
        .current_dir(dir.path())
        .args(["matrix", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1, 2)"))
        .stdout(predicate::str::contains("[\"line1\", \"line2\"]"));
}

#[test]
fn matrix_reads_file_named_like_concat_output() {
    let dir = fixture(&[("a.txt", "line1"), ("negative_text.txt", "line2")]);

    textmerge()
        .current_dir(dir.path())
        .args(["matrix", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2, 1)"))
        .stdout(predicate::str::contains("[\"line2\"]"));
}

#[test]
fn matrix_preview_is_limited() {
    let files: Vec<(String, String)> = (0..12)
        .map(|i| (format!("f{:02}.txt", i), format!("row{}", i)))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let dir = fixture(&refs);

    textmerge()
        .current_dir(dir.path())
        .args(["matrix", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(12, 1)"))
        .stdout(predicate::str::contains("[\"row9\"]"))
        .stdout(predicate::str::contains("[\"row10\"]").not());
}

#[test]
fn matrix_reject_fails_on_ragged_input() {
    let dir = fixture(&[("a.txt", "1\n2"), ("b.txt", "3")]);

    textmerge()
        .current_dir(dir.path())
        .args(["matrix", "--ragged", "reject"])
        .assert()
        .code(6);
}

#[test]
fn matrix_keep_reports_ragged_shape() {
    let dir = fixture(&[("a.txt", "1\n2"), ("b.txt", "3")]);

    textmerge()
        .current_dir(dir.path())
        .args(["matrix", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2,) ragged"));
}

#[test]
fn matrix_json_output() {
    let dir = fixture(&[("a.txt", "1\n2"), ("b.txt", "3")]);

    let output = textmerge()
        .current_dir(dir.path())
        .args(["matrix", "--ragged", "pad", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let matrix_line = stdout
        .lines()
        .find(|line| line.contains("\"line_matrix\""))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(matrix_line).unwrap();

    assert_eq!(value["shape"]["kind"], "rectangular");
    assert_eq!(value["shape"]["columns"], 2);
    assert_eq!(value["preview"][1]["lines"], serde_json::json!(["3", ""]));
}

#[test]
fn generate_config_writes_sample() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.toml");

    textmerge()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(config_path).unwrap();
    assert!(content.contains("[matrix]"));
}

#[test]
fn config_file_is_picked_up_from_working_directory() {
    let dir = fixture(&[("a.md", "A"), ("b.txt", "B")]);
    fs::write(
        dir.path().join("textmerge.toml"),
        "[discovery]\npattern = \"*.md\"\n\n[concat]\noutput_path = \"all.out\"\n",
    )
    .unwrap();

    textmerge()
        .current_dir(dir.path())
        .args(["concat", "-q"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("all.out")).unwrap(), "A\n");
}
