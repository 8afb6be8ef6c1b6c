use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn crefkit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("crefkit").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn categories_written_sorted_in_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "Matt.json",
        r#"{"items": [{"primary_category": "Law"}, {"secondary_category": "History"}, {}]}"#,
    );
    write(
        temp_dir.path(),
        "Gen.json",
        r#"{"items": [{"primary_category": "Law", "secondary_category": ""}]}"#,
    );

    crefkit(temp_dir.path())
        .args(["--output-format", "plain", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Categories: 2"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("categories.txt")).unwrap(),
        "History\nLaw\n"
    );
}

#[test]
fn categories_custom_directory_and_output() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("crefs_json");
    fs::create_dir(&data_dir).unwrap();
    write(&data_dir, "Exod.json", r#"{"items": [{"primary_category": "Deliverance"}]}"#);

    crefkit(temp_dir.path())
        .args(["-q", "categories", "crefs_json", "--output", "labels.txt"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("labels.txt")).unwrap(),
        "Deliverance\n"
    );
    assert!(!data_dir.join("categories.txt").exists());
}

#[test]
fn categories_json_report() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "Matt.json",
        r#"{"items": [{"primary_category": "Fulfillment", "secondary_category": "Kingdom"}]}"#,
    );

    let output = crefkit(temp_dir.path())
        .args(["--output-format", "json", "-q", "categories"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["categories"], serde_json::json!(["Fulfillment", "Kingdom"]));
    assert_eq!(report["files_processed"], 1);
}

#[test]
fn categories_malformed_json_aborts() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "Gen.json", r#"{"items": [{"primary_category": "Law"}]}"#);
    write(temp_dir.path(), "broken.json", r#"{"items": [}"#);

    crefkit(temp_dir.path())
        .arg("categories")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("broken.json"));

    assert!(!temp_dir.path().join("categories.txt").exists());
}

#[test]
fn categories_keep_going_reports_skipped_files() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "Gen.json", r#"{"items": [{"primary_category": "Law"}]}"#);
    write(temp_dir.path(), "broken.json", "not json at all");

    crefkit(temp_dir.path())
        .args(["--output-format", "plain", "categories", "--keep-going"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("SKIPPED"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("categories.txt")).unwrap(),
        "Law\n"
    );
}

#[test]
fn categories_missing_directory() {
    let temp_dir = TempDir::new().unwrap();

    crefkit(temp_dir.path())
        .args(["categories", "does-not-exist"])
        .assert()
        .code(3);
}

#[test]
fn rename_copies_into_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    let source_dir = temp_dir.path().join("verified-results");
    fs::create_dir(&source_dir).unwrap();
    write(&source_dir, "40-Matt_verified_results.json", r#"{"items": []}"#);
    write(&source_dir, "01-Gen_verified_results.json", r#"{"book": "Gen"}"#);
    write(&source_dir, "README.md", "not a result");

    crefkit(temp_dir.path())
        .args(["--output-format", "plain", "rename"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files: 2"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Matt.json")).unwrap(),
        r#"{"items": []}"#
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Gen.json")).unwrap(),
        r#"{"book": "Gen"}"#
    );
}

#[test]
fn rename_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let source_dir = temp_dir.path().join("verified-results");
    fs::create_dir(&source_dir).unwrap();
    write(&source_dir, "40-Matt_verified_results.json", "{}");

    crefkit(temp_dir.path())
        .args(["--output-format", "plain", "rename", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matt.json"));

    assert!(!temp_dir.path().join("Matt.json").exists());
}

#[test]
fn rename_rejects_malformed_name() {
    let temp_dir = TempDir::new().unwrap();
    let source_dir = temp_dir.path().join("verified-results");
    fs::create_dir(&source_dir).unwrap();
    write(&source_dir, "Matt_verified_results.json", "{}");

    crefkit(temp_dir.path())
        .arg("rename")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Matt_verified_results.json"));
}

#[test]
fn rename_collision_policies() {
    let temp_dir = TempDir::new().unwrap();
    let source_dir = temp_dir.path().join("verified-results");
    fs::create_dir(&source_dir).unwrap();
    write(&source_dir, "1-Alpha_verified_results.json", "first");
    write(&source_dir, "2-Alpha_verified_results.json", "second");

    crefkit(temp_dir.path())
        .args(["rename", "--on-collision", "error"])
        .assert()
        .code(6);
    assert!(!temp_dir.path().join("Alpha.json").exists());

    crefkit(temp_dir.path())
        .args(["-q", "rename", "--on-collision", "skip"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Alpha.json")).unwrap(),
        "first"
    );

    crefkit(temp_dir.path())
        .args(["-q", "rename"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("Alpha.json")).unwrap(),
        "second"
    );
}

#[test]
fn config_file_sets_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let source_dir = temp_dir.path().join("incoming");
    fs::create_dir(&source_dir).unwrap();
    write(&source_dir, "66-Rev_verified_results.json", "{}");
    write(
        temp_dir.path(),
        "crefkit.toml",
        "[rename]\nsource_dir = \"incoming\"\ndest_dir = \"out\"\n",
    );

    crefkit(temp_dir.path())
        .args(["-q", "rename"])
        .assert()
        .success();

    assert!(temp_dir.path().join("out").join("Rev.json").exists());
}

#[test]
fn invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "bad.toml", "[rename]\nsuffix = \"_verified.txt\"\n");

    crefkit(temp_dir.path())
        .args(["--config", "bad.toml", "rename"])
        .assert()
        .code(7);
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    crefkit(temp_dir.path())
        .args(["--generate-config", "--config", "sample.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample.toml"));

    let content = fs::read_to_string(temp_dir.path().join("sample.toml")).unwrap();
    assert!(content.contains("[rename]"));
}

#[test]
fn no_arguments_prints_help() {
    let temp_dir = TempDir::new().unwrap();

    crefkit(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
