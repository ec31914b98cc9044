//! End-to-end runs of the `ldb` binary on plain-text fixtures.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ITAS_TEXT: &str = "\
KARTU IZIN TINGGAL TERBATAS
WANG FANG
PERMIT NUMBER : 2C11AB1234
STAY PERMIT EXPIRY : 15/08/2025
Passport Number : E12345678
Nationality : CHINA
";

const DKPTKA_TEXT: &str = "PT NICKEL INDUSTRY\tJOHN DOE\tAB1234567\tCHINA\tENGINEER\tUS$500\n";

fn ldb() -> Command {
    Command::cargo_bin("ldb").unwrap()
}

fn write_fixture(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn extract_prints_json_record() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "permit.txt", ITAS_TEXT);

    ldb()
        .arg("extract")
        .arg(dir.path().join("permit.txt"))
        .args(["--type", "itas"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""document_type": "ITAS""#))
        .stdout(predicate::str::contains(r#""Permit Number": "2C11AB1234""#))
        .stdout(predicate::str::contains(r#""Stay Permit Expiry": "15/08/2025""#));
}

#[test]
fn extract_writes_csv_output() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "dkptka.txt", DKPTKA_TEXT);
    let output = dir.path().join("out.csv");

    ldb()
        .arg("extract")
        .arg(dir.path().join("dkptka.txt"))
        .args(["-t", "DKPTKA", "--format", "csv", "--output"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("No,filename,Nama Pemberi Kerja,"));
    assert!(lines.next().unwrap().starts_with("1,dkptka.txt,PT NICKEL INDUSTRY,"));
}

#[test]
fn extract_validate_reports_missing_fields() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "letter.txt", "Nama TKA : JOHN DOE\n");

    ldb()
        .arg("extract")
        .arg(dir.path().join("letter.txt"))
        .args(["--type", "dkptka", "--validate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Validation: incomplete"))
        .stderr(predicate::str::contains("Missing required fields"))
        .stderr(predicate::str::contains("Nomor Paspor"));
}

#[test]
fn extract_rejects_unknown_type() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "a.txt", "x");

    ldb()
        .arg("extract")
        .arg(dir.path().join("a.txt"))
        .args(["--type", "passport"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported document type: passport"));
}

#[test]
fn extract_missing_file_fails() {
    ldb()
        .args(["extract", "/nonexistent/doc.txt", "--type", "sktt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_outputs_summary_and_log() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "a.txt", ITAS_TEXT);
    write_fixture(dir.path(), "b.txt", "nothing useful here");
    let out = dir.path().join("out");
    let log = dir.path().join("extract.jsonl");
    let pattern = dir.path().join("*.txt");

    ldb()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .args(["--type", "ITAS", "--summary", "-j", "2", "--output-dir"])
        .arg(&out)
        .arg("--log")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    let a: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("a.json")).unwrap()).unwrap();
    assert_eq!(a["Permit Number"], "2C11AB1234");
    assert!(out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.lines().nth(1).unwrap().starts_with("1,a.txt,"));

    let log = fs::read_to_string(&log).unwrap();
    let entries: Vec<serde_json::Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["filename"], "a.txt");
    assert_eq!(entries[0]["status"], "completed");
}

#[test]
fn batch_rename_copies_with_holder_name() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "scan.txt", ITAS_TEXT);
    let out = dir.path().join("renamed");
    let pattern = dir.path().join("*.txt");

    ldb()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .args(["--type", "itas", "--rename", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("ITAS_WANG_FANG_E12345678.txt").exists());
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.txt");

    ldb()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .args(["--type", "evln"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn types_lists_every_document_type() {
    ldb()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("SKTT"))
        .stdout(predicate::str::contains("NOTIFICATION"))
        .stdout(predicate::str::contains("Kode Billing Pembayaran"));
}

#[test]
fn types_json_is_parseable() {
    let output = ldb().args(["types", "--json"]).output().unwrap();
    assert!(output.status.success());

    let types: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(types.as_array().unwrap().len(), 6);
    assert_eq!(types[5]["type"], "DKPTKA");
}

#[test]
fn config_init_and_get() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    ldb()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();

    ldb()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "extraction.issue_year_max"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025"));

    ldb()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "output.max_filename_len", "80"])
        .assert()
        .success();

    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.contains("\"max_filename_len\": 80"));
}
