use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VISURA: &str = "Denominazione: DELTA SISTEMI S.R.L.\n\
                      Partita IVA: 01234567890\n\
                      Indirizzo PEC: delta@pec.it\n\
                      Codice ATECO: 62.01 - Produzione di software\n\
                      Oggetto sociale: Sviluppo di software e servizi di consulenza informatica.\n";

/// A `visura` command whose config directory points into `home`.
fn visura(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("visura").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

#[test]
fn extract_prints_json_envelope() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("delta.txt");
    fs::write(&input, VISURA).unwrap();

    visura(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":true"#))
        .stdout(predicate::str::contains(r#""partita_iva":"01234567890""#))
        .stdout(predicate::str::contains(r#""extraction_method":"regex""#));
}

#[test]
fn extract_reads_stdin() {
    let dir = TempDir::new().unwrap();

    visura(dir.path())
        .args(["extract", "-", "--profile", "essential"])
        .write_stdin(VISURA)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""score":100"#));
}

#[test]
fn extract_empty_file_fails_with_envelope() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "   \n").unwrap();

    visura(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""data":{}"#))
        .stderr(predicate::str::contains("no text could be extracted"));
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    visura(dir.path())
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_text_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("delta.txt");
    fs::write(&input, VISURA).unwrap();

    visura(dir.path())
        .args(["extract", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Company: DELTA SISTEMI S.R.L."))
        .stdout(predicate::str::contains("* 62.01 Produzione di software"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("first.txt"), VISURA).unwrap();
    fs::write(inputs.join("second.txt"), "").unwrap();
    fs::write(inputs.join("ignored.pdf"), "not text").unwrap();

    let pattern = format!("{}/*", inputs.display());
    visura(dir.path())
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-j", "2"])
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    let first = fs::read_to_string(outputs.join("first.json")).unwrap();
    assert!(first.contains(r#""success":true"#));
    let second = fs::read_to_string(outputs.join("second.json")).unwrap();
    assert!(second.contains(r#""success":false"#));

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    let lines: Vec<_> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("first.txt,success,DELTA SISTEMI S.R.L.,01234567890,62.01"));
    assert!(lines[2].starts_with("second.txt,error"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blank.txt"), "").unwrap();

    let pattern = format!("{}/*.txt", dir.path().display());
    visura(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();

    visura(dir.path())
        .args(["config", "set", "extraction.profile", "essential"])
        .assert()
        .success();

    visura(dir.path())
        .args(["config", "get", "extraction.profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"essential\""));
}

#[test]
fn config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();

    visura(dir.path())
        .args(["config", "set", "extraction.colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
