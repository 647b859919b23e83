use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn closest() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("protkmer")?;

    cmd.arg("closest")
        .arg("tests/test-data/refs.tsv")
        .arg("tests/test-data/queries.tsv")
        .assert()
        .success()
        .stdout(contains("query\tidentifier\tshared_kmers\tsimilarity\tpayload"))
        .stdout(contains("\t15\t1.0\tnucleocapsid"))
        .stdout(contains("spike"))
        .stdout(contains("unrelated\t*\t0\t0.0\t"))
        .stdout(contains("invalid").not());

    Ok(())
}

#[test]
fn close_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("protkmer")?;

    let output = cmd
        .arg("close")
        .args(&["-t", "0.5", "--json"])
        .arg("tests/test-data/refs.tsv")
        .arg("tests/test-data/queries.tsv")
        .output()?;
    assert!(output.status.success());

    let records: Vec<serde_json::Value> = String::from_utf8(output.stdout)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["query"], "verbatim");
    assert_eq!(records[0]["similarity"], 1.0);

    Ok(())
}

#[test]
fn stats_from_gzip() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("protkmer")?;

    cmd.arg("stats")
        .arg("--json")
        .arg("tests/test-data/refs.tsv.gz")
        .assert()
        .success()
        .stdout(contains("\"proteins\":5"))
        .stdout(contains("\"skipped_short\":1"));

    Ok(())
}

#[test]
#[cfg(unix)]
fn vote_transfers_annotations() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = TempDir::new()?;
    fs::copy("tests/test-data/refs.tsv", tmp_dir.path().join("refs.tsv"))?;
    fs::write(
        tmp_dir.path().join("proposals.tsv"),
        "name\tsequence
spike glycoprotein\tMFVFLVLLPLVSSQCVNLTTWW
weak guess\tMFVFLVLLPLVWWWWWWWWWWW
",
    )?;

    let mut cmd = Command::cargo_bin("protkmer")?;
    cmd.arg("vote")
        .args(&["-t", "0.2"])
        .args(&["refs.tsv", "proposals.tsv"])
        .current_dir(&tmp_dir)
        .assert()
        .success()
        .stdout(contains("spike glycoprotein"))
        .stdout(contains("weak guess").not())
        .stdout(contains("calmodulin"));

    Ok(())
}

#[test]
fn missing_column_exits_with_input_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("protkmer")?;

    cmd.arg("stats")
        .args(&["--seq-col", "protein"])
        .arg("tests/test-data/refs.tsv")
        .assert()
        .code(3);

    Ok(())
}

#[test]
fn zero_ksize_exits_with_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("protkmer")?;

    cmd.arg("stats")
        .args(&["-k", "0"])
        .arg("tests/test-data/refs.tsv")
        .assert()
        .code(2);

    Ok(())
}
