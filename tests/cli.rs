use std::{fs, path::Path, process::Command};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const LOG: &str = "\
Test: check_run_llvm_foo
compile ok
TOTAL: 00H-00M-01S-500000us
----------------------------------------

Test: check_run_tc_foo
compile ok
TOTAL: 00H-00M-02S-000000us
----------------------------------------

Test: check_run_tc_bar
TOTAL: 00H-00M-00S-000300us
Test: check_run_gcc_bar
TOTAL: 00H-00M-00S-000000us
";

fn tc_bench() -> Command {
  Command::cargo_bin("tc-bench").unwrap()
}

fn read_json(path: &Path) -> Value {
  serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn compare_prints_table_and_writes_snapshot() {
  let dir = TempDir::new().unwrap();
  let log = dir.path().join("bench.log");
  let snapshot = dir.path().join("results.json");
  fs::write(&log, LOG).unwrap();

  tc_bench()
    .arg(&log)
    .arg(&snapshot)
    .assert()
    .success()
    .stdout(predicate::str::contains("133.33%"))
    .stdout(predicate::str::contains("N/A"));

  assert_eq!(
    read_json(&snapshot),
    json!({
      "results": {
        "bar": { "gcc": 0.0, "tc": 300.0, "run": true },
        "foo": { "llvm": 1500000.0, "tc": 2000000.0, "run": true },
      }
    })
  );
}

#[test]
fn compare_backfills_and_keeps_absentees() {
  let dir = TempDir::new().unwrap();
  let log = dir.path().join("bench.log");
  let snapshot = dir.path().join("results.json");
  fs::write(&log, LOG).unwrap();
  fs::write(
    &snapshot,
    json!({
      "results": {
        "foo": { "gcc": 1000000.0, "clang": 4000000.0, "llvm": 1.0, "run": true },
        "old": { "llvm": 7.0, "run": true },
      }
    })
    .to_string(),
  )
  .unwrap();

  tc_bench()
    .arg(&log)
    .arg(&snapshot)
    .assert()
    .success()
    .stdout(predicate::str::contains("200.00%"))
    .stdout(predicate::str::contains("50.00%"))
    .stdout(predicate::str::contains("old").not());

  let results = &read_json(&snapshot)["results"];
  assert_eq!(
    results["foo"],
    json!({ "llvm": 1500000.0, "gcc": 1000000.0, "clang": 4000000.0, "tc": 2000000.0, "run": true })
  );
  assert_eq!(results["old"], json!({ "llvm": 7.0, "run": false }));

  let first = fs::read_to_string(&snapshot).unwrap();
  tc_bench().arg(&log).arg(&snapshot).assert().success();
  assert_eq!(fs::read_to_string(&snapshot).unwrap(), first);
}

#[test]
fn compare_ignores_corrupt_snapshot() {
  let dir = TempDir::new().unwrap();
  let log = dir.path().join("bench.log");
  let snapshot = dir.path().join("results.json");
  fs::write(&log, LOG).unwrap();
  fs::write(&snapshot, "not json").unwrap();

  tc_bench()
    .arg(&log)
    .arg(&snapshot)
    .assert()
    .success()
    .stderr(predicate::str::contains("ignoring snapshot"));

  assert_eq!(read_json(&snapshot)["results"].as_object().unwrap().len(), 2);
}

#[test]
fn compare_fails_on_unwritable_snapshot() {
  let dir = TempDir::new().unwrap();
  let log = dir.path().join("bench.log");
  fs::write(&log, LOG).unwrap();

  tc_bench()
    .arg(&log)
    .arg(dir.path().join("missing").join("results.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("save snapshot"));
}

#[test]
fn compare_requires_both_paths() {
  tc_bench().arg("bench.log").assert().failure();
}

#[test]
fn extract_prints_one_compiler() {
  let dir = TempDir::new().unwrap();
  let log = dir.path().join("bench.log");
  fs::write(&log, LOG).unwrap();

  tc_bench()
    .arg("extract")
    .arg(&log)
    .assert()
    .success()
    .stdout("foo: 00H-00M-01S-500000us\n");

  tc_bench()
    .args(["extract", "--compiler", "tc"])
    .arg(&log)
    .assert()
    .success()
    .stdout("foo: 00H-00M-02S-000000us\nbar: 00H-00M-00S-000300us\n");
}

#[test]
fn extract_rejects_unknown_compiler() {
  tc_bench()
    .args(["extract", "--compiler", "icc", "bench.log"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown compiler"));
}

#[test]
fn extract_prints_totals_as_logged() {
  let dir = TempDir::new().unwrap();
  let log = dir.path().join("bench.log");
  fs::write(
    &log,
    "Test: check_run_llvm_foo\nTOTAL: 0H-0M-1S-5us\nTest: check_run_llvm_bar\nTOTAL: killed\n",
  )
  .unwrap();

  tc_bench()
    .arg("extract")
    .arg(&log)
    .assert()
    .success()
    .stdout("foo: 0H-0M-1S-5us\nbar: killed\n");
}
