use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const REFERENCE: &str = "2016-11-07T12:00";

#[allow(deprecated)]
fn timex() -> Command {
    Command::cargo_bin("timex").unwrap()
}

fn run(args: &[&str]) -> Value {
    let output = timex().args(args).output().unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_resolves_month_day() {
    let json = run(&["I'll go back Oct. 2", "--reference", REFERENCE]);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "Oct. 2");
    assert_eq!(items[0]["type"], "date");

    let values: Vec<&str> = items[0]["resolution"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["2016-10-02", "2017-10-02"]);
}

#[test]
fn test_reads_stdin() {
    timex()
        .args(["-r", REFERENCE])
        .write_stdin("see you tomorrow at 5pm")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timex\":\"2016-11-08T17\""));
}

#[test]
fn test_type_filter() {
    let json = run(&[
        "let's meet tomorrow at 5pm for 2 hours",
        "-r",
        REFERENCE,
        "--types",
        "duration",
    ]);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "2 hours");
}

#[test]
fn test_raw_output_keeps_both_branches() {
    let json = run(&["before next Monday", "-r", REFERENCE, "--raw"]);
    let item = &json[0];
    assert_eq!(item["timex_str"], "2016-11-14");
    assert_eq!(item["range_changing"], true);
    assert_eq!(item["resolution"]["mod"], "before");
}

#[test]
fn test_no_mentions_is_empty_array() {
    timex()
        .args(["the quick brown fox", "-r", REFERENCE])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_bad_reference_fails() {
    timex()
        .args(["tomorrow", "--reference", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --reference"));
}

#[test]
fn test_unknown_type_fails() {
    timex()
        .args(["tomorrow", "-r", REFERENCE, "--types", "weekday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown entity type"));
}
