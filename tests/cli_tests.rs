use assert_cmd::Command;
use predicates::prelude::*;

fn budgety() -> (Command, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("budgety").unwrap();
    cmd.current_dir(dir.path());
    (cmd, dir)
}

#[test]
fn demo_prints_budget() {
    let (mut cmd, _dir) = budgety();
    cmd.arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("+ 75.00"))
        .stdout(predicate::str::contains("exp-0"))
        .stdout(predicate::str::contains("25%"));
}

#[test]
fn run_reads_stdin() {
    let (mut cmd, _dir) = budgety();
    cmd.arg("run")
        .write_stdin("add inc Salary 3\nadd exp Snack 1\nsummary\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added exp-0 Snack - 1.00"))
        .stdout(predicate::str::contains("33%"));
}

#[test]
fn run_reads_script_file() {
    let (mut cmd, dir) = budgety();
    let script = dir.path().join("month.txt");
    std::fs::write(
        &script,
        "# october\nadd inc \"Monthly salary\" 2500\nadd exp Rent 1000\ndelete exp-0\n",
    )
    .unwrap();
    cmd.args(["run", "--file"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted exp-0"))
        .stdout(predicate::str::contains("+ 2,500.00"));
}

#[test]
fn failed_lines_are_reported() {
    let (mut cmd, _dir) = budgety();
    cmd.arg("run")
        .write_stdin("add exp Rent 0\nadd inc Salary 10\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Added inc-0 Salary + 10.00"))
        .stderr(predicate::str::contains("line 1: value must be positive"));
}

#[test]
fn json_output() {
    let (mut cmd, _dir) = budgety();
    let output = cmd
        .args(["--json", "run"])
        .write_stdin("add inc Salary 100\nadd exp Rent 25\nsummary\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let last = stdout.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(v["budget"]["budget"], 75.0);
    assert_eq!(v["percentages"][0], 25);
}

#[test]
fn config_selects_id_policy() {
    let (mut cmd, dir) = budgety();
    let config = dir.path().join("budgety.toml");
    std::fs::write(&config, "[ledger]\nid_policy = \"from_last_entry\"\n").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("run")
        .write_stdin("add exp a 1\nadd exp b 1\ndelete exp-1\nadd exp c 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added exp-1 c"));
}

#[test]
fn bad_config_fails_fast() {
    let (mut cmd, dir) = budgety();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[ledger]\nid_policy = 3\n").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn config_errors_show_their_cause() {
    let (mut cmd, dir) = budgety();
    cmd.arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: cannot read config"))
        .stderr(predicate::str::contains("caused by:"));
}

#[test]
fn malformed_delete_target_is_reported() {
    let (mut cmd, _dir) = budgety();
    cmd.arg("run")
        .write_stdin("add inc Salary 10\ndelete inc-+0\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "line 2: invalid item reference `inc-+0`",
        ));
}
