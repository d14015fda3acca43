//! Binary-level CLI tests.
//!
//! These run the actual `deskclock` binary and verify argument handling
//! without a daemon:
//! - TC-C-001: Help output
//! - TC-C-002: Version output
//! - TC-C-003: Invalid arguments are rejected
//! - TC-C-004: Completion script generation

use assert_cmd::Command;
use predicates::prelude::*;

/// TC-C-001: ヘルプ表示
#[test]
fn tc_c_001_help_output() {
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deskclock"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("alarm"))
        .stdout(predicate::str::contains("stopwatch"))
        .stdout(predicate::str::contains("timer"));
}

/// TC-C-002: バージョン表示
#[test]
fn tc_c_002_version_output() {
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deskclock"));
}

/// TC-C-003: 不正な引数
#[test]
fn tc_c_003_invalid_arguments_rejected() {
    // Unknown subcommand
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.arg("snooze").assert().failure();

    // Bad alarm time format
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["alarm", "add", "0730"]).assert().failure();

    // Out-of-range alarm time
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["alarm", "add", "24:00"]).assert().failure();

    // Out-of-range timer duration
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["timer", "start", "--minutes", "60"])
        .assert()
        .failure();

    // Zero alarm delete number (the list is 1-based)
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["alarm", "delete", "0"]).assert().failure();
}

/// TC-C-004: 補完スクリプト生成
#[test]
fn tc_c_004_completions_generation() {
    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deskclock"));

    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["completions", "zsh"]).assert().success();

    let mut cmd = Command::cargo_bin("deskclock").unwrap();
    cmd.args(["completions", "nushell"]).assert().failure();
}
