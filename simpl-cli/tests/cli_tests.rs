//! Integration tests for the simpl CLI.
//!
//! These tests invoke the `simpl` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn simpl() -> Command {
    let mut cmd = Command::cargo_bin("simpl").unwrap();
    cmd.env_remove("SIMPL_LOG");
    cmd
}

/// Return the absolute path to a test program file.
fn test_program(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/programs")
        .join(name)
}

fn program_arg(name: &str) -> String {
    test_program(name).to_str().unwrap().to_string()
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    simpl()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: simpl"));
}

#[test]
fn help_flag_exits_0() {
    simpl()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    simpl()
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown command 'frobnicate'"));
}

#[test]
fn missing_file_exits_1() {
    simpl()
        .args(["run", "/nonexistent/prog.simpl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// ---- run ----

#[test]
fn run_hello() {
    simpl()
        .args(["run", &program_arg("hello.simpl")])
        .assert()
        .success()
        .stdout("hello, simpl\n");
}

#[test]
fn run_factorial() {
    simpl()
        .args(["run", &program_arg("factorial.simpl")])
        .assert()
        .success()
        .stdout("1\n2\n6\n24\n120\n");
}

#[test]
fn run_classify() {
    simpl()
        .args(["run", &program_arg("classify.simpl")])
        .assert()
        .success()
        .stdout("negative\nzero\npositive\n");
}

#[test]
fn syntax_error_exits_1() {
    simpl()
        .args(["run", &program_arg("syntax_error.simpl")])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("expected ';' after print"));
}

#[test]
fn semantic_error_exits_2() {
    simpl()
        .args(["run", &program_arg("type_error.simpl")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("type mismatch"));
}

/// Write `source` into a fresh temp dir and return both.
fn source_file(source: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prog.simpl");
    fs::write(&path, source).unwrap();
    (dir, path)
}

#[test]
fn deep_nesting_exits_1_without_crashing() {
    let (_dir, path) = source_file(&format!("func main() {{ print({}1); }}", "-".repeat(20_000)));
    simpl()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nesting deeper than 128 levels"));
}

#[test]
fn mismatch_with_later_function_exits_2() {
    let (_dir, path) = source_file(
        r#"
        func main() { string s = later(); if s == "x" { print(1); } }
        func later() { return 7; }
        "#,
    );
    simpl()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("type mismatch"));
}

#[test]
fn most_negative_literal() {
    let (_dir, path) = source_file("func main() { print(-9223372036854775808); }");
    simpl()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("-9223372036854775808\n");
}

#[test]
fn runtime_error_exits_3_after_partial_output() {
    simpl()
        .args(["run", &program_arg("div_zero.simpl")])
        .assert()
        .code(3)
        .stdout("before\n")
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn max_depth_limits_recursion() {
    simpl()
        .args(["run", &program_arg("forever.simpl"), "--max-depth", "100"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("call depth exceeded limit 100"));
}

#[test]
fn max_steps_limits_execution() {
    simpl()
        .args([
            "run",
            &program_arg("factorial.simpl"),
            "--max-steps",
            "20",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("step limit 20 exceeded"));
}

#[test]
fn bad_limit_value_exits_1() {
    simpl()
        .args(["run", &program_arg("hello.simpl"), "--max-steps", "lots"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expects a non-negative integer"));
}

// ---- check / tokens / ast ----

#[test]
fn check_ok() {
    simpl()
        .args(["check", &program_arg("factorial.simpl")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("OK: "));
}

#[test]
fn check_reports_semantic_error() {
    simpl()
        .args(["check", &program_arg("type_error.simpl")])
        .assert()
        .code(2);
}

#[test]
fn tokens_lists_positions_and_kinds() {
    simpl()
        .args(["tokens", &program_arg("hello.simpl")])
        .assert()
        .success()
        .stdout(predicate::str::contains("2:1\t'func'"))
        .stdout(predicate::str::contains("identifier 'greeting'"))
        .stdout(predicate::str::contains("end of input"));
}

#[test]
fn ast_prints_tree() {
    simpl()
        .args(["ast", &program_arg("factorial.simpl")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Program\n"))
        .stdout(predicate::str::contains("Function(fact)"))
        .stdout(predicate::str::contains("While"));
}

// ---- ir / exec / verify ----

#[test]
fn ir_prints_three_address_code() {
    simpl()
        .args(["ir", &program_arg("hello.simpl")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("func_start main  \n"))
        .stdout(predicate::str::contains("print greeting  \n"));
}

#[test]
fn ir_to_file_then_exec() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("factorial.tac");
    simpl()
        .args([
            "ir",
            &program_arg("factorial.simpl"),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote"));

    assert!(fs::read_to_string(&out).unwrap().contains("call fact 1 "));

    simpl()
        .args(["exec", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout("1\n2\n6\n24\n120\n");
}

#[test]
fn exec_hand_written_ir() {
    simpl()
        .args(["exec", &program_arg("factorial.tac")])
        .assert()
        .success()
        .stdout("3628800\n");
}

#[test]
fn exec_runtime_type_error_exits_3() {
    simpl()
        .args(["exec", &program_arg("type_error.tac")])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("'add' expects number, found string"));
}

#[test]
fn verify_ok() {
    simpl()
        .args(["verify", &program_arg("factorial.tac")])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK:"))
        .stdout(predicate::str::contains("(19 instructions)"));
}

#[test]
fn verify_reports_undefined_label() {
    simpl()
        .args(["verify", &program_arg("bad_label.tac")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("undefined label 'missing'"));
}

#[test]
fn unknown_opcode_exits_1_with_line() {
    simpl()
        .args(["exec", &program_arg("bad_opcode.tac")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 2: unknown opcode 'jump'"));
}

// ---- logging ----

#[test]
fn debug_logging_goes_to_stderr_only() {
    simpl()
        .args(["run", &program_arg("hello.simpl"), "--log", "debug"])
        .assert()
        .success()
        .stdout("hello, simpl\n")
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn env_var_sets_level() {
    simpl()
        .env("SIMPL_LOG", "trace")
        .args(["run", &program_arg("hello.simpl")])
        .assert()
        .success()
        .stderr(predicate::str::contains("dispatch"));
}

#[test]
fn bad_log_level_exits_1() {
    simpl()
        .args(["run", &program_arg("hello.simpl"), "--log", "loud"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown log level"));
}
