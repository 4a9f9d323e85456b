//! Command-line tests for the f90ops binary
//!
//! These tests run the built binary on temporary files and check its output
//! and exit codes.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("comparison_operators.f90")
}

fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn check_fixture_reports_findings() {
    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg(fixture_path()).arg("--silent");

    let output_pred = predicate::str::contains(":9:14: legacy operator '.ge.' should be '>='")
        .and(predicate::str::contains("legacy operator '.ne.' should be '/='"))
        .and(predicate::str::contains("'ia .ge. 1").not());

    cmd.assert().code(1).stdout(output_pred);
}

#[test]
fn clean_file_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(dir.path(), "clean.f90", "if (a >= b) print *, 'a .ge. b'\n");

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Found 0 legacy operators in 1 files"));
}

#[test]
fn missing_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let found = write_source(dir.path(), "found.f90", "if (a .lt. b) x = 1\n");

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg(&found).arg(dir.path().join("missing.f90"));
    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains("legacy operator '.lt.' should be '<'"))
        .stderr(predicate::str::contains("missing.f90"));
}

#[test]
fn invalid_operator_list_is_rejected() {
    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--operators").arg("eqv").arg(fixture_path());
    cmd.assert().failure();
}

#[test]
fn operators_option_limits_findings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(dir.path(), "a.f90", "if (a .lt. b .and. c .eq. d) x = 1\n");

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("-o").arg("eq").arg("-S").arg(&path);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("'.eq.'").and(predicate::str::contains("'.lt.'").not()));
}

#[test]
fn fix_rewrites_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        dir.path(),
        "a.f90",
        "if (a .LT. b) print *, 'a .lt. b' ! .lt.\n",
    );

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--fix").arg("-S").arg(&path);
    cmd.assert().success().stdout(predicate::str::is_empty());

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "if (a < b) print *, 'a .lt. b' ! .lt.\n"
    );

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg(&path);
    cmd.assert().success();
}

#[test]
fn fix_to_stdout_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let source = "if (a .ge. b) x = 1\n";
    let path = write_source(dir.path(), "a.f90", source);

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--fix").arg("--stdout").arg("-S").arg(&path);
    cmd.assert().success().stdout("if (a >= b) x = 1\n");

    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn stdin_is_reported_as_stdin() {
    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("-").write_stdin("if (ib .gt. 5) x = 1\n");
    cmd.assert().code(1).stdout(predicate::str::contains(
        "<stdin>:1:8: legacy operator '.gt.' should be '>'",
    ));
}

#[test]
fn warnings_go_to_stderr() {
    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("-").write_stdin("x = 1 + &\n");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "<stdin>:1: warning: continuation marker '&' has no following line",
        ));

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--no-warnings").arg("-").write_stdin("x = 1 + &\n");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("warning").not());
}

#[test]
fn directive_disables_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        dir.path(),
        "a.f90",
        "! f90ops: --disable\nif (a .ge. b) x = 1\n",
    );

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg(&path);
    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn config_file_selects_operators() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("f90ops.toml"), "operators = [\"ne\"]\n").unwrap();
    let path = write_source(dir.path(), "a.f90", "if (a .ge. b) x = 1\n");

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg(&path);
    cmd.assert().success();

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--operators").arg("ge").arg(&path);
    cmd.assert().code(1);
}

#[test]
fn invalid_explicit_config_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "operators = []\n").unwrap();
    let path = write_source(dir.path(), "a.f90", "x = 1\n");

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--config").arg(&config).arg(&path);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn recursive_directory_with_exclude() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src");
    let build = dir.path().join("build");
    fs::create_dir_all(&nested).unwrap();
    fs::create_dir_all(&build).unwrap();
    write_source(&nested, "a.f90", "if (a .eq. b) x = 1\n");
    write_source(&nested, "notes.txt", "a .eq. b\n");
    write_source(&build, "gen.f90", "if (a .ne. b) x = 1\n");

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("-r").arg("-e").arg("build").arg("-S").arg(dir.path());
    cmd.assert().code(1).stdout(
        predicate::str::contains("a.f90:1:7:")
            .and(predicate::str::contains("gen.f90").not())
            .and(predicate::str::contains("notes.txt").not()),
    );
}

#[test]
fn parallel_output_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let names: Vec<String> = (0..8).map(|i| format!("f{i}.f90")).collect();
    let paths: Vec<PathBuf> = names
        .iter()
        .map(|name| write_source(dir.path(), name, "if (a .ne. b) x = 1\n"))
        .collect();

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("-j").arg("2").arg("-S");
    // Reverse order so sorted output would not pass by accident
    for path in paths.iter().rev() {
        cmd.arg(path);
    }
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let reported: Vec<&str> = stdout.lines().collect();
    let expected: Vec<String> = paths
        .iter()
        .rev()
        .map(|path| {
            format!(
                "{}:1:7: legacy operator '.ne.' should be '/='",
                path.display()
            )
        })
        .collect();
    assert_eq!(reported, expected);
}

#[test]
fn stdout_without_fix_still_reports() {
    let dir = tempfile::tempdir().unwrap();
    let source = "if (a .ge. b) x = 1\n";
    let first = write_source(dir.path(), "b.f90", source);
    let second = write_source(dir.path(), "a.f90", source);

    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.arg("--stdout").arg("-S").arg(&first).arg(&second);
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let expected = format!(
        "{}:1:7: legacy operator '.ge.' should be '>='\n{}:1:7: legacy operator '.ge.' should be '>='\n",
        first.display(),
        second.display()
    );
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);

    assert_eq!(fs::read_to_string(&first).unwrap(), source);
}

#[test]
fn relative_input_finds_config_above_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path().join("work");
    let src = work.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(dir.path().join("f90ops.toml"), "operators = [\"ne\"]\n").unwrap();
    write_source(&src, "a.f90", "if (a .ge. b) x = 1\n");

    // Only `.ge.` is present, and the config above `work` disables it
    let mut cmd = cargo_bin_cmd!("f90ops");
    cmd.current_dir(&work).arg("src/a.f90");
    cmd.assert().success().stdout(predicate::str::is_empty());
}
