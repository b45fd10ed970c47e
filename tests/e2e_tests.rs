//! End-to-end tests for the modup CLI
//!
//! These tests verify:
//! - Help and version output
//! - Argument validation and its exit codes
//!
//! Runs that reach the `go` toolchain are not exercised here.

use assert_cmd::Command;
use predicates::prelude::*;

fn modup() -> Command {
    Command::new(env!("CARGO_BIN_EXE_modup"))
}

mod help_tests {
    use super::*;

    #[test]
    fn test_help_lists_options() {
        modup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("modup"))
            .stdout(predicate::str::contains("--dry-run"))
            .stdout(predicate::str::contains("--pagesize"))
            .stdout(predicate::str::contains("--hook"));
    }

    #[test]
    fn test_version_output() {
        modup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_zero_parallel_is_rejected() {
        modup()
            .args(["--parallel", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("at least 1"));
    }

    #[test]
    fn test_unknown_filter_mode_is_rejected() {
        modup().args(["--filter-mode", "fuzzy"]).assert().failure();
    }

    #[test]
    fn test_nonexistent_path_exits_with_error() {
        modup()
            .args(["--force", "/nonexistent/path/that/does/not/exist"])
            .assert()
            .code(1)
            .stderr(predicate::str::starts_with("Error:"));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let dir = tempfile::tempdir().unwrap();
        modup()
            .arg(dir.path())
            .args(["--verbose", "--quiet"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--verbose"));
    }

    #[test]
    fn test_missing_hook_exits_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let hook = dir.path().join("missing-hook.sh");
        modup()
            .arg(dir.path())
            .arg("--hook")
            .arg(&hook)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("hook"));
    }
}
