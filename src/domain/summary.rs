//! Run summary types
//!
//! Provides the terminal record of one run: how it ended, what was applied
//! and what failed along the way.

use super::{LookupFailure, UpgradeOutcome, UpgradeReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum RunResult {
    /// Nothing to upgrade
    UpToDate,
    /// A batch was applied (some items may have failed)
    Applied,
    /// The operator quit before applying
    Cancelled,
    /// An unrecoverable error ended the run
    Failed(String),
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunResult::UpToDate => write!(f, "up to date"),
            RunResult::Applied => write!(f, "applied"),
            RunResult::Cancelled => write!(f, "cancelled"),
            RunResult::Failed(detail) => write!(f, "failed: {}", detail),
        }
    }
}

/// Overall summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// How the run ended
    pub result: RunResult,
    /// Whether upgrades were simulated
    pub dry_run: bool,
    /// Candidates looked up
    pub scanned: usize,
    /// Candidates with a newer version
    pub updatable: usize,
    /// Applied and failed upgrades
    pub report: UpgradeReport,
    /// Lookups that failed during discovery
    pub lookup_failures: Vec<LookupFailure>,
}

impl RunSummary {
    /// Creates an empty summary with the given result
    pub fn new(result: RunResult, dry_run: bool) -> Self {
        Self {
            result,
            dry_run,
            scanned: 0,
            updatable: 0,
            report: UpgradeReport::new(),
            lookup_failures: Vec::new(),
        }
    }

    /// Upgrades that were applied
    pub fn succeeded(&self) -> &[UpgradeOutcome] {
        &self.report.succeeded
    }

    /// Upgrades that failed
    pub fn failed(&self) -> &[UpgradeOutcome] {
        &self.report.failed
    }

    /// Returns true if any lookup or upgrade failed
    pub fn has_failures(&self) -> bool {
        self.report.has_failures() || !self.lookup_failures.is_empty()
    }

    /// Process exit code: 0 success, 2 partial failure, 1 unrecoverable
    pub fn exit_code(&self) -> u8 {
        match self.result {
            RunResult::Failed(_) => 1,
            _ if self.has_failures() => 2,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_version, Module};

    fn module(name: &str) -> Module {
        Module::new(
            name,
            parse_version("v1.0.0").unwrap(),
            parse_version("v1.0.1").unwrap(),
            false,
        )
    }

    #[test]
    fn test_exit_code_success() {
        assert_eq!(RunSummary::new(RunResult::UpToDate, false).exit_code(), 0);
        assert_eq!(RunSummary::new(RunResult::Cancelled, false).exit_code(), 0);

        let mut summary = RunSummary::new(RunResult::Applied, false);
        summary.report.record(UpgradeOutcome::success(module("a")));
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_partial_failure() {
        let mut summary = RunSummary::new(RunResult::Applied, false);
        summary.report.record(UpgradeOutcome::success(module("a")));
        summary
            .report
            .record(UpgradeOutcome::failure(module("b"), "boom"));
        assert!(summary.has_failures());
        assert_eq!(summary.exit_code(), 2);

        let mut summary = RunSummary::new(RunResult::UpToDate, false);
        summary.lookup_failures.push(LookupFailure {
            identifier: "c".to_string(),
            detail: "timeout".to_string(),
        });
        assert_eq!(summary.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_failed() {
        let summary = RunSummary::new(RunResult::Failed("no go.mod".to_string()), false);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_run_result_display() {
        assert_eq!(RunResult::UpToDate.to_string(), "up to date");
        assert_eq!(
            RunResult::Failed("boom".to_string()).to_string(),
            "failed: boom"
        );
    }

    #[test]
    fn test_run_result_serializes_with_status_tag() {
        let json = serde_json::to_value(RunResult::Failed("x".to_string())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["detail"], "x");
        let json = serde_json::to_value(RunResult::Applied).unwrap();
        assert_eq!(json["status"], "applied");
    }
}
