//! Upgrade outcome and run report types

use super::Module;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal record of one applied upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeOutcome {
    /// The module that was upgraded
    pub module: Module,
    /// Whether the upgrade succeeded
    pub succeeded: bool,
    /// Error detail for a failed upgrade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpgradeOutcome {
    /// Creates a successful outcome
    pub fn success(module: Module) -> Self {
        Self {
            module,
            succeeded: true,
            error: None,
        }
    }

    /// Creates a failed outcome
    pub fn failure(module: Module, detail: impl Into<String>) -> Self {
        Self {
            module,
            succeeded: false,
            error: Some(detail.into()),
        }
    }
}

impl fmt::Display for UpgradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "{}: upgraded to {}", self.module.identifier, self.module.latest_tag()),
            Some(detail) => write!(f, "{}: failed ({})", self.module.identifier, detail),
        }
    }
}

/// A lookup that failed during discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    /// Module path
    pub identifier: String,
    /// Error detail
    pub detail: String,
}

/// Succeeded and failed upgrades, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReport {
    /// Upgrades that were applied
    pub succeeded: Vec<UpgradeOutcome>,
    /// Upgrades that failed
    pub failed: Vec<UpgradeOutcome>,
}

impl UpgradeReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome to the matching list
    pub fn record(&mut self, outcome: UpgradeOutcome) {
        if outcome.succeeded {
            self.succeeded.push(outcome);
        } else {
            self.failed.push(outcome);
        }
    }

    /// Number of outcomes recorded
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns true if any upgrade failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Identifiers of failed upgrades
    pub fn failed_identifiers(&self) -> Vec<&str> {
        self.failed
            .iter()
            .map(|o| o.module.identifier.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_version;

    fn module(name: &str) -> Module {
        Module::new(
            name,
            parse_version("v1.0.0").unwrap(),
            parse_version("v1.1.0").unwrap(),
            false,
        )
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = UpgradeOutcome::success(module("a"));
        assert!(ok.succeeded);
        assert!(ok.error.is_none());

        let failed = UpgradeOutcome::failure(module("b"), "go get failed");
        assert!(!failed.succeeded);
        assert_eq!(failed.error.as_deref(), Some("go get failed"));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            UpgradeOutcome::success(module("a")).to_string(),
            "a: upgraded to v1.1.0"
        );
        assert_eq!(
            UpgradeOutcome::failure(module("b"), "boom").to_string(),
            "b: failed (boom)"
        );
    }

    #[test]
    fn test_report_record() {
        let mut report = UpgradeReport::new();
        report.record(UpgradeOutcome::success(module("a")));
        report.record(UpgradeOutcome::failure(module("b"), "boom"));
        report.record(UpgradeOutcome::success(module("c")));

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded.len(), 2);
        assert!(report.has_failures());
        assert_eq!(report.failed_identifiers(), vec!["b"]);
    }

    #[test]
    fn test_report_serializes_without_empty_error() {
        let mut report = UpgradeReport::new();
        report.record(UpgradeOutcome::success(module("a")));
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"succeeded\":true"));
    }
}
