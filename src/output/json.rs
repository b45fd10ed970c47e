//! JSON output formatter for machine processing

use crate::domain::{RunResult, RunSummary, UpgradeOutcome};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// up_to_date, applied, cancelled or failed
    status: &'static str,
    /// Reason of a failed run
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    dry_run: bool,
    scanned: usize,
    updatable: usize,
    succeeded: Vec<JsonUpgrade<'a>>,
    failed: Vec<JsonUpgrade<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    lookup_failures: Vec<JsonLookupFailure<'a>>,
}

/// JSON representation of one upgrade
#[derive(Serialize)]
struct JsonUpgrade<'a> {
    /// Module path
    path: &'a str,
    from: String,
    to: String,
    category: &'static str,
    /// Whether the module is a tool dependency
    tool: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonLookupFailure<'a> {
    path: &'a str,
    error: &'a str,
}

impl<'a> JsonUpgrade<'a> {
    fn from_outcome(outcome: &'a UpgradeOutcome) -> Self {
        Self {
            path: &outcome.module.identifier,
            from: outcome.module.current_tag(),
            to: outcome.module.latest_tag(),
            category: outcome.module.category.label(),
            tool: outcome.module.auxiliary,
            error: outcome.error.as_deref(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let (status, error) = match &summary.result {
            RunResult::UpToDate => ("up_to_date", None),
            RunResult::Applied => ("applied", None),
            RunResult::Cancelled => ("cancelled", None),
            RunResult::Failed(detail) => ("failed", Some(detail.as_str())),
        };

        let output = JsonOutput {
            status,
            error,
            dry_run: summary.dry_run,
            scanned: summary.scanned,
            updatable: summary.updatable,
            succeeded: summary.succeeded().iter().map(JsonUpgrade::from_outcome).collect(),
            failed: summary.failed().iter().map(JsonUpgrade::from_outcome).collect(),
            lookup_failures: summary
                .lookup_failures
                .iter()
                .map(|f| JsonLookupFailure {
                    path: &f.identifier,
                    error: &f.detail,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
