//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Colored category labels (major/minor/patch/other)
//! - The paged review list
//! - Per-upgrade and per-lookup result lines
//! - The final summary

use crate::domain::{Module, RunResult, RunSummary, UpdateCategory, UpgradeOutcome};
use crate::output::{OutputFormatter, Verbosity};
use crate::select::SelectionModel;
use colored::Colorize;
use std::io::Write;

/// Minimum width of the identifier column
const MIN_NAME_WIDTH: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self::with_color(verbosity, dry_run, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if !self.dry_run {
            String::new()
        } else if self.color {
            format!("{} ", "(dry-run)".cyan())
        } else {
            "(dry-run) ".to_string()
        }
    }

    /// Category label, colored by significance
    pub fn category_label(&self, category: UpdateCategory) -> String {
        let label = category.label();
        if !self.color {
            return label.to_string();
        }
        match category {
            UpdateCategory::Major => label.red().bold().to_string(),
            UpdateCategory::Minor => label.yellow().to_string(),
            UpdateCategory::Patch => label.green().to_string(),
            _ => label.dimmed().to_string(),
        }
    }

    fn mark(&self, succeeded: bool) -> String {
        match (succeeded, self.color) {
            (true, true) => "✓".green().to_string(),
            (false, true) => "✗".red().to_string(),
            (true, false) => "✓".to_string(),
            (false, false) => "✗".to_string(),
        }
    }

    /// `path  v1.0.0 → v1.1.0 [minor]`, padded to `width`
    pub fn format_module(&self, module: &Module, width: usize) -> String {
        let tool = if module.auxiliary { " (tool)" } else { "" };
        if self.color {
            format!(
                "{:width$} {} {} {} [{}]{}",
                module.identifier,
                module.current_tag().dimmed(),
                "→".dimmed(),
                module.latest_tag().bright_white().bold(),
                self.category_label(module.category),
                tool.dimmed(),
                width = width
            )
        } else {
            format!(
                "{:width$} {} -> {} [{}]{}",
                module.identifier,
                module.current_tag(),
                module.latest_tag(),
                module.category.label(),
                tool,
                width = width
            )
        }
    }

    /// One line for a finished upgrade
    pub fn format_outcome(&self, outcome: &UpgradeOutcome) -> String {
        let prefix = self.dry_run_prefix();
        let mark = self.mark(outcome.succeeded);
        match &outcome.error {
            None => format!(
                "{}{} {} {} → {}",
                prefix,
                mark,
                outcome.module.identifier,
                outcome.module.current_tag(),
                outcome.module.latest_tag()
            ),
            Some(detail) => format!("{}{} {}: {}", prefix, mark, outcome.module.identifier, detail),
        }
    }

    /// One line for a module found during discovery
    pub fn format_found(&self, module: &Module) -> String {
        format!("{} {}", self.mark(true), self.format_module(module, 0))
    }

    /// One line for a failed lookup
    pub fn format_lookup_failure(&self, identifier: &str, detail: &str) -> String {
        format!("{} {}: {}", self.mark(false), identifier, detail)
    }

    /// Write the current page of the review list
    pub fn format_page(&self, model: &SelectionModel, writer: &mut dyn Write) -> std::io::Result<()> {
        let page = model.page();
        let shown = model.visible().len();

        let mut header = format!(
            "Select modules to update ({} of {} selected",
            model.selected_count(),
            model.len()
        );
        if !model.query().is_empty() {
            header.push_str(&format!(", {} shown for \"{}\"", shown, model.query()));
        }
        header.push(')');
        if page.count > 1 {
            header.push_str(&format!(" page {}/{}", page.number + 1, page.count));
        }

        if self.color {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }

        if page.rows.is_empty() {
            let empty = "  (no modules match the filter)";
            if self.color {
                writeln!(writer, "{}", empty.dimmed())?;
            } else {
                writeln!(writer, "{}", empty)?;
            }
        }

        let width = page
            .rows
            .iter()
            .map(|(_, item)| item.module.identifier.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH);
        let index_width = shown.to_string().len();

        for (index, item) in &page.rows {
            let check = match (item.selected, self.color) {
                (true, true) => format!("[{}]", "x".green()),
                (true, false) => "[x]".to_string(),
                (false, _) => "[ ]".to_string(),
            };
            writeln!(
                writer,
                "  {} {:>iw$}. {}",
                check,
                index,
                self.format_module(&item.module, width),
                iw = index_width
            )?;
        }
        Ok(())
    }

    fn write_heading(&self, writer: &mut dyn Write, text: &str) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}:", text.bold())
        } else {
            writeln!(writer, "{}:", text)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_summary(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let quiet = self.verbosity == Verbosity::Quiet;

        match &summary.result {
            // reported on stderr as it happens
            RunResult::Failed(_) => return Ok(()),
            RunResult::UpToDate if !quiet => {
                let msg = "All modules are up to date";
                if self.color {
                    writeln!(writer, "{}{}", prefix, msg.green())?;
                } else {
                    writeln!(writer, "{}{}", prefix, msg)?;
                }
            }
            RunResult::Cancelled if !quiet => {
                if summary.report.total() == 0 {
                    writeln!(writer, "{}Cancelled, nothing was updated", prefix)?;
                } else {
                    writeln!(writer, "{}Cancelled during update", prefix)?;
                }
            }
            _ => {}
        }

        let applied = summary.result == RunResult::Applied || summary.report.total() > 0;
        if !quiet && applied {
            writeln!(writer)?;
            self.write_heading(writer, &format!("{}Summary", prefix))?;
            let updated = summary.succeeded().len();
            if self.color {
                writeln!(writer, "  {} module(s) updated", updated.to_string().green())?;
            } else {
                writeln!(writer, "  {} module(s) updated", updated)?;
            }
            if self.verbosity == Verbosity::Verbose {
                for outcome in summary.succeeded() {
                    writeln!(writer, "    {}", self.format_outcome(outcome))?;
                }
            }
        }

        if !summary.failed().is_empty() {
            let failed = summary.failed().len();
            if self.color {
                writeln!(writer, "  {} module(s) failed", failed.to_string().red())?;
            } else {
                writeln!(writer, "  {} module(s) failed", failed)?;
            }
            for outcome in summary.failed() {
                writeln!(writer, "    {}", self.format_outcome(outcome))?;
            }
        }

        if !summary.lookup_failures.is_empty() {
            let count = summary.lookup_failures.len();
            if self.color {
                writeln!(writer, "  {} lookup(s) failed", count.to_string().red())?;
            } else {
                writeln!(writer, "  {} lookup(s) failed", count)?;
            }
            for failure in &summary.lookup_failures {
                writeln!(
                    writer,
                    "    {}",
                    self.format_lookup_failure(&failure.identifier, &failure.detail)
                )?;
            }
        }

        Ok(())
    }
}
