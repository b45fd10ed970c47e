//! Live output during a run
//!
//! Human lines go to stdout (stderr in JSON mode, so stdout carries only
//! the document), diagnostics go to stderr when verbose, and every line is
//! printed with the progress bar suspended. Quiet mode drops scan and apply
//! chatter but keeps the review list and prompt.

use super::{create_formatter, OutputConfig, OutputFormat, TextFormatter, Verbosity};
use crate::apply::ApplyEvent;
use crate::domain::RunSummary;
use crate::progress::Progress;
use crate::scan::ScanEvent;
use crate::select::{SelectionModel, HELP};
use std::io::Write;

/// Routes run output to the terminal
pub struct Reporter {
    config: OutputConfig,
    text: TextFormatter,
    progress: Progress,
    review: bool,
}

impl Reporter {
    /// Create a reporter; progress bars are off in quiet and JSON mode
    pub fn new(config: OutputConfig) -> Self {
        let show_progress =
            config.verbosity != Verbosity::Quiet && config.format == OutputFormat::Text;
        Self::with_progress(config, Progress::new(show_progress))
    }

    /// Create a reporter with an explicit progress display
    pub fn with_progress(config: OutputConfig, progress: Progress) -> Self {
        let text = TextFormatter::with_color(config.verbosity, config.dry_run, config.color);
        Self {
            config,
            text,
            progress,
            review: true,
        }
    }

    /// A reporter that prints nothing but errors and has no progress bar
    pub fn silent() -> Self {
        let config = OutputConfig {
            verbosity: Verbosity::Quiet,
            color: false,
            ..OutputConfig::default()
        };
        Self {
            review: false,
            ..Self::with_progress(config, Progress::disabled())
        }
    }

    /// Whether the review list and prompt are shown
    pub fn shows_review(&self) -> bool {
        self.review
    }

    fn quiet(&self) -> bool {
        self.config.verbosity == Verbosity::Quiet
    }

    /// Print a human-facing line unless quiet
    pub fn line(&self, text: &str) {
        if !self.quiet() {
            self.print(text);
        }
    }

    fn print(&self, text: &str) {
        let json = self.config.format == OutputFormat::Json;
        self.progress.suspend(|| {
            if json {
                eprintln!("{}", text);
            } else {
                println!("{}", text);
            }
        });
    }

    /// Print an error line; shown even when quiet
    pub fn error(&self, text: &str) {
        self.progress.suspend(|| eprintln!("{}", text));
    }

    /// Print a diagnostic line to stderr when verbose
    pub fn verbose(&self, text: &str) {
        if self.config.verbosity == Verbosity::Verbose {
            self.progress.suspend(|| eprintln!("[modup] {}", text));
        }
    }

    /// Advance spinner animations
    pub fn tick(&self) {
        self.progress.tick();
    }

    pub fn scan_started(&mut self, total: usize) {
        self.verbose(&format!("checking {} candidate(s)", total));
        self.progress.start(total as u64, "Checking for updates");
    }

    /// Report one scan event; counters are passed by the caller
    pub fn scan_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::Started(identifier) => self.verbose(&format!("lookup {}", identifier)),
            ScanEvent::Found(module) => self.line(&self.text.format_found(module)),
            ScanEvent::Skipped { identifier, reason } => {
                self.verbose(&format!("skip {}: {}", identifier, reason))
            }
            ScanEvent::Failed { identifier, detail } => {
                self.error(&self.text.format_lookup_failure(identifier, detail))
            }
            ScanEvent::Progress | ScanEvent::Finished => {}
        }
    }

    /// Update the scan bar
    pub fn scan_progress(&self, completed: usize, in_flight: &[String]) {
        self.progress.set_position(completed as u64);
        self.progress.set_in_flight(in_flight);
    }

    pub fn scan_finished(&mut self) {
        self.progress.finish_and_clear();
    }

    /// Show the current page of the review list and the prompt
    pub fn show_page(&self, model: &SelectionModel) {
        if !self.review {
            return;
        }
        let mut buf = Vec::new();
        if self.text.format_page(model, &mut buf).is_ok() {
            self.print(String::from_utf8_lossy(&buf).trim_end());
        }
        self.prompt();
    }

    fn prompt(&self) {
        let hint = "Rows to toggle, a: all, /text: filter, u/Enter: update, q: quit, ?: help";
        let json = self.config.format == OutputFormat::Json;
        self.progress.suspend(|| {
            if json {
                eprint!("{}\n> ", hint);
                let _ = std::io::stderr().flush();
            } else {
                print!("{}\n> ", hint);
                let _ = std::io::stdout().flush();
            }
        });
    }

    /// Print the prompt help
    pub fn help(&self) {
        if self.review {
            self.print(HELP);
            self.prompt();
        }
    }

    /// Print a message during review and prompt again
    pub fn notice(&self, text: &str) {
        if self.review {
            self.print(text);
            self.prompt();
        }
    }

    pub fn apply_started(&mut self, total: usize) {
        let prefix = if self.config.dry_run {
            "Simulating updates"
        } else {
            "Updating"
        };
        self.verbose(&format!("applying {} upgrade(s)", total));
        self.progress.start(total as u64, prefix);
    }

    /// Report one executor event
    pub fn apply_event(&mut self, event: &ApplyEvent) {
        match event {
            ApplyEvent::Started(identifier) => {
                self.progress.set_message(identifier);
                self.verbose(&format!("go get {}", identifier));
            }
            ApplyEvent::Outcome(outcome) => {
                self.progress.inc();
                let line = self.text.format_outcome(outcome);
                if outcome.succeeded {
                    self.line(&line);
                } else {
                    self.error(&line);
                }
            }
            ApplyEvent::Finished => self.progress.finish_and_clear(),
        }
    }

    /// Stop any bar, e.g. on cancellation
    pub fn clear(&mut self) {
        self.progress.finish_and_clear();
    }

    /// Write the final summary to stdout
    pub fn summary(&mut self, summary: &RunSummary) -> std::io::Result<()> {
        self.progress.finish_and_clear();
        let formatter = create_formatter(&self.config);
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        formatter.format_summary(summary, &mut handle)?;
        handle.flush()
    }
}
