//! Progress display for scanning and applying
//!
//! Provides visual feedback during long phases using indicatif. The bar
//! message shows what is currently in flight; lines printed through
//! [`Progress::suspend`] appear above the bar without tearing it.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Identifiers shown in the bar message before collapsing into a count
const MAX_SHOWN_IN_FLIGHT: usize = 3;

/// Progress reporter for one phase at a time
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet and JSON mode)
    enabled: bool,
    /// Current progress bar
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Returns true if a bar is currently shown
    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Start a progress bar for a known number of items
    pub fn start(&mut self, total: u64, prefix: &str) {
        if !self.enabled {
            return;
        }
        self.finish_and_clear();

        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg:.dim}")
            .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ").progress_chars("█▓▒░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(total);
        bar.set_style(style);
        bar.set_prefix(prefix.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Increment progress by one
    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Set the absolute position
    pub fn set_position(&self, position: u64) {
        if let Some(ref bar) = self.bar {
            bar.set_position(position);
        }
    }

    /// Update the message
    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Show the identifiers currently being worked on
    pub fn set_in_flight(&self, identifiers: &[String]) {
        self.set_message(&in_flight_message(identifiers));
    }

    /// Advance the spinner without changing the position
    pub fn tick(&self) {
        if let Some(ref bar) = self.bar {
            bar.tick();
        }
    }

    /// Run `f` with the bar hidden, so it can print freely
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match self.bar {
            Some(ref bar) => bar.suspend(f),
            None => f(),
        }
    }

    /// Finish and clear the current progress bar
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

/// `a, b, c (+2)` style summary of in-flight identifiers
pub fn in_flight_message(identifiers: &[String]) -> String {
    let shown: Vec<&str> = identifiers
        .iter()
        .take(MAX_SHOWN_IN_FLIGHT)
        .map(String::as_str)
        .collect();
    let rest = identifiers.len().saturating_sub(MAX_SHOWN_IN_FLIGHT);
    if rest > 0 {
        format!("{} (+{})", shown.join(", "), rest)
    } else {
        shown.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.start(10, "test");
        assert!(!progress.is_active());
        progress.inc();
        progress.set_position(3);
        progress.set_in_flight(&ids(&["a"]));
        progress.tick();
        assert_eq!(progress.suspend(|| 7), 7);
        progress.finish_and_clear();
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(3, "Checking");
        assert!(progress.is_active());
        progress.inc();
        progress.set_message("item 1");
        progress.inc();
        progress.finish_and_clear();
        assert!(!progress.is_active());
    }

    #[test]
    fn test_in_flight_message() {
        assert_eq!(in_flight_message(&[]), "");
        assert_eq!(in_flight_message(&ids(&["a", "b"])), "a, b");
        assert_eq!(
            in_flight_message(&ids(&["a", "b", "c", "d", "e"])),
            "a, b, c (+2)"
        );
    }
}
