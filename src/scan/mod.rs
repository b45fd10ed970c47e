//! Discovery of available upgrades
//!
//! This module provides:
//! - The candidate queue with exactly-once delivery and progress counters
//! - The bounded-concurrency scanner and the events it emits

mod queue;
mod scanner;

pub use queue::CandidateQueue;
pub use scanner::{assess, ScanConfig, ScanHandle, Scanner, DEFAULT_CONCURRENCY};

use crate::domain::{Module, SkipReason};
use clap::ValueEnum;

/// Scheduling of auxiliary (tool) candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AuxiliaryMode {
    /// Share the worker pool and its concurrency limit
    #[default]
    Batched,
    /// Look each one up immediately, outside the limit
    Unbatched,
}

/// Event sent from the scanner to the control loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A lookup was issued
    Started(String),
    /// An updatable module was found
    Found(Module),
    /// The candidate has nothing to offer
    Skipped { identifier: String, reason: SkipReason },
    /// The lookup failed
    Failed { identifier: String, detail: String },
    /// One more candidate reached a terminal event
    Progress,
    /// Every candidate reached a terminal event
    Finished,
}

impl ScanEvent {
    /// Identifier of a terminal event (`Found`, `Skipped`, `Failed`)
    pub fn terminal_identifier(&self) -> Option<&str> {
        match self {
            ScanEvent::Found(module) => Some(&module.identifier),
            ScanEvent::Skipped { identifier, .. } | ScanEvent::Failed { identifier, .. } => {
                Some(identifier)
            }
            ScanEvent::Started(_) | ScanEvent::Progress | ScanEvent::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_version;

    #[test]
    fn test_terminal_identifier() {
        let module = Module::new(
            "a",
            parse_version("1.0.0").unwrap(),
            parse_version("1.1.0").unwrap(),
            false,
        );
        assert_eq!(ScanEvent::Found(module).terminal_identifier(), Some("a"));
        assert_eq!(
            ScanEvent::Skipped {
                identifier: "b".to_string(),
                reason: SkipReason::AlreadyCurrent
            }
            .terminal_identifier(),
            Some("b")
        );
        assert_eq!(
            ScanEvent::Failed {
                identifier: "c".to_string(),
                detail: "x".to_string()
            }
            .terminal_identifier(),
            Some("c")
        );
        assert_eq!(ScanEvent::Started("d".to_string()).terminal_identifier(), None);
        assert_eq!(ScanEvent::Progress.terminal_identifier(), None);
    }

    #[test]
    fn test_auxiliary_mode_default() {
        assert_eq!(AuxiliaryMode::default(), AuxiliaryMode::Batched);
    }
}
