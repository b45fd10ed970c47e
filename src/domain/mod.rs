//! Core domain models for modup
//!
//! This module contains the fundamental types used throughout the application:
//! - Version delta categories and the classifier
//! - Candidate and module records
//! - Reasons a candidate is not offered
//! - Upgrade outcomes and the upgrade report
//! - The run summary

mod category;
mod module;
mod outcome;
mod skip_reason;
mod summary;

pub use category::UpdateCategory;
pub use module::{parse_version, precedence, version_tag, Candidate, Module};
pub use outcome::{LookupFailure, UpgradeOutcome, UpgradeReport};
pub use skip_reason::SkipReason;
pub use summary::{RunResult, RunSummary};
