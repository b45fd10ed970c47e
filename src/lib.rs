//! modup - Interactive Go module upgrader library
//!
//! This library provides the pieces of one upgrade run:
//! - Discovery: enumerate modules and look up newer versions concurrently
//! - Review: classify each upgrade and let the operator pick a batch
//! - Apply: run the chosen upgrades and report each outcome

pub mod apply;
pub mod cli;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod scan;
pub mod select;
pub mod source;
