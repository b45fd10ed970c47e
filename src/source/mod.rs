//! External capabilities for discovering and applying upgrades
//!
//! This module provides:
//! - The `CandidateSource` and `Upgrader` traits the core depends on
//! - A `go` toolchain implementation of both
//! - A dry-run upgrader and the post-upgrade hook runner

mod command;
mod go;
mod hook;

pub use command::CommandRunner;
pub use go::{parse_go_version, parse_list_module, parse_tool_list, GoToolchain, TOOLS_MIN_GO};
pub use hook::Hook;

use crate::domain::Candidate;
use crate::error::{ApplyError, EnumerationError, QueryError};
use async_trait::async_trait;
use semver::Version;

/// Result of looking up one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInfo {
    /// Version currently required, as reported
    pub current: String,
    /// Newer version if one exists; `None` means already current
    pub latest: Option<String>,
}

impl CandidateInfo {
    /// Creates an info with an available update
    pub fn update(current: impl Into<String>, latest: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            latest: Some(latest.into()),
        }
    }

    /// Creates an info for a module that is already current
    pub fn current(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            latest: None,
        }
    }
}

/// Source of candidates and version facts
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Enumerate the identifiers to scan
    async fn list_candidates(&self) -> Result<Vec<String>, EnumerationError>;

    /// Look up current and latest version for one candidate
    ///
    /// Tool candidates are offered whatever their place in the module graph.
    async fn query_candidate(&self, candidate: &Candidate) -> Result<CandidateInfo, QueryError>;

    /// Whether the auxiliary enumeration is available in this environment
    async fn auxiliary_supported(&self) -> bool;

    /// Enumerate auxiliary candidates with their current versions
    async fn list_auxiliary_candidates(&self) -> Result<Vec<Candidate>, EnumerationError>;
}

/// Performs one upgrade
#[async_trait]
pub trait Upgrader: Send + Sync {
    /// Move `identifier` to `target`
    async fn apply_upgrade(&self, identifier: &str, target: &Version) -> Result<(), ApplyError>;
}

/// Upgrader that reports success without changing anything
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

#[async_trait]
impl Upgrader for DryRun {
    async fn apply_upgrade(&self, _identifier: &str, _target: &Version) -> Result<(), ApplyError> {
        Ok(())
    }
}
