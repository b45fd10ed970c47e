//! `go` toolchain adapter
//!
//! Module discovery, version lookup and upgrades are delegated to the `go`
//! command run in the project directory with `GOWORK=off`:
//! - `go list -m -f {{.Path}} all` enumerates modules
//! - `go list -m -u -json <path>` reports current and latest versions
//! - `go list -f ... tool` enumerates tool modules (Go 1.24+)
//! - `go get <path>@<version>` applies an upgrade

use super::{CandidateInfo, CandidateSource, CommandRunner, Upgrader};
use crate::domain::{version_tag, Candidate};
use crate::error::{ApplyError, EnumerationError, QueryError};
use async_trait::async_trait;
use regex::Regex;
use semver::Version;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

/// First Go release with `go tool` module support
pub const TOOLS_MIN_GO: Version = Version::new(1, 24, 0);

const TOOL_TEMPLATE: &str = "{{if .Module}}{{.Module.Path}} {{.Module.Version}}{{end}}";

static GO_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"go version go(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// Subset of `go list -m -u -json` output
#[derive(Debug, Deserialize)]
struct GoListModule {
    #[serde(rename = "Path")]
    path: String,
    #[serde(rename = "Version", default)]
    version: Option<String>,
    #[serde(rename = "Main", default)]
    main: bool,
    #[serde(rename = "Indirect", default)]
    indirect: bool,
    #[serde(rename = "Update", default)]
    update: Option<GoListUpdate>,
}

#[derive(Debug, Deserialize)]
struct GoListUpdate {
    #[serde(rename = "Version", default)]
    version: String,
}

/// Candidate source and upgrader backed by the `go` command
#[derive(Debug, Clone)]
pub struct GoToolchain {
    runner: CommandRunner,
    include_indirect: bool,
}

impl GoToolchain {
    /// Create a toolchain adapter for the module in `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(CommandRunner::new("go", working_dir).with_env("GOWORK", "off"))
    }

    /// Create an adapter around a custom runner
    pub fn with_runner(runner: CommandRunner) -> Self {
        Self {
            runner,
            include_indirect: false,
        }
    }

    /// Also offer upgrades for indirect requirements
    pub fn with_indirect(mut self, include: bool) -> Self {
        self.include_indirect = include;
        self
    }
}

#[async_trait]
impl CandidateSource for GoToolchain {
    async fn list_candidates(&self) -> Result<Vec<String>, EnumerationError> {
        let out = self
            .runner
            .output(&["list", "-m", "-f", "{{.Path}}", "all"])
            .await
            .map_err(|source| EnumerationError::Command { source })?;

        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn query_candidate(&self, candidate: &Candidate) -> Result<CandidateInfo, QueryError> {
        let identifier = candidate.identifier.as_str();
        let out = self
            .runner
            .output(&["list", "-m", "-u", "-json", identifier])
            .await
            .map_err(|e| QueryError::command(identifier, e))?;

        // tool requirements are usually marked indirect in go.mod
        parse_list_module(identifier, &out, self.include_indirect || candidate.auxiliary)
    }

    async fn auxiliary_supported(&self) -> bool {
        match self.runner.output(&["version"]).await {
            Ok(out) => parse_go_version(&out).is_some_and(|v| v >= TOOLS_MIN_GO),
            Err(_) => false,
        }
    }

    async fn list_auxiliary_candidates(&self) -> Result<Vec<Candidate>, EnumerationError> {
        match self.runner.output(&["list", "-f", TOOL_TEMPLATE, "tool"]).await {
            Ok(out) => Ok(parse_tool_list(&out)),
            // No tool directives configured
            Err(e) if e.stderr().is_some_and(|s| s.contains("matched no packages")) => {
                Ok(Vec::new())
            }
            Err(source) => Err(EnumerationError::Command { source }),
        }
    }
}

#[async_trait]
impl Upgrader for GoToolchain {
    async fn apply_upgrade(&self, identifier: &str, target: &Version) -> Result<(), ApplyError> {
        let query = format!("{}@{}", identifier, version_tag(target));
        self.runner
            .output(&["get", query.as_str()])
            .await
            .map(|_| ())
            .map_err(|e| ApplyError::command(identifier, e))
    }
}

/// Decode one `go list -m -u -json` object
///
/// The main module and, unless `include_indirect`, indirect requirements are
/// reported as current so they never become upgrade candidates.
pub fn parse_list_module(
    identifier: &str,
    json: &str,
    include_indirect: bool,
) -> Result<CandidateInfo, QueryError> {
    let module: GoListModule = serde_json::from_str(json)
        .map_err(|e| QueryError::invalid_response(identifier, e.to_string()))?;

    if module.path != identifier {
        return Err(QueryError::invalid_response(
            identifier,
            format!("response describes '{}'", module.path),
        ));
    }

    let current = module.version.unwrap_or_default();
    if module.main || (module.indirect && !include_indirect) {
        return Ok(CandidateInfo::current(current));
    }

    match module.update {
        Some(update) if !update.version.is_empty() => {
            Ok(CandidateInfo::update(current, update.version))
        }
        _ => Ok(CandidateInfo::current(current)),
    }
}

/// Parse `path version` lines from the tool listing, dropping duplicates
pub fn parse_tool_list(output: &str) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [path, version] = parts.as_slice() else {
            continue;
        };
        if seen.insert(path.to_string()) {
            candidates.push(Candidate::auxiliary(*path, *version));
        }
    }

    candidates
}

/// Extract the toolchain release from `go version` output
pub fn parse_go_version(output: &str) -> Option<Version> {
    let caps = GO_VERSION_RE.captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(Version::new(major, minor, patch))
}
