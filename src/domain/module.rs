//! Upgrade candidate structures

use super::UpdateCategory;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An identifier waiting to be looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Module path
    pub identifier: String,
    /// Discovered through the tool listing rather than the module graph
    pub auxiliary: bool,
    /// Version reported by the enumeration itself, if any
    pub known_version: Option<String>,
}

impl Candidate {
    /// Creates a candidate from the primary module listing
    pub fn primary(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            auxiliary: false,
            known_version: None,
        }
    }

    /// Creates a candidate from the tool listing
    pub fn auxiliary(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            auxiliary: true,
            known_version: Some(version.into()),
        }
    }
}

/// A classified, possibly updatable module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module path, unique within a run
    pub identifier: String,
    /// Version currently required
    pub current: Version,
    /// Newest version available
    pub latest: Version,
    /// Derived from `current` and `latest`
    pub category: UpdateCategory,
    /// Discovered through the tool listing
    pub auxiliary: bool,
    /// True only when `latest` is strictly newer than `current`
    pub updatable: bool,
}

impl Module {
    /// Creates a module record, deriving its category and updatability
    pub fn new(
        identifier: impl Into<String>,
        current: Version,
        latest: Version,
        auxiliary: bool,
    ) -> Self {
        let category = UpdateCategory::classify(&current, &latest);
        let updatable = precedence(&current, &latest) == Ordering::Less;
        Self {
            identifier: identifier.into(),
            current,
            latest,
            category,
            auxiliary,
            updatable,
        }
    }

    /// Current version as the toolchain spells it
    pub fn current_tag(&self) -> String {
        version_tag(&self.current)
    }

    /// Target version as the toolchain spells it
    pub fn latest_tag(&self) -> String {
        version_tag(&self.latest)
    }

    /// Display order: category first, then identifier
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.identifier.cmp(&other.identifier))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {} [{}]",
            self.identifier,
            self.current_tag(),
            self.latest_tag(),
            self.category
        )
    }
}

/// Parses a version, accepting an optional leading `v`
pub fn parse_version(raw: &str) -> Result<Version, semver::Error> {
    let raw = raw.trim();
    Version::parse(raw.strip_prefix('v').unwrap_or(raw))
}

/// Formats a version with the leading `v`
pub fn version_tag(version: &Version) -> String {
    format!("v{}", version)
}

/// Semantic-version precedence; build metadata does not participate
pub fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    #[test]
    fn test_parse_version_with_prefix() {
        assert_eq!(v("v1.2.3"), Version::new(1, 2, 3));
        assert_eq!(v("1.2.3"), Version::new(1, 2, 3));
        assert_eq!(v(" v0.4.0 \n"), Version::new(0, 4, 0));
    }

    #[test]
    fn test_parse_version_pseudo_and_incompatible() {
        let pseudo = v("v0.0.0-20240101000000-abcdef123456");
        assert!(!pseudo.pre.is_empty());
        let incompatible = v("v2.0.0+incompatible");
        assert_eq!(incompatible.build.as_str(), "incompatible");
    }

    #[test]
    fn test_parse_version_invalid() {
        assert!(parse_version("v1.2").is_err());
        assert!(parse_version("latest").is_err());
        assert!(parse_version("").is_err());
    }

    #[test]
    fn test_module_new_updatable() {
        let module = Module::new("github.com/a/b", v("v1.2.0"), v("v1.3.0"), false);
        assert!(module.updatable);
        assert_eq!(module.category, UpdateCategory::Minor);
        assert!(!module.auxiliary);
    }

    #[test]
    fn test_module_new_same_version_not_updatable() {
        let module = Module::new("pkgB", v("2.0.0"), v("2.0.0"), false);
        assert!(!module.updatable);
        assert_eq!(module.category, UpdateCategory::Unchanged);
    }

    #[test]
    fn test_module_new_downgrade_not_updatable() {
        let module = Module::new("pkg", v("2.0.0"), v("1.9.0"), false);
        assert!(!module.updatable);
    }

    #[test]
    fn test_module_metadata_only_not_updatable() {
        let module = Module::new("pkg", v("1.0.0+a"), v("1.0.0+b"), false);
        assert!(!module.updatable);
        assert_eq!(module.category, UpdateCategory::Metadata);
    }

    #[test]
    fn test_module_prerelease_release_is_updatable() {
        let module = Module::new("pkg", v("1.9.0-alpha"), v("1.9.0"), true);
        assert!(module.updatable);
        assert_eq!(module.category, UpdateCategory::Prerelease);
        assert!(module.auxiliary);
    }

    #[test]
    fn test_tags() {
        let module = Module::new("pkg", v("1.0.0"), v("2.0.0+incompatible"), false);
        assert_eq!(module.current_tag(), "v1.0.0");
        assert_eq!(module.latest_tag(), "v2.0.0+incompatible");
    }

    #[test]
    fn test_display_cmp() {
        let patch = Module::new("a", v("1.0.0"), v("1.0.1"), false);
        let major_b = Module::new("b", v("1.0.0"), v("2.0.0"), false);
        let major_a = Module::new("a", v("1.0.0"), v("2.0.0"), false);
        assert_eq!(major_a.display_cmp(&major_b), Ordering::Less);
        assert_eq!(major_b.display_cmp(&patch), Ordering::Less);
    }

    #[test]
    fn test_display() {
        let module = Module::new("golang.org/x/mod", v("v0.17.0"), v("v0.20.0"), false);
        assert_eq!(
            module.to_string(),
            "golang.org/x/mod v0.17.0 → v0.20.0 [minor]"
        );
    }

    #[test]
    fn test_candidate_constructors() {
        let primary = Candidate::primary("a");
        assert!(!primary.auxiliary);
        assert!(primary.known_version.is_none());

        let tool = Candidate::auxiliary("b", "v1.0.0");
        assert!(tool.auxiliary);
        assert_eq!(tool.known_version.as_deref(), Some("v1.0.0"));
    }
}
