//! Version delta classification

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance of the change between two versions
///
/// Variants are declared from most to least significant, so the derived
/// `Ord` sorts "major" first and "unchanged" last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateCategory {
    /// Major version differs (breaking)
    Major,
    /// Minor version differs (features)
    Minor,
    /// Patch version differs (fixes)
    Patch,
    /// Only the prerelease label differs
    Prerelease,
    /// Only the build metadata differs
    Metadata,
    /// Nothing relevant differs
    Unchanged,
}

impl UpdateCategory {
    /// Classify the delta between `from` and `to`
    ///
    /// Rules are evaluated in order and the first match wins. The result
    /// depends on the two versions only.
    pub fn classify(from: &Version, to: &Version) -> Self {
        if from.major != to.major {
            return UpdateCategory::Major;
        }
        if from.minor != to.minor {
            return UpdateCategory::Minor;
        }
        if from.patch != to.patch {
            return UpdateCategory::Patch;
        }
        // A new label on `to` and a label dropped on release both count.
        if from.pre != to.pre {
            return UpdateCategory::Prerelease;
        }
        if from.build != to.build && !to.build.is_empty() {
            return UpdateCategory::Metadata;
        }
        UpdateCategory::Unchanged
    }

    /// Plain label
    pub fn label(&self) -> &'static str {
        match self {
            UpdateCategory::Major => "major",
            UpdateCategory::Minor => "minor",
            UpdateCategory::Patch => "patch",
            UpdateCategory::Prerelease => "prerelease",
            UpdateCategory::Metadata => "metadata",
            UpdateCategory::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for UpdateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn classify(from: &str, to: &str) -> UpdateCategory {
        UpdateCategory::classify(&v(from), &v(to))
    }

    #[test]
    fn test_major() {
        assert_eq!(classify("1.9.0", "2.0.0"), UpdateCategory::Major);
        assert_eq!(classify("0.1.0", "1.0.0-rc.1"), UpdateCategory::Major);
    }

    #[test]
    fn test_minor() {
        assert_eq!(classify("1.2.0", "1.3.0"), UpdateCategory::Minor);
        assert_eq!(classify("1.2.9", "1.3.0"), UpdateCategory::Minor);
    }

    #[test]
    fn test_patch() {
        assert_eq!(classify("1.9.0", "1.9.1"), UpdateCategory::Patch);
    }

    #[test]
    fn test_prerelease_label_added_or_changed() {
        assert_eq!(classify("1.9.0-alpha", "1.9.0-beta"), UpdateCategory::Prerelease);
        assert_eq!(classify("1.9.0", "1.9.0-beta"), UpdateCategory::Prerelease);
    }

    #[test]
    fn test_prerelease_label_dropped_on_release() {
        assert_eq!(classify("1.9.0-alpha", "1.9.0"), UpdateCategory::Prerelease);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(classify("1.0.0+a", "1.0.0+b"), UpdateCategory::Metadata);
        assert_eq!(classify("1.0.0", "1.0.0+incompatible"), UpdateCategory::Metadata);
    }

    #[test]
    fn test_metadata_dropped_is_unchanged() {
        assert_eq!(classify("1.0.0+a", "1.0.0"), UpdateCategory::Unchanged);
    }

    #[test]
    fn test_unchanged() {
        assert_eq!(classify("2.0.0", "2.0.0"), UpdateCategory::Unchanged);
    }

    #[test]
    fn test_numeric_rules_take_precedence() {
        // label changes are ignored once a numeric field differs
        assert_eq!(classify("1.0.0-alpha", "1.0.1-beta"), UpdateCategory::Patch);
        assert_eq!(classify("1.0.0+a", "1.1.0+b"), UpdateCategory::Minor);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let pairs = [
            ("1.0.0", "2.0.0"),
            ("1.0.0", "1.0.1"),
            ("1.0.0-rc.1", "1.0.0"),
            ("0.0.0-20230101000000-abcdef123456", "0.0.0-20240101000000-123456abcdef"),
        ];
        for (from, to) in pairs {
            let first = classify(from, to);
            for _ in 0..5 {
                assert_eq!(classify(from, to), first);
            }
        }
    }

    #[test]
    fn test_ordering_least_to_most_trivial() {
        let mut categories = vec![
            UpdateCategory::Unchanged,
            UpdateCategory::Patch,
            UpdateCategory::Metadata,
            UpdateCategory::Major,
            UpdateCategory::Prerelease,
            UpdateCategory::Minor,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                UpdateCategory::Major,
                UpdateCategory::Minor,
                UpdateCategory::Patch,
                UpdateCategory::Prerelease,
                UpdateCategory::Metadata,
                UpdateCategory::Unchanged,
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(UpdateCategory::Minor.to_string(), "minor");
        assert_eq!(UpdateCategory::Prerelease.to_string(), "prerelease");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&UpdateCategory::Prerelease).unwrap();
        assert_eq!(json, "\"prerelease\"");
    }
}
