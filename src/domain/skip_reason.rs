//! Reasons a looked-up candidate is not offered as an upgrade

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a candidate did not become an updatable module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No newer version was reported
    AlreadyCurrent,
    /// The reported version is not strictly newer
    NotNewer,
    /// One of the versions could not be parsed
    Unparsable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyCurrent => write!(f, "already current"),
            SkipReason::NotNewer => write!(f, "no newer version"),
            SkipReason::Unparsable(msg) => write!(f, "unparsable version: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::AlreadyCurrent.to_string(), "already current");
        assert_eq!(SkipReason::NotNewer.to_string(), "no newer version");
        assert_eq!(
            SkipReason::Unparsable("v1.2".to_string()).to_string(),
            "unparsable version: v1.2"
        );
    }
}
