//! Identifier filtering for the review list

use clap::ValueEnum;

/// How identifiers are normalised before substring matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FilterPolicy {
    /// Match against the whole module path
    Full,
    /// Drop the leading host segment (`github.com/`) before matching
    #[default]
    StripDomain,
}

impl FilterPolicy {
    /// The part of `identifier` that queries are matched against
    pub fn normalize<'a>(&self, identifier: &'a str) -> &'a str {
        match self {
            FilterPolicy::Full => identifier,
            FilterPolicy::StripDomain => match identifier.split_once('/') {
                Some((_, rest)) if !rest.is_empty() => rest,
                _ => identifier,
            },
        }
    }

    /// Case-insensitive substring match; an empty query matches everything
    pub fn matches(&self, identifier: &str, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        self.normalize(identifier)
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}
