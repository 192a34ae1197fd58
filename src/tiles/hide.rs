//! Hide Set
//!
//! Per-request set of category indices to render fully transparent.

use std::collections::BTreeSet;

// == Hide Set ==
/// Category indices parsed from the `hide` query parameter.
///
/// Empty means "hide nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HideSet(BTreeSet<usize>);

impl HideSet {
    pub fn new() -> Self {
        Self::default()
    }

    // == Parse ==
    /// Parses a comma-separated list such as `0,2` (or its URL-encoded form
    /// `0%2C2`).
    ///
    /// Tokens that are not non-negative integers are skipped, so a malformed
    /// value hides nothing rather than failing the request.
    pub fn parse(raw: &str) -> Self {
        raw.replace("%2C", ",")
            .replace("%2c", ",")
            .split(',')
            .filter_map(|token| token.trim().parse::<usize>().ok())
            .collect()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<usize> for HideSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
