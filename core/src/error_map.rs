//! Status code to reason text table.

use std::collections::BTreeMap;

/// Text used for any status code that has no entry.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

const DEFAULT_REASONS: &[(u16, &str)] = &[
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (415, "Unsupported Media Type"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (596, "Service Not Found"),
];

/// Default reasons layered with per-call overrides.
///
/// Overrides win over defaults for the same code. A map is built for a single
/// response and never shared, so overrides for one call cannot affect another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMap {
    reasons: BTreeMap<u16, String>,
}

impl ErrorMap {
    pub fn defaults() -> Self {
        Self {
            reasons: DEFAULT_REASONS
                .iter()
                .map(|(code, text)| (*code, text.to_string()))
                .collect(),
        }
    }

    /// Defaults with `overrides` applied on top.
    pub fn with_overrides(overrides: &[(u16, &str)]) -> Self {
        let mut map = Self::defaults();
        for (code, text) in overrides {
            map.reasons.insert(*code, text.to_string());
        }
        map
    }

    /// Reason text for `code`, or `"Unknown Error"`.
    pub fn reason(&self, code: u16) -> &str {
        self.reasons.get(&code).map(String::as_str).unwrap_or(UNKNOWN_ERROR)
    }
}

impl Default for ErrorMap {
    fn default() -> Self {
        Self::defaults()
    }
}
