//! Case sensitivity policy for path comparisons.
//!
//! Whether two path segments are considered equal is a property of the
//! filesystem being cached, not of any single lookup, so the policy is
//! supplied by configuration and threaded through every comparison. A tree
//! must use one consistent value for all operations on it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How path segments are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    /// Segments compare byte for byte.
    Sensitive,
    /// ASCII letters are folded to lower case before comparing.
    Insensitive,
}

impl CaseSensitivity {
    /// Folds a single byte under this policy.
    ///
    /// Folding is byte-wise ASCII lowering, which is safe on UTF-8 because
    /// ASCII bytes never occur inside a multi-byte sequence.
    #[inline]
    pub(crate) fn fold(self, byte: u8) -> u8 {
        match self {
            Self::Sensitive => byte,
            Self::Insensitive => byte.to_ascii_lowercase(),
        }
    }

    /// Returns true if two bytes are equal under this policy.
    #[inline]
    pub(crate) fn bytes_equal(self, a: u8, b: u8) -> bool {
        self.fold(a) == self.fold(b)
    }

    /// Compares two single segments (no separators) under this policy.
    ///
    /// Each policy induces a total order; a sorted children index is only
    /// valid under the policy it was built with.
    pub(crate) fn compare_segments(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Sensitive => a.as_bytes().cmp(b.as_bytes()),
            Self::Insensitive => a
                .bytes()
                .map(|byte| byte.to_ascii_lowercase())
                .cmp(b.bytes().map(|byte| byte.to_ascii_lowercase())),
        }
    }
}
