//! Whitespace-insensitive fingerprints of comment bodies.

use std::fmt;

use sha2::{Digest, Sha256};

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;

/// A normalized hash of a comment body, used to recognise a comment that has
/// already been posted.
///
/// Runs of whitespace are collapsed to a single space and leading and trailing
/// whitespace is dropped before hashing, so re-rendered bodies that only differ
/// in formatting produce the same fingerprint.
///
/// # Examples
///
/// ```
/// use pr_commenter_core::fingerprint::Fingerprint;
///
/// assert_eq!(
///     Fingerprint::of("## result\n\nbucket is public\n"),
///     Fingerprint::of("  ## result bucket is public")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(body: &str) -> Self {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");

        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
