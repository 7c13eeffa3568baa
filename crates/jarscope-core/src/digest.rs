//! Content fingerprints and the nested-container probe.

use std::fmt;
use std::io::Cursor;

use sha1::Digest as _;
use sha1::Sha1;

/// Placeholder digest carried by the synthetic root entry.
///
/// Deliberately shorter than a real SHA-1 so it can never collide with one.
pub const ROOT_DIGEST: &str = "000000000";

/// Lowercase hexadecimal SHA-1 fingerprint of a member's bytes.
///
/// Ordering is the lexicographic order of the hex string, which is the order
/// used for checksum-sorted reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(String);

impl Digest {
    /// Returns the sentinel digest used for the root entry.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_DIGEST.to_string())
    }

    /// Wraps the raw output of a SHA-1 hasher.
    #[must_use]
    pub(crate) fn from_hasher(hasher: Sha1) -> Self {
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root sentinel.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_DIGEST
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Computes the SHA-1 fingerprint of `bytes`.
///
/// # Examples
///
/// ```
/// use jarscope_core::fingerprint;
///
/// let digest = fingerprint(b"hello");
/// assert_eq!(digest.as_str(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
/// ```
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> Digest {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    Digest::from_hasher(hasher)
}

/// Returns `true` if `bytes` parse as a zip archive.
///
/// Requires a valid end-of-central-directory record and a readable central
/// directory. Empty, truncated or random input yields `false`.
///
/// # Examples
///
/// ```
/// use jarscope_core::is_container;
///
/// assert!(!is_container(b""));
/// assert!(!is_container(b"plain text"));
/// ```
#[must_use]
pub fn is_container(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    zip::ZipArchive::new(Cursor::new(bytes)).is_ok()
}
