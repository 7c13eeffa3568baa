//! Error types for archive scanning operations.

use thiserror::Error;

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Represents a specific scan limit that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Too many entries discovered across the whole walk.
    EntryCount {
        /// Current entry count.
        current: usize,
        /// Maximum allowed entry count.
        max: usize,
    },
    /// Total decompressed bytes across the walk exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// A single member is larger than allowed.
    EntrySize {
        /// Member name.
        name: String,
        /// Decompressed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        max: u64,
    },
    /// A container is nested deeper than allowed.
    NestingDepth {
        /// Depth of the container that would be expanded.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryCount { current, max } => {
                write!(f, "quota exceeded: entry count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::EntrySize { name, size, max } => {
                write!(f, "quota exceeded: size of '{name}' ({size} > {max})")
            }
            Self::NestingDepth { depth, max } => {
                write!(f, "quota exceeded: nesting depth ({depth} > {max})")
            }
        }
    }
}

/// Errors that can occur while walking an archive.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The root archive is not a readable zip container.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// A nested member passed the container probe but could not be expanded.
    #[error("corrupt nested container {path}: {reason}")]
    CorruptContainer {
        /// Containment path and name of the nested container.
        path: String,
        /// What went wrong while expanding it.
        reason: String,
    },

    /// A scan limit was exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },
}

impl ScanError {
    /// Returns `true` if an archive's bytes could not be read as a zip.
    ///
    /// For the root archive this ends the walk. For a nested container it is
    /// handled by [`CorruptContainerPolicy`](crate::CorruptContainerPolicy).
    ///
    /// # Examples
    ///
    /// ```
    /// use jarscope_core::ScanError;
    ///
    /// let err = ScanError::InvalidArchive("missing end of central directory".to_string());
    /// assert!(err.is_unreadable_input());
    ///
    /// let err = ScanError::CorruptContainer {
    ///     path: "/lib/broken.jar".to_string(),
    ///     reason: "invalid checksum".to_string(),
    /// };
    /// assert!(!err.is_unreadable_input());
    /// ```
    #[must_use]
    pub const fn is_unreadable_input(&self) -> bool {
        matches!(self, Self::Io(_) | Self::InvalidArchive(_))
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarscope_core::ScanError;
    ///
    /// let err = ScanError::InvalidArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::CorruptContainer { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScanError::InvalidArchive("not a zip".into());
        assert_eq!(err.to_string(), "invalid archive: not a zip");
    }

    #[test]
    fn test_corrupt_container_display() {
        let err = ScanError::CorruptContainer {
            path: "/WEB-INF/lib/broken.jar".into(),
            reason: "invalid checksum".into(),
        };
        let display = err.to_string();
        assert!(display.contains("/WEB-INF/lib/broken.jar"));
        assert!(display.contains("invalid checksum"));
        assert_eq!(err.context(), Some("invalid checksum"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ScanError = io_err.into();
        assert!(matches!(err, ScanError::Io(_)));
        assert!(err.is_unreadable_input());
    }

    #[test]
    fn test_quota_exceeded_error() {
        let err = ScanError::QuotaExceeded {
            resource: QuotaResource::EntryCount {
                current: 11,
                max: 10,
            },
        };
        let display = err.to_string();
        assert!(display.contains("quota exceeded"));
        assert!(display.contains("entry count"));
        assert!(!err.is_unreadable_input());
    }

    #[test]
    fn test_entry_size_display_names_member() {
        let resource = QuotaResource::EntrySize {
            name: "huge.bin".into(),
            size: 2048,
            max: 1024,
        };
        assert_eq!(
            resource.to_string(),
            "quota exceeded: size of 'huge.bin' (2048 > 1024)"
        );
    }

    #[test]
    fn test_context_absent() {
        let err = ScanError::QuotaExceeded {
            resource: QuotaResource::NestingDepth { depth: 5, max: 4 },
        };
        assert_eq!(err.context(), None);
    }
}
