//! Resource accounting while walking nested archives.

use crate::ScanConfig;
use crate::ScanError;
use crate::entry::ContentKind;
use crate::error::QuotaResource;
use crate::error::Result;

/// Tracks entries and leaf bytes across one walk.
///
/// Only leaf members add to the byte total. A nested container's bytes are
/// the compressed form of its own members, which are counted when it is
/// expanded, so the total does not grow with nesting depth.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    entries_seen: usize,
    bytes_read: u64,
}

/// Counter values saved before a container expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaCheckpoint {
    entries_seen: usize,
    bytes_read: u64,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a member's declared size before its bytes are read.
    ///
    /// The declared size comes from the central directory and may lie; the
    /// walker also caps the actual read at `max_entry_size + 1` bytes and
    /// calls [`record_entry`](Self::record_entry) with the real count.
    pub fn check_declared_size(&self, name: &str, size: u64, config: &ScanConfig) -> Result<()> {
        if size > config.max_entry_size {
            return Err(ScanError::QuotaExceeded {
                resource: QuotaResource::EntrySize {
                    name: name.to_string(),
                    size,
                    max: config.max_entry_size,
                },
            });
        }
        Ok(())
    }

    /// Records one member of `size` decompressed bytes.
    pub fn record_entry(
        &mut self,
        name: &str,
        size: u64,
        kind: ContentKind,
        config: &ScanConfig,
    ) -> Result<()> {
        self.check_declared_size(name, size, config)?;

        self.entries_seen += 1;
        if self.entries_seen > config.max_entry_count {
            return Err(ScanError::QuotaExceeded {
                resource: QuotaResource::EntryCount {
                    current: self.entries_seen,
                    max: config.max_entry_count,
                },
            });
        }

        if kind.is_container() {
            return Ok(());
        }

        self.bytes_read = self.bytes_read.saturating_add(size);
        if self.bytes_read > config.max_total_size {
            return Err(ScanError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.bytes_read,
                    max: config.max_total_size,
                },
            });
        }

        Ok(())
    }

    /// Saves the current counters.
    #[must_use]
    pub const fn checkpoint(&self) -> QuotaCheckpoint {
        QuotaCheckpoint {
            entries_seen: self.entries_seen,
            bytes_read: self.bytes_read,
        }
    }

    /// Rewinds the counters to `checkpoint`, forgetting members recorded
    /// since then.
    pub const fn restore(&mut self, checkpoint: QuotaCheckpoint) {
        self.entries_seen = checkpoint.entries_seen;
        self.bytes_read = checkpoint.bytes_read;
    }

    /// Checks that a container at `depth` may be expanded.
    pub fn check_depth(depth: usize, config: &ScanConfig) -> Result<()> {
        if !config.may_expand(depth) {
            return Err(ScanError::QuotaExceeded {
                resource: QuotaResource::NestingDepth {
                    depth,
                    max: config.max_depth,
                },
            });
        }
        Ok(())
    }

    /// Returns the number of members recorded.
    #[must_use]
    pub fn entries_seen(&self) -> usize {
        self.entries_seen
    }

    /// Returns the decompressed bytes of leaf members recorded.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
