//! Scan configuration.

/// What to do when a nested member looks like a zip archive but cannot be
/// expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptContainerPolicy {
    /// Keep the container's own entry, drop its children, record a warning.
    #[default]
    Skip,
    /// Abort the whole walk with `ScanError::CorruptContainer`.
    Abort,
}

/// Limits and policies applied while walking an archive.
///
/// # Examples
///
/// ```
/// use jarscope_core::CorruptContainerPolicy;
/// use jarscope_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.on_corrupt, CorruptContainerPolicy::Skip);
///
/// let strict = ScanConfig {
///     max_depth: 8,
///     on_corrupt: CorruptContainerPolicy::Abort,
///     ..Default::default()
/// };
/// assert_eq!(strict.max_depth, 8);
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum decompressed size of a single member in bytes.
    pub max_entry_size: u64,

    /// Maximum decompressed bytes read across the whole walk.
    pub max_total_size: u64,

    /// Maximum number of entries discovered across the whole walk.
    pub max_entry_count: usize,

    /// Deepest nesting level whose containers may be expanded.
    ///
    /// Members of the root archive sit at depth 1.
    pub max_depth: usize,

    /// Handling of nested containers that fail to expand.
    pub on_corrupt: CorruptContainerPolicy,
}

impl Default for ScanConfig {
    /// Default values:
    /// - `max_entry_size`: 512 MiB
    /// - `max_total_size`: 4 GiB
    /// - `max_entry_count`: 1,000,000
    /// - `max_depth`: 32
    /// - `on_corrupt`: skip
    fn default() -> Self {
        Self {
            max_entry_size: 512 * 1024 * 1024,
            max_total_size: 4 * 1024 * 1024 * 1024,
            max_entry_count: 1_000_000,
            max_depth: 32,
            on_corrupt: CorruptContainerPolicy::Skip,
        }
    }
}

impl ScanConfig {
    /// Creates a configuration with every quota lifted.
    ///
    /// Only use this for archives from trusted sources: a zip quine never
    /// terminates without a depth limit.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_entry_size: u64::MAX,
            max_total_size: u64::MAX,
            max_entry_count: usize::MAX,
            max_depth: usize::MAX,
            ..Default::default()
        }
    }

    /// Returns `true` if a container at `depth` may be expanded.
    #[must_use]
    pub const fn may_expand(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }
}
