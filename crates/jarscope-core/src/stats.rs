//! Digest occurrence counting for duplicate detection.

use std::collections::HashMap;

use crate::digest::Digest;
use crate::entry::EntryTree;

/// Number of entries sharing each digest.
///
/// Built once from a finished [`EntryTree`]; a count above one means the same
/// bytes appear at several places in the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestCounts {
    counts: HashMap<Digest, usize>,
}

impl DigestCounts {
    /// Counts the digests of every member of `tree`. The root is ignored.
    #[must_use]
    pub fn from_tree(tree: &EntryTree) -> Self {
        let mut counts = HashMap::new();
        for entry in tree.members() {
            *counts.entry(entry.digest().clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Occurrences of `digest`; zero if it never appeared.
    #[must_use]
    pub fn count(&self, digest: &Digest) -> usize {
        self.counts.get(digest).copied().unwrap_or(0)
    }

    /// Returns `true` if `digest` appears more than once.
    #[must_use]
    pub fn is_duplicate(&self, digest: &Digest) -> bool {
        self.count(digest) > 1
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn unique_digests(&self) -> usize {
        self.counts.len()
    }

    /// Digests seen more than once with their counts, ordered by digest.
    #[must_use]
    pub fn duplicates(&self) -> Vec<(&Digest, usize)> {
        let mut dups: Vec<_> = self
            .counts
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(digest, &count)| (digest, count))
            .collect();
        dups.sort_unstable();
        dups
    }

    /// Sum of all counts; equals the number of members counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
