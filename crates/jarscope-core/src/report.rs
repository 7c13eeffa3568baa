//! Scan results, report ordering and progress observation.

use std::time::Duration;

use crate::entry::Entry;
use crate::entry::EntryId;
use crate::entry::EntryTree;
use crate::stats::DigestCounts;

/// Ordering of report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending digest hex string.
    Checksum,
    /// Ascending `name + "/" + path`, which groups equal file names from
    /// every location together.
    #[default]
    Name,
}

impl SortOrder {
    /// Lowercase label used in machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checksum => "checksum",
            Self::Name => "name",
        }
    }
}

/// A nested container whose expansion failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedContainer {
    /// The container entry; it stays in the tree without children.
    pub id: EntryId,
    /// Why the expansion failed.
    pub reason: String,
}

/// Central-directory records hidden behind a later record with the same name.
///
/// The container lists one member per name; `hidden` counts the records that
/// could not be read because a later one took their name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedMembers {
    /// The container holding the repeated names; `EntryId::ROOT` for the root.
    pub id: EntryId,
    /// Number of records that were not listed.
    pub hidden: usize,
}

/// Result of walking an archive.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Every discovered entry, in breadth-first discovery order.
    pub tree: EntryTree,

    /// Occurrences of each digest across `tree`.
    pub counts: DigestCounts,

    /// Nested containers that could not be expanded.
    pub skipped: Vec<SkippedContainer>,

    /// Containers whose central directory repeats member names.
    pub shadowed: Vec<ShadowedMembers>,

    /// Decompressed bytes of every leaf member.
    pub bytes_read: u64,

    /// Duration of the walk.
    pub duration: Duration,
}

impl ScanReport {
    /// Builds a report from a finished tree, computing digest counts.
    #[must_use]
    pub fn new(tree: EntryTree, skipped: Vec<SkippedContainer>, bytes_read: u64) -> Self {
        let counts = DigestCounts::from_tree(&tree);
        Self {
            tree,
            counts,
            skipped,
            shadowed: Vec::new(),
            bytes_read,
            duration: Duration::ZERO,
        }
    }

    /// Number of discovered members, excluding the root.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.tree.len()
    }

    /// Number of members that are nested containers.
    #[must_use]
    pub fn containers(&self) -> usize {
        self.tree.members().filter(|e| e.is_container()).count()
    }

    /// Returns whether any container was skipped or had hidden members.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty() || !self.shadowed.is_empty()
    }

    /// Containment path of `entry`.
    #[must_use]
    pub fn path(&self, entry: &Entry) -> String {
        self.tree.path(entry.id())
    }

    /// Occurrences of `entry`'s digest.
    #[must_use]
    pub fn occurrences(&self, entry: &Entry) -> usize {
        self.counts.count(entry.digest())
    }

    /// Members sorted for presentation.
    ///
    /// The sort is stable: ties keep discovery order, so the result does not
    /// depend on anything but the archive content.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarscope_core::ContentKind;
    /// use jarscope_core::EntryId;
    /// use jarscope_core::EntryTree;
    /// use jarscope_core::ScanReport;
    /// use jarscope_core::SortOrder;
    /// use jarscope_core::fingerprint;
    ///
    /// let mut tree = EntryTree::new();
    /// tree.push(EntryId::ROOT, "z.txt", ContentKind::Leaf, fingerprint(b"1"), 1);
    /// tree.push(EntryId::ROOT, "a.txt", ContentKind::Leaf, fingerprint(b"2"), 1);
    /// let report = ScanReport::new(tree, Vec::new(), 2);
    ///
    /// let names: Vec<_> = report.sorted(SortOrder::Name).iter().map(|e| e.name()).collect();
    /// assert_eq!(names, ["a.txt", "z.txt"]);
    /// ```
    #[must_use]
    pub fn sorted(&self, order: SortOrder) -> Vec<&Entry> {
        match order {
            SortOrder::Checksum => {
                let mut entries: Vec<&Entry> = self.tree.members().collect();
                entries.sort_by(|a, b| a.digest().cmp(b.digest()));
                entries
            }
            SortOrder::Name => {
                let mut keyed: Vec<(String, &Entry)> = self
                    .tree
                    .members()
                    .map(|e| (name_sort_key(e, &self.tree), e))
                    .collect();
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                keyed.into_iter().map(|(_, e)| e).collect()
            }
        }
    }
}

fn name_sort_key(entry: &Entry, tree: &EntryTree) -> String {
    format!("{}/{}", entry.name(), tree.path(entry.id()))
}

/// Callback trait for observing a walk as it progresses.
///
/// Calls happen synchronously on the walking thread, in discovery order.
///
/// # Examples
///
/// ```
/// use jarscope_core::Entry;
/// use jarscope_core::ScanObserver;
///
/// struct Classifier;
///
/// impl ScanObserver for Classifier {
///     fn on_entry_discovered(&mut self, entry: &Entry, _path: &str) {
///         println!("{} is archive: {}", entry.name(), entry.is_container());
///     }
///
///     fn on_container_expanded(&mut self, _entry: &Entry, _children: usize) {}
///
///     fn on_container_skipped(&mut self, entry: &Entry, reason: &str) {
///         eprintln!("skipped {}: {reason}", entry.name());
///     }
///
///     fn on_complete(&mut self, total: usize) {
///         println!("{total} entries");
///     }
/// }
/// ```
pub trait ScanObserver {
    /// Called once per member, right after it is read and classified.
    ///
    /// # Arguments
    ///
    /// * `entry` - The new entry
    /// * `path` - Its containment path
    fn on_entry_discovered(&mut self, entry: &Entry, path: &str);

    /// Called after a container's members have all been discovered.
    fn on_container_expanded(&mut self, entry: &Entry, children: usize);

    /// Called when a nested container fails to expand and is skipped.
    fn on_container_skipped(&mut self, entry: &Entry, reason: &str);

    /// Called when the walk finishes successfully.
    fn on_complete(&mut self, total: usize);
}

/// No-op implementation of `ScanObserver`.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_entry_discovered(&mut self, _entry: &Entry, _path: &str) {}

    fn on_container_expanded(&mut self, _entry: &Entry, _children: usize) {}

    fn on_container_skipped(&mut self, _entry: &Entry, _reason: &str) {}

    fn on_complete(&mut self, _total: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ContentKind;
    use crate::fingerprint;

    fn report() -> ScanReport {
        let mut tree = EntryTree::new();
        tree.push(EntryId::ROOT, "a.txt", ContentKind::Leaf, fingerprint(b"hello"), 5);
        let inner = tree.push(
            EntryId::ROOT,
            "inner.jar",
            ContentKind::Container,
            fingerprint(b"jar bytes"),
            9,
        );
        tree.push(inner, "b.txt", ContentKind::Leaf, fingerprint(b"hello"), 5);
        tree.push(inner, "a.txt", ContentKind::Leaf, fingerprint(b"other"), 5);
        ScanReport::new(tree, Vec::new(), 24)
    }

    #[test]
    fn test_counts_built_from_tree() {
        let report = report();
        assert_eq!(report.total_entries(), 4);
        assert_eq!(report.containers(), 1);
        assert_eq!(report.counts.count(&fingerprint(b"hello")), 2);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_shadowed_members_are_warnings() {
        let mut report = report();
        report.shadowed.push(ShadowedMembers {
            id: EntryId::ROOT,
            hidden: 1,
        });
        assert!(report.has_warnings());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_sorted_by_checksum() {
        let report = report();
        let digests: Vec<_> = report
            .sorted(SortOrder::Checksum)
            .iter()
            .map(|e| e.digest().as_str().to_string())
            .collect();
        let mut expected = digests.clone();
        expected.sort();
        assert_eq!(digests, expected);
    }

    #[test]
    fn test_checksum_ties_keep_discovery_order() {
        let report = report();
        let hello = fingerprint(b"hello");
        let names: Vec<_> = report
            .sorted(SortOrder::Checksum)
            .into_iter()
            .filter(|e| e.digest() == &hello)
            .map(Entry::name)
            .collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_sorted_by_name_groups_by_file_name() {
        let report = report();
        let lines: Vec<_> = report
            .sorted(SortOrder::Name)
            .iter()
            .map(|e| format!("{}@{}", e.name(), report.path(e)))
            .collect();
        assert_eq!(
            lines,
            ["a.txt@/", "a.txt@/inner.jar/", "b.txt@/inner.jar/", "inner.jar@/"]
        );
    }

    #[test]
    fn test_sort_order_labels() {
        assert_eq!(SortOrder::default(), SortOrder::Name);
        assert_eq!(SortOrder::Checksum.as_str(), "checksum");
    }
}
