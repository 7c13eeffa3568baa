//! Breadth-first walk over nested zip containers.
//!
//! The root archive is expanded first; every member that is itself a zip
//! archive is queued with its decompressed bytes and expanded in turn, until
//! no container is left. Each expansion opens its own reader over the
//! container's bytes and drops both once its members have been read.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::time::Instant;

use zip::ZipArchive;

use crate::ScanConfig;
use crate::ScanError;
use crate::config::CorruptContainerPolicy;
use crate::digest::Digest;
use crate::digest::is_container;
use crate::entry::ContentKind;
use crate::entry::EntryId;
use crate::entry::EntryTree;
use crate::error::Result;
use crate::io::DigestWriter;
use crate::io::declared_record_count;
use crate::quota::QuotaTracker;
use crate::report::NoopObserver;
use crate::report::ScanObserver;
use crate::report::ScanReport;
use crate::report::ShadowedMembers;
use crate::report::SkippedContainer;

/// Upper bound for buffer pre-allocation; declared sizes are not trusted.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// A member read from a container, not yet placed in the tree.
#[derive(Debug, Clone)]
pub struct Discovered {
    name: String,
    kind: ContentKind,
    digest: Digest,
    size: u64,
    content: Option<Vec<u8>>,
}

impl Discovered {
    /// Member name within its container.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leaf or container.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Content fingerprint.
    #[must_use]
    pub const fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Decompressed size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Decompressed bytes, retained only for containers.
    #[must_use]
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }
}

/// Opens a zip reader over a nested container's bytes.
pub fn open_container(content: Vec<u8>) -> Result<ZipArchive<Cursor<Vec<u8>>>> {
    ZipArchive::new(Cursor::new(content))
        .map_err(|e| ScanError::InvalidArchive(format!("failed to open ZIP archive: {e}")))
}

/// Reads every non-directory member of `archive` in central-directory order.
///
/// Each member is decompressed in full, fingerprinted and probed. Names
/// ending in `/` are directory markers and are skipped.
///
/// # Errors
///
/// Returns `ScanError::InvalidArchive` if a member cannot be read or
/// decompressed, and `ScanError::QuotaExceeded` if a limit is hit.
pub fn discover_children<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    quota: &mut QuotaTracker,
    config: &ScanConfig,
) -> Result<Vec<Discovered>> {
    let mut children = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(|e| {
            ScanError::InvalidArchive(format!("failed to read ZIP entry {index}: {e}"))
        })?;

        let name = file.name().to_string();
        if name.ends_with('/') {
            continue;
        }
        if name.is_empty() {
            tracing::debug!(index, "skipping unnamed member");
            continue;
        }

        quota.check_declared_size(&name, file.size(), config)?;

        let capacity = usize::try_from(file.size().min(MAX_PREALLOC)).unwrap_or(0);
        let mut writer = DigestWriter::new(Vec::with_capacity(capacity));
        let limit = config.max_entry_size.saturating_add(1);
        std::io::copy(&mut file.by_ref().take(limit), &mut writer)
            .map_err(|e| ScanError::InvalidArchive(format!("failed to read '{name}': {e}")))?;

        let size = writer.total_bytes();
        let (content, digest) = writer.finish();
        let kind = ContentKind::from_probe(is_container(&content));
        quota.record_entry(&name, size, kind, config)?;
        tracing::trace!(name = %name, is_container = kind.is_container(), "classified member");

        children.push(Discovered {
            name,
            kind,
            digest,
            size,
            content: kind.is_container().then_some(content),
        });
    }

    Ok(children)
}

/// Walks the archive at `archive_path` with default observation.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a zip archive,
/// if a quota is exceeded, or if a nested container is corrupt and the
/// policy is [`CorruptContainerPolicy::Abort`].
///
/// # Examples
///
/// ```no_run
/// use jarscope_core::ScanConfig;
/// use jarscope_core::SortOrder;
/// use jarscope_core::walk;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = walk("application.ear", &ScanConfig::default())?;
/// for entry in report.sorted(SortOrder::Checksum) {
///     println!("{} {}{}", entry.digest(), report.path(entry), entry.name());
/// }
/// # Ok(())
/// # }
/// ```
pub fn walk<P: AsRef<Path>>(archive_path: P, config: &ScanConfig) -> Result<ScanReport> {
    walk_with_observer(archive_path, config, &mut NoopObserver)
}

/// Walks the archive at `archive_path`, reporting progress to `observer`.
pub fn walk_with_observer<P: AsRef<Path>>(
    archive_path: P,
    config: &ScanConfig,
    observer: &mut dyn ScanObserver,
) -> Result<ScanReport> {
    let archive_path = archive_path.as_ref();
    tracing::info!(archive = %archive_path.display(), "scanning archive");
    let file = File::open(archive_path)?;
    walk_reader(BufReader::new(file), config, observer)
}

enum Pending<R> {
    Root {
        archive: ZipArchive<R>,
        declared: Option<usize>,
    },
    Nested {
        id: EntryId,
        content: Vec<u8>,
    },
}

/// Members read from one container.
struct Expansion {
    children: Vec<Discovered>,
    /// Records hidden behind a later record with the same name.
    hidden: usize,
}

fn expand<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    declared: Option<usize>,
    quota: &mut QuotaTracker,
    config: &ScanConfig,
) -> Result<Expansion> {
    let children = discover_children(archive, quota, config)?;
    let hidden = declared.map_or(0, |count| count.saturating_sub(archive.len()));
    Ok(Expansion { children, hidden })
}

/// Walks a zip archive read from any seekable source.
///
/// The root reader is consumed and dropped as soon as its members have been
/// read, whether the walk then succeeds or fails.
pub fn walk_reader<R: Read + Seek>(
    mut reader: R,
    config: &ScanConfig,
    observer: &mut dyn ScanObserver,
) -> Result<ScanReport> {
    let start = Instant::now();
    let declared = declared_record_count(&mut reader)?;
    let root = ZipArchive::new(reader)
        .map_err(|e| ScanError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    let mut tree = EntryTree::new();
    let mut quota = QuotaTracker::new();
    let mut skipped = Vec::new();
    let mut shadowed = Vec::new();
    let mut queue = VecDeque::from([Pending::Root {
        archive: root,
        declared,
    }]);

    while let Some(pending) = queue.pop_front() {
        let checkpoint = quota.checkpoint();
        let (id, result) = match pending {
            Pending::Root {
                mut archive,
                declared,
            } => (
                EntryId::ROOT,
                expand(&mut archive, declared, &mut quota, config),
            ),
            Pending::Nested { id, content } => {
                let depth = tree.get(id).map_or(0, crate::Entry::depth);
                QuotaTracker::check_depth(depth, config)?;
                let declared = declared_record_count(&mut Cursor::new(content.as_slice()));
                let result = declared
                    .map_err(ScanError::from)
                    .and_then(|declared| {
                        let mut archive = open_container(content)?;
                        expand(&mut archive, declared, &mut quota, config)
                    });
                (id, result)
            }
        };

        let Expansion { children, hidden } = match result {
            Ok(expansion) => expansion,
            Err(err) if id != EntryId::ROOT && err.is_unreadable_input() => {
                let location = full_name(&tree, id);
                let reason = err.context().map_or_else(|| err.to_string(), str::to_string);
                match config.on_corrupt {
                    CorruptContainerPolicy::Abort => {
                        return Err(ScanError::CorruptContainer {
                            path: location,
                            reason,
                        });
                    }
                    CorruptContainerPolicy::Skip => {
                        tracing::warn!(container = %location, %reason, "skipping corrupt nested container");
                        quota.restore(checkpoint);
                        if let Some(entry) = tree.get(id) {
                            observer.on_container_skipped(entry, &reason);
                        }
                        skipped.push(SkippedContainer { id, reason });
                        continue;
                    }
                }
            }
            Err(err) => return Err(err),
        };

        if hidden > 0 {
            tracing::warn!(
                container = %full_name(&tree, id),
                hidden,
                "member records hidden by a repeated name"
            );
            shadowed.push(ShadowedMembers { id, hidden });
        }

        let count = children.len();
        for child in children {
            let child_id = tree.push(id, child.name, child.kind, child.digest, child.size);
            if let Some(entry) = tree.get(child_id) {
                observer.on_entry_discovered(entry, &tree.path(child_id));
            }
            if let Some(content) = child.content {
                queue.push_back(Pending::Nested {
                    id: child_id,
                    content,
                });
            }
        }

        tracing::debug!(container = %full_name(&tree, id), children = count, "expanded container");
        if let Some(entry) = tree.get(id) {
            observer.on_container_expanded(entry, count);
        }
    }

    observer.on_complete(tree.len());

    let mut report = ScanReport::new(tree, skipped, quota.bytes_read());
    report.shadowed = shadowed;
    report.duration = start.elapsed();
    tracing::info!(
        entries = report.total_entries(),
        containers = report.containers(),
        skipped = report.skipped.len(),
        shadowed = report.shadowed.len(),
        "scan complete"
    );
    Ok(report)
}

fn full_name(tree: &EntryTree, id: EntryId) -> String {
    let name = tree.get(id).map_or("", crate::Entry::name);
    format!("{}{}", tree.path(id), name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::QuotaResource;
    use crate::fingerprint;
    use crate::test_utils::ZipTestBuilder;
    use crate::test_utils::corrupt_member_data;
    use crate::test_utils::create_test_zip;
    use crate::test_utils::rename_member;

    fn scan(data: Vec<u8>) -> ScanReport {
        walk_reader(Cursor::new(data), &ScanConfig::default(), &mut NoopObserver).unwrap()
    }

    #[test]
    fn test_discover_children_skips_directories() {
        let data = ZipTestBuilder::new()
            .add_directory("META-INF/")
            .add_file("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n")
            .build();
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        let mut quota = QuotaTracker::new();

        let children = discover_children(&mut archive, &mut quota, &ScanConfig::default()).unwrap();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), "META-INF/MANIFEST.MF");
        assert_eq!(children[0].kind(), ContentKind::Leaf);
        assert_eq!(children[0].size(), 22);
        assert!(children[0].content().is_none());
        assert_eq!(quota.entries_seen(), 1);
    }

    #[test]
    fn test_discover_children_keeps_container_bytes() {
        let inner = create_test_zip(vec![("b.txt", b"hello")]);
        let data = create_test_zip(vec![("inner.jar", &inner)]);
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();

        let children =
            discover_children(&mut archive, &mut QuotaTracker::new(), &ScanConfig::default())
                .unwrap();

        assert_eq!(children[0].kind(), ContentKind::Container);
        assert_eq!(children[0].content(), Some(inner.as_slice()));
        assert_eq!(children[0].digest(), &fingerprint(&inner));
    }

    #[test]
    fn test_discover_children_preserves_listing_order() {
        let data = create_test_zip(vec![("z.txt", b"1"), ("a.txt", b"2"), ("m.txt", b"3")]);
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        let children =
            discover_children(&mut archive, &mut QuotaTracker::new(), &ScanConfig::default())
                .unwrap();
        let names: Vec<_> = children.iter().map(Discovered::name).collect();
        assert_eq!(names, ["z.txt", "a.txt", "m.txt"]);
    }

    #[test]
    fn test_walk_nested_duplicate() {
        let inner = create_test_zip(vec![("b.txt", b"hello")]);
        let report = scan(create_test_zip(vec![("a.txt", b"hello"), ("inner.jar", &inner)]));

        assert_eq!(report.total_entries(), 3);
        let hello = fingerprint(b"hello");
        assert_eq!(report.counts.count(&hello), 2);

        let members: Vec<_> = report.tree.members().collect();
        assert_eq!(members[0].name(), "a.txt");
        assert_eq!(members[1].name(), "inner.jar");
        assert!(members[1].is_container());
        assert_ne!(members[1].digest(), &hello);
        assert_eq!(members[2].name(), "b.txt");
        assert_eq!(report.path(members[2]), "/inner.jar/");
        assert_eq!(report.path(members[0]), "/");
    }

    #[test]
    fn test_walk_is_breadth_first() {
        let deep = create_test_zip(vec![("deep.txt", b"deep")]);
        let mid = create_test_zip(vec![("deep.jar", &deep), ("mid.txt", b"mid")]);
        let report = scan(create_test_zip(vec![
            ("mid.jar", &mid),
            ("top.txt", b"top"),
        ]));

        let order: Vec<_> = report.tree.members().map(|e| e.name().to_string()).collect();
        assert_eq!(order, ["mid.jar", "top.txt", "deep.jar", "mid.txt", "deep.txt"]);
        let depths: Vec<_> = report.tree.members().map(crate::Entry::depth).collect();
        assert_eq!(depths, [1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_walk_flat_archive() {
        let report = scan(create_test_zip(vec![("a.txt", b"a"), ("b.txt", b"b")]));
        assert_eq!(report.total_entries(), 2);
        assert_eq!(report.containers(), 0);
        assert!(report.tree.members().all(|e| e.depth() == 1));
    }

    #[test]
    fn test_walk_empty_archive() {
        let report = scan(create_test_zip(vec![]));
        assert!(report.tree.is_empty());
        assert_eq!(report.counts.unique_digests(), 0);
    }

    #[test]
    fn test_walk_rejects_non_zip_root() {
        let result = walk_reader(
            Cursor::new(b"definitely not a zip".to_vec()),
            &ScanConfig::default(),
            &mut NoopObserver,
        );
        assert!(matches!(result, Err(ScanError::InvalidArchive(_))));
    }

    #[test]
    fn test_walk_missing_file() {
        let result = walk("/nonexistent/path/app.ear", &ScanConfig::default());
        assert!(matches!(result, Err(ScanError::Io(_))));
    }

    #[test]
    fn test_depth_quota() {
        let deep = create_test_zip(vec![("deep.txt", b"deep")]);
        let mid = create_test_zip(vec![("deep.jar", &deep)]);
        let data = create_test_zip(vec![("mid.jar", &mid)]);
        let config = ScanConfig {
            max_depth: 1,
            ..Default::default()
        };

        let result = walk_reader(Cursor::new(data), &config, &mut NoopObserver);
        assert!(matches!(
            result,
            Err(ScanError::QuotaExceeded {
                resource: QuotaResource::NestingDepth { depth: 2, max: 1 }
            })
        ));
    }

    #[test]
    fn test_entry_size_quota() {
        let data = create_test_zip(vec![("big.bin", &[7u8; 4096])]);
        let config = ScanConfig {
            max_entry_size: 1024,
            ..Default::default()
        };
        let result = walk_reader(Cursor::new(data), &config, &mut NoopObserver);
        assert!(matches!(
            result,
            Err(ScanError::QuotaExceeded {
                resource: QuotaResource::EntrySize { .. }
            })
        ));
    }

    #[test]
    fn test_entry_count_quota() {
        let data = create_test_zip(vec![("a", b"1"), ("b", b"2"), ("c", b"3")]);
        let config = ScanConfig {
            max_entry_count: 2,
            ..Default::default()
        };
        let result = walk_reader(Cursor::new(data), &config, &mut NoopObserver);
        assert!(matches!(result, Err(ScanError::QuotaExceeded { .. })));
    }

    fn archive_with_corrupt_jar() -> Vec<u8> {
        let inner = create_test_zip(vec![("x.txt", b"CORRUPT-ME-PAYLOAD")]);
        let broken = corrupt_member_data(inner, b"CORRUPT-ME-PAYLOAD");
        create_test_zip(vec![
            ("broken.jar", &broken),
            ("ok.txt", b"fine"),
        ])
    }

    #[test]
    fn test_corrupt_nested_container_is_skipped() {
        let report = scan(archive_with_corrupt_jar());

        let names: Vec<_> = report.tree.members().map(crate::Entry::name).collect();
        assert_eq!(names, ["broken.jar", "ok.txt"]);
        assert!(report.tree.members().next().unwrap().is_container());
        assert!(report.has_warnings());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id.index(), 1);
    }

    #[test]
    fn test_corrupt_nested_container_aborts_when_strict() {
        let config = ScanConfig {
            on_corrupt: CorruptContainerPolicy::Abort,
            ..Default::default()
        };
        let result = walk_reader(Cursor::new(archive_with_corrupt_jar()), &config, &mut NoopObserver);
        match result {
            Err(ScanError::CorruptContainer { path, .. }) => assert_eq!(path, "/broken.jar"),
            other => panic!("expected CorruptContainer, got {other:?}"),
        }
    }

    #[test]
    fn test_skipped_container_does_not_count_toward_quota() {
        let inner = create_test_zip(vec![
            ("good.txt", b"GOOD-PAYLOAD"),
            ("x.txt", b"CORRUPT-ME-PAYLOAD"),
        ]);
        let broken = corrupt_member_data(inner, b"CORRUPT-ME-PAYLOAD");
        let data = create_test_zip(vec![("broken.jar", &broken), ("ok.txt", b"fine")]);

        let report = scan(data);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.total_entries(), 2);
        assert_eq!(report.bytes_read, 4);
    }

    #[test]
    fn test_total_size_counts_leaf_bytes_once() {
        let deep = create_test_zip(vec![("deep.txt", b"deep")]);
        let mid = create_test_zip(vec![("deep.jar", &deep), ("mid.txt", b"mid")]);
        let data = create_test_zip(vec![("mid.jar", &mid), ("top.txt", b"top")]);

        let report = scan(data.clone());
        assert_eq!(report.bytes_read, 10);

        let config = ScanConfig {
            max_total_size: 10,
            ..Default::default()
        };
        let report = walk_reader(Cursor::new(data), &config, &mut NoopObserver).unwrap();
        assert_eq!(report.total_entries(), 5);
    }

    #[test]
    fn test_repeated_member_name_is_reported_as_shadowed() {
        let data = create_test_zip(vec![("a.txt", b"one"), ("b.txt", b"two")]);
        let data = rename_member(data, "b.txt", "a.txt");

        let report = scan(data);

        let names: Vec<_> = report.tree.members().map(crate::Entry::name).collect();
        assert_eq!(names, ["a.txt"]);
        assert_eq!(
            report.shadowed,
            vec![ShadowedMembers {
                id: EntryId::ROOT,
                hidden: 1,
            }]
        );
        assert!(report.has_warnings());
    }

    #[test]
    fn test_repeated_member_name_in_nested_container() {
        let inner = create_test_zip(vec![("dup.class", b"v1"), ("cup.class", b"v2")]);
        let inner = rename_member(inner, "cup.class", "dup.class");
        let data = create_test_zip(vec![("lib.jar", &inner), ("ok.txt", b"fine")]);

        let report = scan(data);

        assert_eq!(report.shadowed.len(), 1);
        assert_eq!(report.shadowed[0].hidden, 1);
        let lib = report.tree.get(report.shadowed[0].id).unwrap();
        assert_eq!(lib.name(), "lib.jar");
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_distinct_names_have_nothing_shadowed() {
        let inner = create_test_zip(vec![("b.txt", b"hello")]);
        let report = scan(create_test_zip(vec![("a.txt", b"hello"), ("inner.jar", &inner)]));
        assert!(report.shadowed.is_empty());
        assert!(!report.has_warnings());
    }

    #[derive(Default)]
    struct Recorder {
        discovered: Vec<(String, String, bool)>,
        expanded: Vec<(String, usize)>,
        skipped: Vec<String>,
        completed: Option<usize>,
    }

    impl ScanObserver for Recorder {
        fn on_entry_discovered(&mut self, entry: &crate::Entry, path: &str) {
            self.discovered
                .push((entry.name().to_string(), path.to_string(), entry.is_container()));
        }

        fn on_container_expanded(&mut self, entry: &crate::Entry, children: usize) {
            self.expanded.push((entry.name().to_string(), children));
        }

        fn on_container_skipped(&mut self, entry: &crate::Entry, _reason: &str) {
            self.skipped.push(entry.name().to_string());
        }

        fn on_complete(&mut self, total: usize) {
            self.completed = Some(total);
        }
    }

    #[test]
    fn test_observer_sees_discovery_order() {
        let inner = create_test_zip(vec![("b.txt", b"hello")]);
        let data = create_test_zip(vec![("a.txt", b"hello"), ("inner.jar", &inner)]);
        let mut recorder = Recorder::default();

        walk_reader(Cursor::new(data), &ScanConfig::default(), &mut recorder).unwrap();

        assert_eq!(
            recorder.discovered,
            vec![
                ("a.txt".to_string(), "/".to_string(), false),
                ("inner.jar".to_string(), "/".to_string(), true),
                ("b.txt".to_string(), "/inner.jar/".to_string(), false),
            ]
        );
        assert_eq!(
            recorder.expanded,
            vec![(String::new(), 2), ("inner.jar".to_string(), 1)]
        );
        assert!(recorder.skipped.is_empty());
        assert_eq!(recorder.completed, Some(3));
    }
}
