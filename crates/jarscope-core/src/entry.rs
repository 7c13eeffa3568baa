//! Discovered archive members and the arena that owns them.

use crate::digest::Digest;

/// Index of an entry inside an [`EntryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(usize);

impl EntryId {
    /// The synthetic root entry.
    pub const ROOT: Self = Self(0);

    /// Returns the position of this entry in discovery order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Whether a member's bytes form a zip container.
///
/// Decided once, when the member is read, and never re-probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Plain content.
    Leaf,
    /// A nested zip archive (JAR, WAR, ...) whose members are walked too.
    Container,
}

impl ContentKind {
    /// Maps the result of the container probe to a kind.
    #[must_use]
    pub const fn from_probe(is_container: bool) -> Self {
        if is_container {
            Self::Container
        } else {
            Self::Leaf
        }
    }

    /// Returns `true` for [`ContentKind::Container`].
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Container)
    }

    /// Lowercase label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::Container => "container",
        }
    }
}

/// One member at one position of the containment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: EntryId,
    name: String,
    parent: Option<EntryId>,
    depth: usize,
    kind: ContentKind,
    digest: Digest,
    size: u64,
}

impl Entry {
    /// Returns this entry's id.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Member name within the immediate parent container.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The container this member was read from; `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    /// Nesting depth: 0 for the root, 1 for members of the root archive.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Leaf or container.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Shorthand for `self.kind().is_container()`.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.kind.is_container()
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

    /// Returns `true` for the synthetic root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of every entry discovered during a walk, in discovery order.
///
/// Slot 0 always holds the synthetic root. Entries are only ever appended.
#[derive(Debug, Clone)]
pub struct EntryTree {
    entries: Vec<Entry>,
}

impl Default for EntryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryTree {
    /// Creates a tree holding only the root entry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![Entry {
                id: EntryId::ROOT,
                name: String::new(),
                parent: None,
                depth: 0,
                kind: ContentKind::Container,
                digest: Digest::root(),
                size: 0,
            }],
        }
    }

    /// Appends a member discovered inside `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree or `name` is empty;
    /// both indicate a walker bug.
    pub fn push(
        &mut self,
        parent: EntryId,
        name: impl Into<String>,
        kind: ContentKind,
        digest: Digest,
        size: u64,
    ) -> EntryId {
        let name = name.into();
        assert!(!name.is_empty(), "non-root entries must be named");
        let depth = self.entries[parent.0].depth + 1;
        let id = EntryId(self.entries.len());
        self.entries.push(Entry {
            id,
            name,
            parent: Some(parent),
            depth,
            kind,
            digest,
            size,
        });
        id
    }

    /// Returns the entry with `id`.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    /// Returns the synthetic root.
    #[must_use]
    pub fn root(&self) -> &Entry {
        &self.entries[0]
    }

    /// Iterates over discovered members, excluding the root.
    pub fn members(&self) -> impl ExactSizeIterator<Item = &Entry> {
        self.entries[1..].iter()
    }

    /// Number of members, excluding the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    /// Returns `true` if nothing besides the root was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Containment path of `id`: every ancestor's name followed by `/`.
    ///
    /// The root's path is empty and the root's own name is empty, so members
    /// of the root archive have path `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarscope_core::ContentKind;
    /// use jarscope_core::EntryId;
    /// use jarscope_core::EntryTree;
    /// use jarscope_core::fingerprint;
    ///
    /// let mut tree = EntryTree::new();
    /// let war = tree.push(EntryId::ROOT, "app.war", ContentKind::Container, fingerprint(b"war"), 3);
    /// let jar = tree.push(war, "WEB-INF/lib/util.jar", ContentKind::Container, fingerprint(b"jar"), 3);
    /// let class = tree.push(jar, "Util.class", ContentKind::Leaf, fingerprint(b"class"), 5);
    ///
    /// assert_eq!(tree.path(EntryId::ROOT), "");
    /// assert_eq!(tree.path(war), "/");
    /// assert_eq!(tree.path(class), "/app.war/WEB-INF/lib/util.jar/");
    /// ```
    #[must_use]
    pub fn path(&self, id: EntryId) -> String {
        let mut ancestors = Vec::new();
        let mut cursor = self.get(id).and_then(Entry::parent);
        while let Some(parent) = cursor {
            let entry = &self.entries[parent.0];
            ancestors.push(entry.name.as_str());
            cursor = entry.parent;
        }

        let mut path = String::new();
        for name in ancestors.iter().rev() {
            path.push_str(name);
            path.push('/');
        }
        path
    }
}
