//! Test utilities for building nested zip archives in memory.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (name, content). Files are stored uncompressed
/// in the given order.
///
/// # Examples
///
/// ```
/// use jarscope_core::test_utils::create_test_zip;
///
/// let inner = create_test_zip(vec![("b.txt", b"hello")]);
/// let outer = create_test_zip(vec![("a.txt", b"hello"), ("inner.jar", &inner)]);
/// assert!(jarscope_core::is_container(&outer));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut builder = ZipTestBuilder::new();
    for (name, data) in entries {
        builder = builder.add_file(name, data);
    }
    builder.build()
}

/// Flips the first byte of the first occurrence of `needle` in `archive`.
///
/// Used on stored members to produce an archive whose central directory is
/// intact (so it still probes as a container) but whose member data fails
/// its CRC check when read.
#[must_use]
pub fn corrupt_member_data(mut archive: Vec<u8>, needle: &[u8]) -> Vec<u8> {
    let pos = archive
        .windows(needle.len())
        .position(|window| window == needle)
        .unwrap();
    archive[pos] ^= 0xFF;
    archive
}

/// Replaces every occurrence of the member name `from` with `to`.
///
/// `ZipWriter` refuses duplicate names, so archives with two records under
/// one name are built with distinct names and renamed afterwards. Both names
/// must have the same length and `from` must not occur in any member data.
#[must_use]
pub fn rename_member(mut archive: Vec<u8>, from: &str, to: &str) -> Vec<u8> {
    assert_eq!(from.len(), to.len(), "names must have equal length");
    let (from, to) = (from.as_bytes(), to.as_bytes());
    let mut pos = 0;
    while pos + from.len() <= archive.len() {
        if &archive[pos..pos + from.len()] == from {
            archive[pos..pos + from.len()].copy_from_slice(to);
            pos += from.len();
        } else {
            pos += 1;
        }
    }
    archive
}

/// Builder for ZIP test archives with files, directories and nested
/// archives.
///
/// # Examples
///
/// ```
/// use jarscope_core::test_utils::ZipTestBuilder;
///
/// let lib = ZipTestBuilder::new()
///     .add_directory("com/example/")
///     .add_file("com/example/Util.class", b"\xca\xfe\xba\xbe")
///     .build();
///
/// let ear = ZipTestBuilder::new()
///     .add_file("META-INF/application.xml", b"<application/>")
///     .add_nested("lib/util.jar", &lib)
///     .build();
/// assert!(jarscope_core::is_container(&ear));
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    method: CompressionMethod,
}

impl ZipTestBuilder {
    /// Creates a new builder storing members uncompressed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            method: CompressionMethod::Stored,
        }
    }

    /// Deflates the members added after this call.
    #[must_use]
    pub fn deflated(mut self) -> Self {
        self.method = CompressionMethod::Deflated;
        self
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.method)
            .unix_permissions(0o644)
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, name: &str, data: &[u8]) -> Self {
        let options = self.options();
        self.writer.start_file(name, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory marker. `name` should end with `/`.
    #[must_use]
    pub fn add_directory(mut self, name: &str) -> Self {
        let options = self.options();
        self.writer.add_directory(name, options).unwrap();
        self
    }

    /// Adds an already-built archive as a member.
    #[must_use]
    pub fn add_nested(self, name: &str, archive: &[u8]) -> Self {
        self.add_file(name, archive)
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
