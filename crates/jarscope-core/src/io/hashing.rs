//! Hashing writer that fingerprints bytes as they pass through.
//!
//! Members are decompressed with `std::io::copy` into a buffer; wrapping the
//! buffer in a `DigestWriter` computes the SHA-1 in the same pass.

use std::io::Write;

use sha1::Digest as _;
use sha1::Sha1;

use crate::digest::Digest;

/// Wrapper writer that hashes and counts everything written through it.
///
/// The hash and the counter only advance by the number of bytes the inner
/// writer accepted, so a short write never desynchronizes them.
///
/// # Examples
///
/// ```
/// use jarscope_core::fingerprint;
/// use jarscope_core::io::DigestWriter;
/// use std::io::Write;
///
/// let mut writer = DigestWriter::new(Vec::new());
/// writer.write_all(b"hel")?;
/// writer.write_all(b"lo")?;
/// assert_eq!(writer.total_bytes(), 5);
///
/// let (buffer, digest) = writer.finish();
/// assert_eq!(buffer, b"hello");
/// assert_eq!(digest, fingerprint(b"hello"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct DigestWriter<W> {
    inner: W,
    hasher: Sha1,
    bytes_written: u64,
}

impl<W> DigestWriter<W> {
    /// Creates a new hashing writer around `inner`.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha1::new(),
            bytes_written: 0,
        }
    }

    /// Returns the number of bytes hashed so far.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Consumes the writer, returning the inner writer and the digest of
    /// everything written.
    #[must_use]
    pub fn finish(self) -> (W, Digest) {
        (self.inner, Digest::from_hasher(self.hasher))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fingerprint;
    use std::io::Cursor;

    #[test]
    fn test_empty_writer() {
        let writer = DigestWriter::new(Vec::<u8>::new());
        assert_eq!(writer.total_bytes(), 0);
        let (buffer, digest) = writer.finish();
        assert!(buffer.is_empty());
        assert_eq!(digest, fingerprint(b""));
    }

    #[test]
    fn test_copy_matches_fingerprint() {
        let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        let mut writer = DigestWriter::new(Vec::new());
        std::io::copy(&mut Cursor::new(&data), &mut writer).unwrap();

        assert_eq!(writer.total_bytes(), data.len() as u64);
        let (buffer, digest) = writer.finish();
        assert_eq!(buffer, data);
        assert_eq!(digest, fingerprint(&data));
    }

    #[test]
    fn test_short_writes_hash_only_accepted_bytes() {
        let mut backing = [0u8; 4];
        let mut writer = DigestWriter::new(&mut backing[..]);

        let written = writer.write(b"abcdef").unwrap();
        assert_eq!(written, 4);
        assert_eq!(writer.total_bytes(), 4);

        let (_, digest) = writer.finish();
        assert_eq!(digest, fingerprint(b"abcd"));
    }
}
