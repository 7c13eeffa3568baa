//! End-of-central-directory lookup.
//!
//! The `zip` reader indexes members by name, so when two central-directory
//! records share a name only the last one is reachable. Comparing the record
//! count declared in the end-of-central-directory record with the reader's
//! member count reveals how many records were hidden that way.

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

/// End-of-central-directory signature `PK\x05\x06`.
const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Fixed part of the end-of-central-directory record.
const EOCD_LEN: usize = 22;

/// Offset of the "total number of records" field within the record.
const TOTAL_RECORDS_OFFSET: usize = 10;

/// Longest archive comment that may follow the record.
const MAX_COMMENT_LEN: u64 = 0xFFFF;

/// Returns the number of central-directory records the archive declares.
///
/// `None` when no end-of-central-directory record is found, or when the
/// count is deferred to a zip64 record. The reader is rewound to the start.
///
/// # Examples
///
/// ```
/// use jarscope_core::io::declared_record_count;
/// use jarscope_core::test_utils::create_test_zip;
/// use std::io::Cursor;
///
/// let data = create_test_zip(vec![("a.txt", b"one"), ("b.txt", b"two")]);
/// assert_eq!(declared_record_count(&mut Cursor::new(&data))?, Some(2));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn declared_record_count<R: Read + Seek>(reader: &mut R) -> std::io::Result<Option<usize>> {
    let len = reader.seek(SeekFrom::End(0))?;
    let tail_len = len.min(EOCD_LEN as u64 + MAX_COMMENT_LEN);
    reader.seek(SeekFrom::Start(len - tail_len))?;

    let mut tail = Vec::new();
    reader.by_ref().take(tail_len).read_to_end(&mut tail)?;
    reader.seek(SeekFrom::Start(0))?;

    Ok(record_count_in_tail(&tail))
}

fn record_count_in_tail(tail: &[u8]) -> Option<usize> {
    let last_start = tail.len().checked_sub(EOCD_LEN)?;
    let start = (0..=last_start)
        .rev()
        .find(|&i| tail[i..i + EOCD_SIGNATURE.len()] == EOCD_SIGNATURE)?;

    let field = start + TOTAL_RECORDS_OFFSET;
    let count = u16::from_le_bytes([tail[field], tail[field + 1]]);
    (count != u16::MAX).then_some(usize::from(count))
}
