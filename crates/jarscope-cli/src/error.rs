//! Error conversion utilities for CLI.
//!
//! Converts jarscope-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use jarscope_core::QuotaResource;
use jarscope_core::ScanError;
use std::path::Path;

/// Flag that raises the limit behind a quota error.
const fn quota_flag(resource: &QuotaResource) -> &'static str {
    match resource {
        QuotaResource::EntryCount { .. } => "--max-entries",
        QuotaResource::TotalSize { .. } => "--max-total-size",
        QuotaResource::EntrySize { .. } => "--max-entry-size",
        QuotaResource::NestingDepth { .. } => "--max-depth",
    }
}

/// Converts `ScanError` to user-friendly anyhow error with context
pub fn convert_scan_error(err: ScanError, archive: &Path) -> anyhow::Error {
    match err {
        ScanError::Io(io_err) => {
            anyhow!(
                "Cannot read '{}': {}\n\
                 HINT: Check that the file exists and is readable.",
                archive.display(),
                io_err
            )
        }
        ScanError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The input must be a zip-based archive such as an EAR, WAR or JAR.",
                archive.display(),
                reason
            )
        }
        ScanError::CorruptContainer { path, reason } => {
            anyhow!(
                "Corrupt nested archive '{}' in '{}': {}\n\
                 HINT: Run without --strict to skip unreadable nested archives.",
                path,
                archive.display(),
                reason
            )
        }
        ScanError::QuotaExceeded { resource } => {
            let flag = quota_flag(&resource);
            anyhow!(
                "Scan limit exceeded for '{}': {}\n\
                 HINT: Use {} to raise the limit if the archive is trusted.",
                archive.display(),
                resource,
                flag
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(result: Result<T, ScanError>, archive: &Path) -> Result<T> {
    result.map_err(|e| convert_scan_error(e, archive))
}
