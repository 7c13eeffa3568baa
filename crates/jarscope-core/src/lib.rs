//! Nested zip archive walker with content checksums and duplicate detection.
//!
//! `jarscope-core` walks a Java enterprise archive (EAR, WAR, JAR, or any
//! zip file) breadth-first, descending into every member that is itself a
//! zip archive. Each member gets its containment path, a SHA-1 digest of its
//! bytes, and a leaf/container classification; digest counts across the
//! whole tree reveal byte-identical artifacts bundled in several modules.
//!
//! # Examples
//!
//! ```no_run
//! use jarscope_core::ScanConfig;
//! use jarscope_core::walk;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = walk("application.ear", &ScanConfig::default())?;
//! for (digest, count) in report.counts.duplicates() {
//!     println!("{digest} appears {count} times");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod digest;
pub mod entry;
pub mod error;
pub mod io;
pub mod quota;
pub mod report;
pub mod stats;
pub mod test_utils;
pub mod walker;

// Re-export main API types
pub use config::CorruptContainerPolicy;
pub use config::ScanConfig;
pub use digest::Digest;
pub use digest::fingerprint;
pub use digest::is_container;
pub use entry::ContentKind;
pub use entry::Entry;
pub use entry::EntryId;
pub use entry::EntryTree;
pub use error::QuotaResource;
pub use error::Result;
pub use error::ScanError;
pub use report::NoopObserver;
pub use report::ScanObserver;
pub use report::ScanReport;
pub use report::ShadowedMembers;
pub use report::SkippedContainer;
pub use report::SortOrder;
pub use stats::DigestCounts;
pub use walker::walk;
pub use walker::walk_reader;
pub use walker::walk_with_observer;
