//! I/O utilities for reading archive members.

pub mod directory;
pub mod hashing;

pub use directory::declared_record_count;
pub use hashing::DigestWriter;
