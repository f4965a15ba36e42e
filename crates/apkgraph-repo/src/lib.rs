//! Package repositories: where dependency lists come from.
//!
//! [`test_repo::FileBackedSource`] reads a plain-text repository file;
//! [`archive::ArchiveBackedSource`] fetches `.apk` archives (locally or over
//! HTTP) and reads their metadata.

pub mod archive;
pub mod fetch;
pub mod metadata;
pub mod test_repo;
