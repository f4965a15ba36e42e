//! A dependency source that reads real package archives.

use std::collections::BTreeSet;

use apkgraph_core::package::PackageId;
use apkgraph_core::source::DependencySource;

use crate::fetch::ArchiveFetcher;
use crate::metadata;

/// Fetches `{package}-{version}.apk` and reads its dependency metadata.
///
/// Fetching and parsing fail independently: a missing or undownloadable
/// archive is a not-found/network error, a corrupt one is an archive error.
#[derive(Debug, Clone)]
pub struct ArchiveBackedSource {
    fetcher: ArchiveFetcher,
}

impl ArchiveBackedSource {
    pub fn new(fetcher: ArchiveFetcher) -> Self {
        Self { fetcher }
    }
}

impl DependencySource for ArchiveBackedSource {
    fn dependencies_of(&self, package: &str) -> miette::Result<BTreeSet<PackageId>> {
        let path = self.fetcher.fetch(package)?;
        metadata::read_dependencies(&path)
    }
}
