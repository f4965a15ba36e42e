//! Plain-text test repositories.
//!
//! One package per line, `NAME: dep1, dep2, ...`. Blank lines and lines
//! starting with `#` are ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use apkgraph_core::package::PackageId;
use apkgraph_core::source::DependencySource;
use apkgraph_util::errors::ApkGraphError;

/// How package ids are compared when stored and looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseFolding {
    /// Ids are used exactly as written.
    #[default]
    Sensitive,
    /// Ids are upper-cased on load and on every lookup.
    Upper,
}

impl CaseFolding {
    fn apply(self, id: &str) -> PackageId {
        match self {
            CaseFolding::Sensitive => id.to_string(),
            CaseFolding::Upper => id.to_uppercase(),
        }
    }
}

/// Parsing policy for a test repository file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryOptions {
    pub case_folding: CaseFolding,
    /// Drop dependency names containing anything but letters.
    pub alphabetic_only: bool,
}

/// A [`DependencySource`] backed by a test repository file.
#[derive(Debug, Clone)]
pub struct FileBackedSource {
    packages: BTreeMap<PackageId, BTreeSet<PackageId>>,
    options: RepositoryOptions,
}

impl FileBackedSource {
    /// Read and parse the repository at `path`.
    pub fn load(path: &Path, options: RepositoryOptions) -> miette::Result<Self> {
        if !path.is_file() {
            return Err(ApkGraphError::NotFound {
                message: format!("repository file {} does not exist", path.display()),
            }
            .into());
        }
        tracing::info!("loading test repository from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| ApkGraphError::Repository {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Ok(Self::parse(&content, options))
    }

    /// Parse repository text. Malformed lines are logged and skipped.
    pub fn parse(content: &str, options: RepositoryOptions) -> Self {
        let mut packages = BTreeMap::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, deps)) = line.split_once(':') else {
                tracing::warn!("line {}: expected `NAME: deps`, got {line:?}", line_num + 1);
                continue;
            };
            let name = options.case_folding.apply(name.trim());
            if name.is_empty() {
                tracing::warn!("line {}: missing package name", line_num + 1);
                continue;
            }

            let deps: BTreeSet<PackageId> = deps
                .split(',')
                .map(str::trim)
                .filter(|dep| !dep.is_empty())
                .filter(|dep| !options.alphabetic_only || dep.chars().all(char::is_alphabetic))
                .map(|dep| options.case_folding.apply(dep))
                .collect();

            tracing::debug!(package = %name, ?deps, "loaded package");
            if packages.insert(name.clone(), deps).is_some() {
                tracing::debug!(package = %name, "duplicate entry replaces earlier one");
            }
        }

        Self {
            packages,
            options,
        }
    }

    /// Whether the repository declares `package`.
    pub fn contains(&self, package: &str) -> bool {
        self.packages
            .contains_key(&self.options.case_folding.apply(package))
    }

    /// All declared package names, sorted.
    pub fn packages(&self) -> Vec<&str> {
        self.packages.keys().map(String::as_str).collect()
    }
}

impl DependencySource for FileBackedSource {
    fn dependencies_of(&self, package: &str) -> miette::Result<BTreeSet<PackageId>> {
        Ok(self
            .packages
            .get(&self.options.case_folding.apply(package))
            .cloned()
            .unwrap_or_default())
    }

    fn normalize(&self, package: &str) -> PackageId {
        self.options.case_folding.apply(package)
    }
}
