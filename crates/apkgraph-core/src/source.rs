//! The pluggable capability that answers "what does this package depend on?".

use std::collections::BTreeSet;

use crate::package::PackageId;

/// Anything that can list the direct dependencies of a package.
///
/// Implementations decide how ids are looked up (file, archive, network) and
/// whether they are case-folded. A failure is reported through the returned
/// error; callers treat every failure the same way.
pub trait DependencySource {
    /// Direct dependencies of `package`.
    fn dependencies_of(&self, package: &str) -> miette::Result<BTreeSet<PackageId>>;

    /// The id this source would store `package` under.
    ///
    /// Sources that fold case override this so callers can present the start
    /// package the way the source sees it.
    fn normalize(&self, package: &str) -> PackageId {
        package.to_string()
    }
}

impl<F> DependencySource for F
where
    F: Fn(&str) -> miette::Result<BTreeSet<PackageId>>,
{
    fn dependencies_of(&self, package: &str) -> miette::Result<BTreeSet<PackageId>> {
        self(package)
    }
}
