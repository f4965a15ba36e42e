//! Dependency metadata inside package archives.
//!
//! Alpine `.apk` files are concatenated gzip streams of tar segments with a
//! `.PKGINFO` entry. Debian-style packages carry a nested `control.tar[.gz]`
//! whose `control` file lists `Depends:`. `.PKGINFO` wins when both exist.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use apkgraph_core::package::PackageId;
use apkgraph_util::errors::ApkGraphError;
use flate2::read::MultiGzDecoder;
use tar::Archive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read the dependency list from the archive at `path`.
pub fn read_dependencies(path: &Path) -> miette::Result<BTreeSet<PackageId>> {
    tracing::debug!("reading metadata from {}", path.display());
    let file = File::open(path).map_err(ApkGraphError::Io)?;
    parse_archive(BufReader::new(file)).map_err(|e| match e {
        ApkGraphError::Archive { message } => ApkGraphError::Archive {
            message: format!("{}: {message}", path.display()),
        }
        .into(),
        other => other.into(),
    })
}

/// Read the dependency list from a gzip-compressed package archive.
pub fn parse_archive<R: Read>(reader: R) -> Result<BTreeSet<PackageId>, ApkGraphError> {
    let mut archive = Archive::new(MultiGzDecoder::new(reader));
    archive.set_ignore_zeros(true);

    let mut control: Option<(String, Vec<u8>)> = None;
    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        let name = entry_name(&entry)?;

        if name == ".PKGINFO" {
            let content = read_text(&mut entry)?;
            let deps = parse_pkginfo(&content);
            tracing::debug!(count = deps.len(), "dependencies in .PKGINFO");
            return Ok(deps);
        }
        if control.is_none() && (name.ends_with("control.tar.gz") || name.ends_with("control.tar"))
        {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).map_err(archive_err)?;
            control = Some((name, bytes));
        }
    }

    match control {
        Some((name, bytes)) => {
            tracing::debug!("no .PKGINFO, reading {name}");
            read_control_archive(&bytes)
        }
        None => Err(ApkGraphError::Archive {
            message: "no package metadata (.PKGINFO or control.tar) found".to_string(),
        }),
    }
}

/// Dependencies from a nested control tarball, gzip-compressed or not.
fn read_control_archive(bytes: &[u8]) -> Result<BTreeSet<PackageId>, ApkGraphError> {
    let reader: Box<dyn Read + '_> = if bytes.starts_with(&GZIP_MAGIC) {
        Box::new(MultiGzDecoder::new(bytes))
    } else {
        Box::new(bytes)
    };
    let mut archive = Archive::new(reader);
    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        if entry_name(&entry)? == "control" {
            let content = read_text(&mut entry)?;
            let deps = parse_control(&content);
            tracing::debug!(count = deps.len(), "dependencies in control");
            return Ok(deps);
        }
    }
    Ok(BTreeSet::new())
}

/// `depend = X` lines of a `.PKGINFO` file.
pub fn parse_pkginfo(content: &str) -> BTreeSet<PackageId> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("depend = "))
        .filter_map(|line| line.split_once('='))
        .map(|(_, dep)| dep.trim())
        .filter(|dep| !dep.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated entries of the `Depends:` line of a Debian `control` file.
pub fn parse_control(content: &str) -> BTreeSet<PackageId> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Depends:"))
        .filter_map(|line| line.split_once(':'))
        .flat_map(|(_, deps)| deps.split(','))
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(str::to_string)
        .collect()
}

fn entry_name<R: Read>(entry: &tar::Entry<'_, R>) -> Result<String, ApkGraphError> {
    let path = entry.path().map_err(archive_err)?;
    Ok(path
        .to_string_lossy()
        .trim_start_matches("./")
        .to_string())
}

fn read_text<R: Read>(reader: &mut R) -> Result<String, ApkGraphError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(archive_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn archive_err(e: std::io::Error) -> ApkGraphError {
    ApkGraphError::Archive {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkginfo_depend_lines() {
        let content = "\
# Generated by abuild
pkgname = busybox
pkgver = 1.37.0-r13
depend = so:libc.musl-x86_64.so.1
depend = musl
dependent = ignored
makedepend = ignored
depend =
";
        assert_eq!(
            parse_pkginfo(content),
            BTreeSet::from(["musl".to_string(), "so:libc.musl-x86_64.so.1".to_string()])
        );
    }

    #[test]
    fn control_depends_line() {
        let content = "\
Package: curl
Version: 8.5.0-2
Depends: libc6 (>= 2.34), libcurl4 (= 8.5.0-2), zlib1g,
Description: command line tool
";
        assert_eq!(
            parse_control(content),
            BTreeSet::from([
                "libc6 (>= 2.34)".to_string(),
                "libcurl4 (= 8.5.0-2)".to_string(),
                "zlib1g".to_string(),
            ])
        );
    }

    #[test]
    fn control_without_depends_is_empty() {
        assert!(parse_control("Package: base-files\n").is_empty());
    }
}
