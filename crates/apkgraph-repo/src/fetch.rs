//! Locating `.apk` archives: a local directory or an HTTP repository.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use apkgraph_core::config::DownloadConfig;
use apkgraph_core::package::RepoLocation;
use apkgraph_util::errors::ApkGraphError;
use reqwest::blocking::{Client, Response};

/// Downloads at least this large get a progress bar.
const PROGRESS_THRESHOLD: u64 = 100_000;

/// File name of the archive for `package` at `version`.
pub fn archive_name(package: &str, version: &str) -> String {
    format!("{package}-{version}.apk")
}

/// Join a repository base URL and an archive name.
///
/// The base is treated as a directory whether or not it ends in `/`.
pub fn archive_url(base: &str, name: &str) -> String {
    format!("{}/{name}", base.trim_end_matches('/'))
}

/// Whether `name` names a file directly inside a directory, with no
/// separators or parent components.
fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && Path::new(name).file_name() == Some(OsStr::new(name))
}

/// Build a blocking HTTP client for archive downloads.
pub fn build_client(config: &DownloadConfig) -> miette::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| {
            ApkGraphError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// Turns a package name into a path to its archive on disk.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    location: RepoLocation,
    version: String,
    download_dir: PathBuf,
    client: Option<Client>,
}

impl ArchiveFetcher {
    /// Fetcher for archives stored directly in `dir`.
    pub fn local(dir: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            location: RepoLocation::Path(dir.into()),
            version: version.into(),
            download_dir: PathBuf::new(),
            client: None,
        }
    }

    /// Fetcher that downloads archives from `base_url` into `config.dir`.
    pub fn remote(
        base_url: impl Into<String>,
        version: impl Into<String>,
        config: &DownloadConfig,
    ) -> miette::Result<Self> {
        Ok(Self {
            location: RepoLocation::Url(base_url.into()),
            version: version.into(),
            download_dir: config.dir.clone(),
            client: Some(build_client(config)?),
        })
    }

    /// Pick local or remote behaviour from a parsed repository location.
    pub fn for_location(
        location: &RepoLocation,
        version: &str,
        config: &DownloadConfig,
    ) -> miette::Result<Self> {
        match location {
            RepoLocation::Path(dir) => Ok(Self::local(dir.clone(), version)),
            RepoLocation::Url(url) => Self::remote(url.clone(), version, config),
        }
    }

    /// Return a local path to the archive of `package`, downloading it first
    /// when the repository is remote.
    pub fn fetch(&self, package: &str) -> miette::Result<PathBuf> {
        let name = archive_name(package, &self.version);
        if !is_plain_file_name(&name) {
            return Err(ApkGraphError::Validation {
                message: format!("package id {package:?} is not a plain file name"),
            }
            .into());
        }
        match &self.location {
            RepoLocation::Path(dir) => {
                let path = dir.join(&name);
                if !path.is_file() {
                    return Err(ApkGraphError::NotFound {
                        message: format!("{} does not exist locally", path.display()),
                    }
                    .into());
                }
                tracing::debug!("using local archive {}", path.display());
                Ok(path)
            }
            RepoLocation::Url(base) => {
                let url = archive_url(base, &name);
                let dest = self.download_dir.join(&name);
                self.download(&url, &dest)?;
                Ok(dest)
            }
        }
    }

    fn download(&self, url: &str, dest: &Path) -> miette::Result<()> {
        let client = self.client.as_ref().ok_or_else(|| ApkGraphError::Network {
            message: "remote fetcher has no HTTP client".to_string(),
        })?;
        apkgraph_util::fs::ensure_dir(&self.download_dir).map_err(ApkGraphError::Io)?;

        tracing::info!("downloading {url}");
        let resp = client.get(url).send().map_err(|e| ApkGraphError::Network {
            message: format!("Request to {url} failed: {e}"),
        })?;
        if !resp.status().is_success() {
            return Err(ApkGraphError::Network {
                message: format!("HTTP {} fetching {url}", resp.status()),
            }
            .into());
        }

        let result = write_body(resp, url, dest);
        if result.is_err() && dest.exists() {
            if let Err(e) = std::fs::remove_file(dest) {
                tracing::warn!("failed to remove partial download {}: {e}", dest.display());
            }
        }
        result?;
        tracing::info!("downloaded {}", dest.display());
        Ok(())
    }
}

/// Stream a response body into `dest`. Fails on a read error or an empty body.
fn write_body(resp: Response, url: &str, dest: &Path) -> miette::Result<()> {
    let total = resp.content_length().unwrap_or(0);
    let file = File::create(dest).map_err(ApkGraphError::Io)?;
    let mut writer = BufWriter::new(file);
    let copied = if total >= PROGRESS_THRESHOLD {
        let label = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pb = apkgraph_util::progress::download_bar(total, &label);
        let mut reader = pb.wrap_read(resp);
        let copied = std::io::copy(&mut reader, &mut writer);
        pb.finish_and_clear();
        copied
    } else {
        let mut resp = resp;
        std::io::copy(&mut resp, &mut writer)
    };
    copied
        .and_then(|_| writer.flush())
        .map_err(|e| ApkGraphError::Network {
            message: format!("Failed to read {url}: {e}"),
        })?;
    drop(writer);

    if !apkgraph_util::fs::is_non_empty_file(dest) {
        return Err(ApkGraphError::Network {
            message: format!("{url} downloaded an empty file"),
        }
        .into());
    }
    Ok(())
}
