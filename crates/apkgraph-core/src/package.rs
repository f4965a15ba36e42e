//! Package identifiers and validation of user-supplied package coordinates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use apkgraph_util::errors::ApkGraphError;
use regex::Regex;

/// Opaque package name. Compared as an exact string.
pub type PackageId = String;

/// `1`, `1.2`, `1.2.3`, optionally followed by `-r0`, `_git20240101`, and so on.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+){0,2}([_-]\w+)*$").expect("valid version regex")
});

/// Image formats the dependency graph can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpg,
    Svg,
}

impl OutputFormat {
    /// The format name Graphviz expects after `-T`.
    pub fn graphviz_name(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
        }
    }

    fn from_file_name(name: &str) -> Option<Self> {
        [
            (".png", OutputFormat::Png),
            (".jpg", OutputFormat::Jpg),
            (".svg", OutputFormat::Svg),
        ]
        .into_iter()
        .find(|(ext, _)| name.ends_with(ext))
        .map(|(_, format)| format)
    }
}

/// A validated output file for the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl OutputTarget {
    /// Sibling path that receives the DOT source (`graph.svg` → `graph.dot`).
    pub fn dot_path(&self) -> PathBuf {
        self.path.with_extension("dot")
    }
}

/// A repository location: either an HTTP(S) base URL or a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoLocation {
    Url(String),
    Path(PathBuf),
}

impl RepoLocation {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            RepoLocation::Path(p) => Some(p),
            RepoLocation::Url(_) => None,
        }
    }
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoLocation::Url(url) => f.write_str(url),
            RepoLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reject blank package names.
pub fn parse_package_name(value: &str) -> Result<PackageId, ApkGraphError> {
    if value.trim().is_empty() {
        return Err(ApkGraphError::Validation {
            message: "package name must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validate an APK-style version string such as `1.37.0-r13`.
pub fn parse_version(value: &str) -> Result<String, ApkGraphError> {
    if value.trim().is_empty() {
        return Err(ApkGraphError::Validation {
            message: "package version must not be empty".to_string(),
        });
    }
    if !VERSION_RE.is_match(value) {
        return Err(ApkGraphError::Validation {
            message: format!(
                "version '{value}' must look like X.Y or X.Y.Z, optionally with a suffix (e.g. 1.0.3 or 1.2.3-r0)"
            ),
        });
    }
    Ok(value.to_string())
}

/// Accept an `http://`/`https://` URL as-is; anything else is a path made absolute.
///
/// Whether the path exists is checked later by the source that opens it.
pub fn parse_repo_location(value: &str) -> Result<RepoLocation, ApkGraphError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApkGraphError::Validation {
            message: "repository URL or path must not be empty".to_string(),
        });
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(RepoLocation::Url(trimmed.to_string()));
    }
    let path = apkgraph_util::fs::absolutize(Path::new(trimmed))?;
    Ok(RepoLocation::Path(path))
}

/// Validate an output file name ending in `.png`, `.jpg`, or `.svg`.
pub fn parse_output(value: &str) -> Result<OutputTarget, ApkGraphError> {
    if value.trim().is_empty() {
        return Err(ApkGraphError::Validation {
            message: "output file name must not be empty".to_string(),
        });
    }
    let format = OutputFormat::from_file_name(value).ok_or_else(|| ApkGraphError::Validation {
        message: format!("output file '{value}' must end in .png, .jpg or .svg"),
    })?;
    Ok(OutputTarget {
        path: PathBuf::from(value),
        format,
    })
}
