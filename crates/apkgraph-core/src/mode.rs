use std::fmt;
use std::str::FromStr;

use apkgraph_util::errors::ApkGraphError;

/// Where package metadata comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// `.apk` archives in a local directory.
    Local,
    /// `.apk` archives downloaded from a repository URL.
    Remote,
    /// A plain-text test repository file.
    Test,
}

impl SourceMode {
    pub const ALL: [SourceMode; 3] = [SourceMode::Local, SourceMode::Remote, SourceMode::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceMode::Local => "local",
            SourceMode::Remote => "remote",
            SourceMode::Test => "test",
        }
    }

    /// Whether this mode reads package archives and so needs a version.
    pub fn needs_version(self) -> bool {
        !matches!(self, SourceMode::Test)
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceMode {
    type Err = ApkGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = SourceMode::ALL.iter().map(|m| m.as_str()).collect();
                ApkGraphError::Validation {
                    message: format!(
                        "mode '{s}' is not supported; use one of: {}",
                        allowed.join(", ")
                    ),
                }
            })
    }
}
