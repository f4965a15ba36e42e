use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all apkgraph operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ApkGraphError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The global configuration file could not be read or parsed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.apkgraph/config.toml for syntax errors"))]
    Config { message: String },

    /// A package repository could not be loaded or does not hold a package.
    #[error("Repository error: {message}")]
    Repository { message: String },

    /// Network request or download failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// A package archive could not be read or holds no metadata.
    #[error("Archive error: {message}")]
    Archive { message: String },

    /// A package file does not exist where it was expected.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// User input failed validation.
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Writing or rendering an output file failed.
    #[error("Output error: {message}")]
    Output { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
