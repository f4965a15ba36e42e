//! CLI argument definitions for apkgraph.
//!
//! Every flag is validated by a `clap` value parser, so bad input is rejected
//! before any repository is opened.

use std::path::PathBuf;

use apkgraph_core::mode::SourceMode;
use apkgraph_core::package::{
    parse_output, parse_package_name, parse_repo_location, parse_version, OutputTarget,
    RepoLocation,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "apkgraph",
    about = "Dependency graph analyzer for Alpine Linux packages",
    long_about = "apkgraph walks the dependencies of a package breadth-first, from .apk archives \
                  in a local directory or a remote repository, or from a plain-text test \
                  repository, and prints the dependency tree, cyclic dependencies and statistics.",
    arg_required_else_help = true,
    after_help = "Examples:\n  \
                  apkgraph --package-name A --repo-url test_repo.txt --mode test\n  \
                  apkgraph --package-name busybox --mode remote --version 1.37.0-r13 \\\n      \
                  --repo-url https://dl-cdn.alpinelinux.org/alpine/v3.21/main/x86_64/\n  \
                  apkgraph --package-name A --repo-url test_repo.txt --mode test --exclude C"
)]
pub struct Cli {
    /// Name of the package to analyze
    #[arg(long, value_parser = parse_package_name)]
    pub package_name: String,

    /// Repository URL, local directory of .apk files, or test repository file
    #[arg(long, value_parser = parse_repo_location)]
    pub repo_url: RepoLocation,

    /// Source mode: local, remote or test
    #[arg(long)]
    pub mode: SourceMode,

    /// Package version (required in local and remote modes)
    #[arg(long, value_parser = parse_version)]
    pub version: Option<String>,

    /// Output image for the graph (.png, .jpg or .svg)
    #[arg(long, value_parser = parse_output)]
    pub output: Option<OutputTarget>,

    /// Skip every dependency whose name contains this substring
    #[arg(long)]
    pub exclude: Option<String>,

    /// Maximum traversal depth [default: 10, or `[graph] max-depth` from the config]
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Upper-case package names in test repositories
    #[arg(long)]
    pub fold_case: bool,

    /// Ignore non-alphabetic dependency names in test repositories
    #[arg(long)]
    pub alphabetic_only: bool,

    /// Path to the config file [default: ~/.apkgraph/config.toml]
    #[arg(long, env = "APKGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
