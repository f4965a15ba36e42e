//! Handler for the dependency graph analysis.

use miette::Result;

use apkgraph_core::config::GlobalConfig;
use apkgraph_ops::ops_analyze::{self, AnalyzeOptions};
use apkgraph_repo::test_repo::{CaseFolding, RepositoryOptions};

use crate::cli::Cli;

pub fn exec(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load()?,
    };

    let case_folding = if cli.fold_case {
        CaseFolding::Upper
    } else {
        CaseFolding::Sensitive
    };
    let opts = AnalyzeOptions {
        package: cli.package_name,
        repo: cli.repo_url,
        mode: cli.mode,
        version: cli.version,
        output: cli.output,
        exclude: cli.exclude,
        max_depth: cli.max_depth,
        repository: RepositoryOptions {
            case_folding,
            alphabetic_only: cli.alphabetic_only,
        },
    };

    ops_analyze::run(&opts, &config)
}
