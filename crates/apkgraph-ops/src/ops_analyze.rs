//! Operation: build and report the dependency graph of one package.

use apkgraph_core::config::GlobalConfig;
use apkgraph_core::mode::SourceMode;
use apkgraph_core::package::{OutputTarget, PackageId, RepoLocation};
use apkgraph_core::source::DependencySource;
use apkgraph_graph::render::{render_stats, render_tree};
use apkgraph_graph::{BuildOptions, DependencyGraph};
use apkgraph_repo::archive::ArchiveBackedSource;
use apkgraph_repo::fetch::ArchiveFetcher;
use apkgraph_repo::test_repo::{FileBackedSource, RepositoryOptions};
use apkgraph_util::errors::ApkGraphError;

use crate::ops_export;

const BANNER_WIDTH: usize = 60;

/// Everything the user asked for on the command line.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub package: PackageId,
    pub repo: RepoLocation,
    pub mode: SourceMode,
    pub version: Option<String>,
    pub output: Option<OutputTarget>,
    pub exclude: Option<String>,
    /// Overrides `[graph] max-depth` from the config file.
    pub max_depth: Option<usize>,
    /// Parsing policy for `test` mode repositories.
    pub repository: RepositoryOptions,
}

impl AnalyzeOptions {
    fn build_options(&self, config: &GlobalConfig) -> BuildOptions {
        BuildOptions {
            exclude: self.exclude.clone().filter(|e| !e.is_empty()),
            max_depth: self.max_depth.unwrap_or(config.graph.max_depth),
        }
    }
}

/// A finished traversal.
#[derive(Debug)]
pub struct Analysis {
    /// The start package as the source names it.
    pub start: PackageId,
    pub graph: DependencyGraph,
}

/// Open the dependency source selected by `opts.mode`.
///
/// Fails before any traversal when the inputs cannot work: a missing
/// version for archive modes, a URL in test mode, an unreadable repository
/// file, or a start package the test repository does not declare.
pub fn open_source(
    opts: &AnalyzeOptions,
    config: &GlobalConfig,
) -> miette::Result<Box<dyn DependencySource>> {
    match opts.mode {
        SourceMode::Test => {
            let path = opts.repo.as_path().ok_or_else(|| ApkGraphError::Validation {
                message: "test mode needs a repository file path, not a URL".to_string(),
            })?;
            let repo = FileBackedSource::load(path, opts.repository)?;
            if !repo.contains(&opts.package) {
                return Err(ApkGraphError::Repository {
                    message: format!("package {} not found in {}", opts.package, path.display()),
                }
                .into());
            }
            Ok(Box::new(repo))
        }
        SourceMode::Local | SourceMode::Remote => {
            let version = opts.version.as_deref().ok_or_else(|| ApkGraphError::Validation {
                message: format!("--version is required in {} mode", opts.mode),
            })?;
            if opts.mode == SourceMode::Local && opts.repo.as_path().is_none() {
                return Err(ApkGraphError::Validation {
                    message: "local mode needs a directory path, not a URL".to_string(),
                }
                .into());
            }
            if opts.mode == SourceMode::Remote && opts.repo.as_path().is_some() {
                return Err(ApkGraphError::Validation {
                    message: "remote mode needs an http:// or https:// repository URL".to_string(),
                }
                .into());
            }
            let fetcher = ArchiveFetcher::for_location(&opts.repo, version, &config.download)?;
            Ok(Box::new(ArchiveBackedSource::new(fetcher)))
        }
    }
}

/// Build the graph for `opts.package`.
pub fn analyze(opts: &AnalyzeOptions, config: &GlobalConfig) -> miette::Result<Analysis> {
    let source = open_source(opts, config)?;
    let start = source.normalize(&opts.package);
    let build_options = opts.build_options(config);

    tracing::debug!(
        start = %start,
        mode = %opts.mode,
        max_depth = build_options.max_depth,
        exclude = ?build_options.exclude,
        "building dependency graph"
    );
    let mut graph = DependencyGraph::new();
    graph.build(&start, source.as_ref(), &build_options);

    Ok(Analysis { start, graph })
}

/// The configuration summary printed before the analysis.
pub fn banner(opts: &AnalyzeOptions, config: &GlobalConfig) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let mut output = String::new();
    output.push_str(&format!("{rule}\n DEPENDENCY GRAPH ANALYSIS\n{rule}\n"));
    output.push_str(&format!("Package: {}\n", opts.package));
    output.push_str(&format!("Source: {}\n", opts.repo));
    output.push_str(&format!("Mode: {}\n", opts.mode));
    if let Some(ref version) = opts.version {
        output.push_str(&format!("Version: {version}\n"));
    }
    if let Some(ref exclude) = opts.exclude {
        output.push_str(&format!("Exclude: {exclude}\n"));
    }
    output.push_str(&format!(
        "Max depth: {}\n",
        opts.build_options(config).max_depth
    ));
    output.push_str(&format!("{rule}\n"));
    output
}

/// Tree, cycle list and statistics for a finished analysis.
pub fn report(analysis: &Analysis) -> String {
    let mut output = render_tree(&analysis.start, &analysis.graph);
    output.push('\n');
    output.push_str(&render_stats(&analysis.graph));
    output
}

/// Run the whole `apkgraph` flow, printing to stdout.
pub fn run(opts: &AnalyzeOptions, config: &GlobalConfig) -> miette::Result<()> {
    print!("{}", banner(opts, config));

    let analysis = analyze(opts, config)?;
    println!();
    print!("{}", report(&analysis));

    for failure in analysis.graph.failures() {
        apkgraph_util::progress::status_warn(
            "Skipped",
            &format!("{}: {}", failure.package, failure.message),
        );
    }

    if let Some(ref target) = opts.output {
        let exported = ops_export::export(&analysis, target)?;
        if exported.rendered {
            println!("\nGraph saved to: {}", target.path.display());
        } else {
            println!("\nGraph source saved to: {}", exported.dot_path.display());
        }
    }

    println!("\nAnalysis completed successfully!");
    Ok(())
}
