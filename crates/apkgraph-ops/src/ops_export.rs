//! Operation: export the graph as Graphviz DOT and, when Graphviz is
//! installed, as the requested image.

use std::path::PathBuf;

use apkgraph_core::package::OutputTarget;
use apkgraph_graph::render::render_dot;
use apkgraph_util::errors::ApkGraphError;
use apkgraph_util::process::{self, CommandBuilder};
use apkgraph_util::progress::{status, status_warn};

use crate::ops_analyze::Analysis;

const GRAPHVIZ: &str = "dot";

/// What [`export`] managed to write.
#[derive(Debug)]
pub struct Exported {
    pub dot_path: PathBuf,
    /// Whether Graphviz produced the image at the target path.
    pub rendered: bool,
}

/// Write `<stem>.dot` next to the target and try to render the target image.
///
/// Failing to write the DOT file is an error. A missing or failing Graphviz
/// is only a warning, since the DOT source is still usable.
pub fn export(analysis: &Analysis, target: &OutputTarget) -> miette::Result<Exported> {
    let dot_path = target.dot_path();
    if let Some(parent) = dot_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        apkgraph_util::fs::ensure_dir(parent).map_err(|e| ApkGraphError::Output {
            message: format!("cannot create {}: {e}", parent.display()),
        })?;
    }
    std::fs::write(&dot_path, render_dot(&analysis.start, &analysis.graph)).map_err(|e| {
        ApkGraphError::Output {
            message: format!("cannot write {}: {e}", dot_path.display()),
        }
    })?;
    tracing::debug!("wrote {}", dot_path.display());

    if !process::is_available(GRAPHVIZ) {
        status_warn(
            "Skipped",
            "Graphviz `dot` not found; install it to render images",
        );
        return Ok(Exported {
            dot_path,
            rendered: false,
        });
    }

    let rendered = CommandBuilder::new(GRAPHVIZ)
        .arg(format!("-T{}", target.format.graphviz_name()))
        .arg(dot_path.to_string_lossy())
        .arg("-o")
        .arg(target.path.to_string_lossy())
        .exec_checked();
    match rendered {
        Ok(_) => {
            status("Rendered", &target.path.display().to_string());
            Ok(Exported {
                dot_path,
                rendered: true,
            })
        }
        Err(e) => {
            status_warn("Failed", &format!("rendering {}: {e}", target.path.display()));
            Ok(Exported {
                dot_path,
                rendered: false,
            })
        }
    }
}
