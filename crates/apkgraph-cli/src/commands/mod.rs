//! Command dispatch and handler modules.

mod analyze;

use miette::Result;

use crate::cli::Cli;

/// Route a parsed CLI invocation to its handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    analyze::exec(cli)
}
