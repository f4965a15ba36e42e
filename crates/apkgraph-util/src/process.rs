use std::process::{Command, Output};

use crate::errors::ApkGraphError;

/// Builder for constructing and executing external processes.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Execute the command and return its output.
    pub fn exec(&self) -> Result<Output, ApkGraphError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        tracing::debug!(program = %self.program, args = ?self.args, "spawning process");
        cmd.output().map_err(ApkGraphError::from)
    }

    /// Execute the command, turning a non-zero exit status into an error
    /// carrying the child's stderr.
    pub fn exec_checked(&self) -> Result<Output, ApkGraphError> {
        let output = self.exec()?;
        if output.status.success() {
            return Ok(output);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ApkGraphError::Generic {
            message: format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ),
        })
    }
}

/// Whether `program` can be spawned from `PATH`.
pub fn is_available(program: &str) -> bool {
    Command::new(program)
        .arg("-V")
        .output()
        .is_ok()
}
