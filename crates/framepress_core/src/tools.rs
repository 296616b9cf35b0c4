//! External tool invocation.
//!
//! Every external call in the pipeline (ffprobe, ffmpeg) goes through
//! [`run_tool`], which captures stdout/stderr and turns a non-zero exit
//! status into a [`ToolError`] carrying the tail of stderr.

use std::ffi::OsStr;
use std::io;
use std::process::{Command, Output};

use thiserror::Error;

/// Number of stderr lines kept in a [`ToolError::Failed`] message.
const STDERR_TAIL_LINES: usize = 20;

/// Error from running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The process could not be started at all (missing binary, permissions).
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    Failed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },
}

impl ToolError {
    /// The tool name this error came from.
    pub fn tool(&self) -> &str {
        match self {
            ToolError::Spawn { tool, .. } => tool,
            ToolError::Failed { tool, .. } => tool,
        }
    }
}

/// Run an external tool to completion, capturing its output.
///
/// Blocks until the process exits. Returns the raw [`Output`] on a zero
/// exit status; any other exit status is an error.
pub fn run_tool<I, S>(program: &str, args: I) -> Result<Output, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);

    tracing::debug!("running {:?}", cmd);

    let output = cmd.output().map_err(|source| ToolError::Spawn {
        tool: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::Failed {
            tool: program.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: stderr_tail(&stderr),
        });
    }

    Ok(output)
}

/// Keep only the last [`STDERR_TAIL_LINES`] lines of tool output.
///
/// ffmpeg prints a banner and per-stream configuration before the actual
/// error, so the tail is what matters for diagnosis.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
