//! Packaging tool execution.

use super::error::{Error, Result};
use std::ffi::OsString;
use std::path::Path;

/// Runs a packaging tool to completion, capturing its output.
///
/// Stdout is forwarded to the debug log. A non-zero exit becomes
/// [`Error::ToolFailed`] carrying the tool's stderr.
pub async fn run_tool(name: &str, program: &Path, args: &[OsString]) -> Result<()> {
    log::debug!("Running {}: {} {}", name, program.display(), render_args(args));

    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: name.to_string(),
            error,
        })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        log::debug!("[{}] {}", name, line);
    }

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: name.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Space-joined rendering of an argument list for logs.
pub fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
