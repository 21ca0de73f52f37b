//! Error types for the build driver and packager executables.
//!
//! Library-level packaging failures live in [`crate::pkg::Error`]; this module wraps
//! them together with CLI and subprocess failures and decides the process exit code.

use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for the release tooling
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Installer packaging errors
    #[error("Packaging error: {0}")]
    Pkg(#[from] crate::pkg::Error),

    /// External tool could not be located
    #[error("{tool} not found: {source}")]
    ToolNotFound {
        /// Tool name or path as configured
        tool: String,
        /// Lookup failure
        #[source]
        source: which::Error,
    },

    /// External tool ran and reported failure
    #[error("Command '{command}' {detail}", detail = describe_status(.status))]
    ToolFailed {
        /// Rendered command line
        command: String,
        /// Exit status reported by the tool
        status: ExitStatus,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Process exit code to surface for this error.
    ///
    /// A failed tool propagates its own exit code; anything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { status, .. } => failure_exit_code(status.code()),
            _ => 1,
        }
    }
}

/// Exit code for a tool that reported failure.
///
/// Returns the tool's code when it is nonzero, otherwise 1 (terminated by a
/// signal, or a zero code that still counted as failure).
pub fn failure_exit_code(code: Option<i32>) -> i32 {
    match code {
        Some(code) if code != 0 => code,
        _ => 1,
    }
}

fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("returned non-zero exit status {code}."),
        None => {
            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                if let Some(signal) = status.signal() {
                    return format!("died with signal {signal}.");
                }
            }
            "terminated without an exit status.".to_string()
        }
    }
}
