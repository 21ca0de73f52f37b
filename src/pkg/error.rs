//! Error type and helpers for installer packaging.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result type for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while staging and building an installer package.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Free-form failure with a message.
    #[error("{0}")]
    GenericError(String),

    /// Filesystem failure with the operation and path that triggered it.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        error: io::Error,
    },

    /// A file structure source does not exist.
    #[error("source {} does not exist", .0.display())]
    MissingSource(PathBuf),

    /// Package settings violate an invariant.
    #[error("invalid package settings: {0}")]
    InvalidSettings(String),

    /// Distribution template rendering failed.
    #[error("failed to render distribution template: {0}")]
    Template(#[from] handlebars::RenderError),

    /// A packaging tool could not be located.
    #[error("{tool} not found: {source}")]
    ToolNotFound {
        /// Tool name or configured path.
        tool: String,
        /// Lookup failure.
        #[source]
        source: which::Error,
    },

    /// A packaging tool could not be spawned.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Tool that was spawned.
        command: String,
        /// Spawn failure.
        error: io::Error,
    },

    /// A packaging tool ran and exited unsuccessfully.
    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Directory traversal failure while copying payload trees.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix mismatch while mirroring a directory.
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),
}

/// Attaches a context message to an `Option` or `Result`.
pub trait Context<T> {
    /// Converts to a [`Result`], using `msg` as the error message.
    fn context<C>(self, msg: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Like [`Context::context`], building the message lazily.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, msg: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, msg: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Adds path context to raw I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::pkg::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::pkg::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
