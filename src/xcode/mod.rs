//! Xcode project builds.
//!
//! Wraps a `xcodebuild ... clean build` invocation of the DarwinSniffer project.
//! The child inherits the console so Xcode's own output streams through.

mod configuration;

pub use configuration::Configuration;

use crate::error::{CliError, ReleaseError, Result};
use crate::tools;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Xcode project built by default.
pub const PROJECT: &str = "DarwinSniffer.xcodeproj";

/// Scheme built by default.
pub const SCHEME: &str = "DarwinSniffer";

/// Build setting that redirects products to another directory.
pub const BUILD_DIR_SETTING: &str = "CONFIGURATION_BUILD_DIR";

/// One `xcodebuild` invocation.
///
/// # Examples
///
/// ```no_run
/// use darwinsniffer_release::xcode::{Configuration, XcodeBuild};
///
/// # async fn example() -> darwinsniffer_release::Result<()> {
/// XcodeBuild::new(Configuration::Debug)
///     .output_dir(Some("./Build".into()))
///     .run()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct XcodeBuild {
    program: PathBuf,
    project: String,
    scheme: String,
    configuration: Configuration,
    output_dir: Option<PathBuf>,
}

impl XcodeBuild {
    /// Clean build of the DarwinSniffer scheme in `configuration`.
    pub fn new(configuration: Configuration) -> Self {
        Self {
            program: PathBuf::from(tools::XCODEBUILD),
            project: PROJECT.to_string(),
            scheme: SCHEME.to_string(),
            configuration,
            output_dir: None,
        }
    }

    /// Overrides the `xcodebuild` executable (name on `PATH` or explicit path).
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Redirects build products to `dir`.
    ///
    /// `None` or an empty path leaves Xcode's default location alone.
    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir.filter(|d| !d.as_os_str().is_empty());
        self
    }

    /// Configuration passed to `-configuration`.
    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    /// Arguments passed to `xcodebuild`, program excluded.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-project".into(),
            (&self.project).into(),
            "-scheme".into(),
            (&self.scheme).into(),
            "-configuration".into(),
            self.configuration.as_str().into(),
            "clean".into(),
            "build".into(),
        ];

        if let Some(dir) = &self.output_dir {
            let mut setting = OsString::from(format!("{BUILD_DIR_SETTING}="));
            setting.push(dir);
            args.push(setting);
        }

        args
    }

    /// Printable command line for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args().iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    /// Runs the build and waits for it to finish.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::ToolNotFound`] when `xcodebuild` cannot be located
    /// - [`CliError::ExecutionFailed`] when it cannot be spawned
    /// - [`ReleaseError::ToolFailed`] when it exits unsuccessfully; its exit
    ///   code is available through [`ReleaseError::exit_code`]
    pub async fn run(&self) -> Result<()> {
        let program = locate(&self.program)?;
        log::debug!("Running: {}", self.command_line());

        let status = tokio::process::Command::new(&program)
            .args(self.args())
            .status()
            .await
            .map_err(|e| CliError::ExecutionFailed {
                command: self.command_line(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            log::debug!("xcodebuild exited with {}", status);
            return Err(ReleaseError::ToolFailed {
                command: self.command_line(),
                status,
            });
        }

        Ok(())
    }
}

fn locate(program: &Path) -> Result<PathBuf> {
    tools::locate(program).map_err(|source| ReleaseError::ToolNotFound {
        tool: program.display().to_string(),
        source,
    })
}
