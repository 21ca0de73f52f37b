//! Command line argument parsing and validation.
//!
//! Both executables parse with clap derive. Tool locations accept environment
//! overrides so the tools can be swapped without touching the command line.

use crate::tools;
use crate::xcode::Configuration;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Build DarwinSniffer via xcodebuild.
#[derive(Parser, Debug)]
#[command(
    name = "darwinsniffer-build",
    version,
    about = "Build DarwinSniffer via xcodebuild.",
    long_about = "Runs a clean build of the DarwinSniffer Xcode project.

Usage:
  darwinsniffer-build
  darwinsniffer-build --debug
  darwinsniffer-build --release --output ./Build

Exit code mirrors xcodebuild's exit code (1 if it reports none)."
)]
pub struct BuildArgs {
    /// Build using Release configuration (default).
    #[arg(long, conflicts_with = "debug")]
    pub release: bool,

    /// Build using Debug configuration.
    #[arg(long)]
    pub debug: bool,

    /// Override the build output directory (CONFIGURATION_BUILD_DIR).
    ///
    /// An empty value leaves the project's build directory in place.
    #[arg(long, value_name = "PATH")]
    pub output: Option<OsString>,

    /// xcodebuild executable to run.
    #[arg(
        long,
        value_name = "PATH",
        env = "DARWINSNIFFER_XCODEBUILD",
        default_value = tools::XCODEBUILD,
        hide = true
    )]
    pub xcodebuild: PathBuf,
}

impl BuildArgs {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Configuration selected by the flags.
    pub fn configuration(&self) -> Configuration {
        Configuration::from_flags(self.debug)
    }

    /// Output directory override, if one was given.
    ///
    /// Empty paths pass through here and are dropped by
    /// [`XcodeBuild::output_dir`](crate::xcode::XcodeBuild::output_dir).
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output.clone().map(PathBuf::from)
    }
}

/// Build the DarwinSniffer macOS installer package.
#[derive(Parser, Debug)]
#[command(
    name = "darwinsniffer-package",
    version,
    about = "Build the DarwinSniffer macOS installer package.",
    long_about = "Packages ./Build/DarwinSniffer as /usr/local/bin/sniffme into DarwinSniffer.pkg.

Run from the project directory after darwinsniffer-build --output ./Build.

Exit code 0 = DarwinSniffer.pkg exists in the current directory."
)]
pub struct PackageArgs {
    /// pkgbuild executable to run.
    #[arg(
        long,
        value_name = "PATH",
        env = "DARWINSNIFFER_PKGBUILD",
        default_value = tools::PKGBUILD,
        hide = true
    )]
    pub pkgbuild: PathBuf,

    /// productbuild executable to run.
    #[arg(
        long,
        value_name = "PATH",
        env = "DARWINSNIFFER_PRODUCTBUILD",
        default_value = tools::PRODUCTBUILD,
        hide = true
    )]
    pub productbuild: PathBuf,
}

impl PackageArgs {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            output: super::OutputManager::new(
                true,  // Always verbose
                false, // Never quiet
            ),
        }
    }
}

impl From<&BuildArgs> for RuntimeConfig {
    fn from(_args: &BuildArgs) -> Self {
        Self::default()
    }
}

impl From<&PackageArgs> for RuntimeConfig {
    fn from(_args: &PackageArgs) -> Self {
        Self::default()
    }
}

impl RuntimeConfig {
    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<BuildArgs, clap::Error> {
        BuildArgs::try_parse_from(std::iter::once("darwinsniffer-build").chain(args.iter().copied()))
    }

    #[test]
    fn no_flags_builds_release() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.configuration(), Configuration::Release);
        assert_eq!(args.output_dir(), None);
    }

    #[test]
    fn release_flag_builds_release() {
        assert_eq!(parse(&["--release"]).unwrap().configuration(), Configuration::Release);
    }

    #[test]
    fn debug_flag_builds_debug() {
        assert_eq!(parse(&["--debug"]).unwrap().configuration(), Configuration::Debug);
    }

    #[test]
    fn release_and_debug_conflict() {
        let err = parse(&["--release", "--debug"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn output_is_captured() {
        let args = parse(&["--debug", "--output", "./Build"]).unwrap();
        assert_eq!(args.output_dir(), Some(PathBuf::from("./Build")));
    }

    #[test]
    fn empty_output_means_no_override() {
        let args = parse(&["--output", ""]).unwrap();
        assert_eq!(args.output_dir(), Some(PathBuf::new()));

        let build = crate::xcode::XcodeBuild::new(args.configuration()).output_dir(args.output_dir());
        let argv = build.args();
        assert_eq!(argv.len(), 8);
        assert!(
            !argv
                .iter()
                .any(|arg| arg.to_string_lossy().starts_with("CONFIGURATION_BUILD_DIR="))
        );
    }

    #[test]
    fn xcodebuild_flag_overrides_tool() {
        let args = parse(&["--xcodebuild", "/opt/xcode/xcodebuild"]).unwrap();
        assert_eq!(args.xcodebuild, PathBuf::from("/opt/xcode/xcodebuild"));
    }

    #[test]
    fn package_args_take_no_required_flags() {
        let args = PackageArgs::try_parse_from(["darwinsniffer-package", "--pkgbuild", "/tmp/pkgbuild"])
            .unwrap();
        assert_eq!(args.pkgbuild, PathBuf::from("/tmp/pkgbuild"));
    }

    #[test]
    fn clap_definitions_are_consistent() {
        use clap::CommandFactory;
        BuildArgs::command().debug_assert();
        PackageArgs::command().debug_assert();
    }
}
