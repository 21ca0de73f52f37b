//! Command line interface for the build driver and packager.
//!
//! Each executable parses its arguments, runs one operation and turns the
//! outcome into a process exit code.

mod args;
mod output;

pub use args::{BuildArgs, PackageArgs, RuntimeConfig};
pub use output::OutputManager;

use crate::error::Result;
use crate::pkg::{Packager, PkgSettings, PkgTools};
use crate::xcode::XcodeBuild;

/// Build driver entry point
pub async fn run_build() -> Result<i32> {
    let args = BuildArgs::parse_args();
    execute_build(&args).await
}

/// Runs `xcodebuild` for parsed arguments and returns the exit code to use.
///
/// Tool failures are reported here rather than returned, so their exit code
/// can be propagated.
pub async fn execute_build(args: &BuildArgs) -> Result<i32> {
    let runtime_config = RuntimeConfig::from(args);
    let configuration = args.configuration();

    let build = XcodeBuild::new(configuration)
        .program(&args.xcodebuild)
        .output_dir(args.output_dir());

    runtime_config.progress(&format!("Building DarwinSniffer ({configuration})"))?;
    runtime_config.verbose_println(&build.command_line())?;

    match build.run().await {
        Ok(()) => {
            runtime_config.success(&format!(
                "Build completed successfully ({configuration})."
            ))?;
            Ok(0)
        }
        Err(e) => {
            log::debug!("xcodebuild failure: {:?}", e);
            runtime_config.error(&format!(
                "Build failed ({configuration}) with error: {e}"
            ))?;
            Ok(e.exit_code())
        }
    }
}

/// Packager entry point
pub async fn run_package() -> Result<i32> {
    let args = PackageArgs::parse_args();
    execute_package(&args).await
}

/// Builds the DarwinSniffer installer package.
///
/// Any packaging failure is returned as an error; the caller exits nonzero.
pub async fn execute_package(args: &PackageArgs) -> Result<i32> {
    let runtime_config = RuntimeConfig::from(args);
    let settings = PkgSettings::darwinsniffer()?;

    runtime_config.progress(&format!(
        "Packaging {} ({})",
        settings.output().display(),
        settings.identifier()
    ))?;
    for (source, destination) in settings.file_structure() {
        runtime_config.indent(&format!(
            "{} -> {}",
            source.display(),
            destination.display()
        ))?;
    }

    let tools = PkgTools {
        pkgbuild: args.pkgbuild.clone(),
        productbuild: args.productbuild.clone(),
    };
    let package = Packager::new(settings, tools).build().await?;

    runtime_config.success(&format!(
        "Created {} ({} bytes)",
        package.path.display(),
        package.size
    ))?;
    runtime_config.indent(&format!("SHA256: {}", package.checksum))?;

    Ok(0)
}
