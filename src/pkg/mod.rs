//! macOS installer package creation.
//!
//! Produces flat `.pkg` installers with the system `pkgbuild` tool and,
//! for distribution-style packages, wraps them with `productbuild`.
//!
//! # Overview
//!
//! The [`Packager`]:
//! 1. Stages the file structure into a temporary payload root
//! 2. Stages optional preinstall/postinstall scripts
//! 3. Runs `pkgbuild` (straight to the output, or to a component package)
//! 4. Runs `productbuild` with a generated `Distribution` file when requested
//! 5. Verifies the output and returns a [`BuiltPackage`] with its checksum
//!
//! # Example
//!
//! ```no_run
//! use darwinsniffer_release::pkg::{Packager, PkgSettings, PkgTools};
//!
//! # async fn example() -> darwinsniffer_release::pkg::Result<()> {
//! let packager = Packager::new(PkgSettings::darwinsniffer()?, PkgTools::default());
//! let package = packager.build().await?;
//! println!("Created {} ({} bytes)", package.path.display(), package.size);
//! println!("SHA256: {}", package.checksum);
//! # Ok(())
//! # }
//! ```

mod checksum;
pub mod distribution;
pub mod error;
mod exec;
pub mod payload;
pub mod pkgbuild;
mod settings;

pub use error::{Error, Result};
pub use settings::{DEFAULT_INSTALL_LOCATION, DEFAULT_VERSION, PkgSettings, PkgSettingsBuilder};

use crate::{tools, utils::fs};
use checksum::calculate_sha256;
use error::{Context, ErrorExt};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Locations of the packaging tools.
///
/// Bare names are searched on `PATH`.
#[derive(Clone, Debug)]
pub struct PkgTools {
    /// `pkgbuild` executable.
    pub pkgbuild: PathBuf,
    /// `productbuild` executable.
    pub productbuild: PathBuf,
}

impl Default for PkgTools {
    fn default() -> Self {
        Self {
            pkgbuild: PathBuf::from(tools::PKGBUILD),
            productbuild: PathBuf::from(tools::PRODUCTBUILD),
        }
    }
}

/// A package produced by [`Packager::build`].
#[derive(Clone, Debug)]
pub struct BuiltPackage {
    /// Absolute path of the package.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the package.
    pub checksum: String,
}

/// Installer package builder.
#[derive(Debug)]
pub struct Packager {
    settings: PkgSettings,
    tools: PkgTools,
}

impl Packager {
    /// Creates a packager for `settings` using `tools`.
    pub fn new(settings: PkgSettings, tools: PkgTools) -> Self {
        Self { settings, tools }
    }

    /// Builds the package.
    ///
    /// The tools write into a temporary directory that is removed when this
    /// returns. A previous file at the output path is only replaced once the
    /// new package exists, so a failed build leaves it untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingSource`] if a file structure source is absent
    /// - [`Error::ToolNotFound`] if a required tool cannot be located
    /// - [`Error::ToolFailed`] if `pkgbuild` or `productbuild` exits unsuccessfully
    /// - [`Error::GenericError`] if the tools report success but no package exists
    pub async fn build(&self) -> Result<BuiltPackage> {
        let settings = &self.settings;
        let output = settings.output();
        log::info!(
            "Creating installer package {} ({})",
            output.display(),
            settings.identifier()
        );

        let work_dir = tempfile::tempdir().fs_context("creating staging directory", std::env::temp_dir())?;
        let root = work_dir.path().join("root");
        fs::create_dir_all(&root, false).await?;
        payload::stage(settings.file_structure(), &root).await?;
        let scripts = pkgbuild::stage_scripts(settings, &work_dir.path().join("scripts")).await?;

        let pkgbuild_program = locate(&self.tools.pkgbuild)?;
        let productbuild_program = if settings.as_distribution() {
            Some(locate(&self.tools.productbuild)?)
        } else {
            None
        };

        let file_name = output
            .file_name()
            .with_context(|| format!("output path {} has no file name", output.display()))?;
        let products = work_dir.path().join("out");
        fs::create_dir_all(&products, false).await?;
        let staged = products.join(file_name);

        match productbuild_program {
            None => {
                pkgbuild::run(&pkgbuild_program, settings, &root, scripts.as_deref(), &staged)
                    .await?;
            }
            Some(productbuild_program) => {
                let packages = work_dir.path().join("packages");
                fs::create_dir_all(&packages, false).await?;
                let component = packages.join(format!("{}.pkg", settings.identifier()));

                pkgbuild::run(
                    &pkgbuild_program,
                    settings,
                    &root,
                    scripts.as_deref(),
                    &component,
                )
                .await?;
                distribution::run(
                    &productbuild_program,
                    settings,
                    &component,
                    work_dir.path(),
                    &staged,
                )
                .await?;
            }
        }

        verify_output(&staged, output).await?;
        install(&staged, output).await
    }
}

fn locate(tool: &Path) -> Result<PathBuf> {
    tools::locate(tool).map_err(|source| Error::ToolNotFound {
        tool: tool.display().to_string(),
        source,
    })
}

/// Confirms the tools left a package at `staged` on the way to `output`.
async fn verify_output(staged: &Path, output: &Path) -> Result<()> {
    match tokio::fs::metadata(staged).await {
        Ok(metadata) if metadata.is_file() => Ok(()),
        _ => crate::bail!(
            "Packaging tools reported success but {} was not created",
            output.display()
        ),
    }
}

/// Copies the staged package over `output` and measures it.
async fn install(staged: &Path, output: &Path) -> Result<BuiltPackage> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent, false).await?;
    }
    fs::copy_file(staged, output).await?;

    let metadata = tokio::fs::metadata(output)
        .await
        .fs_context("reading package metadata", output)?;
    let checksum = calculate_sha256(output).await?;
    let path = output
        .absolutize()
        .fs_context("resolving package path", output)?
        .into_owned();

    log::info!("✓ Created installer package: {}", path.display());

    Ok(BuiltPackage {
        path,
        size: metadata.len(),
        checksum,
    })
}
