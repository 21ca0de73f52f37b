//! Component package creation with `pkgbuild`.

use super::{
    error::Result,
    exec::run_tool,
    settings::PkgSettings,
};
use crate::utils::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Builds the `pkgbuild` argument list.
///
/// Produces `--root <root> --identifier <id> --version <ver> --install-location <loc>`,
/// then `--scripts <dir>` and `--sign <identity>` when present, and the output path last.
pub fn args(
    settings: &PkgSettings,
    root: &Path,
    scripts: Option<&Path>,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--root".into(),
        root.into(),
        "--identifier".into(),
        settings.identifier().into(),
        "--version".into(),
        settings.version().into(),
        "--install-location".into(),
        settings.install_location().into(),
    ];

    if let Some(scripts) = scripts {
        args.push("--scripts".into());
        args.push(scripts.into());
    }

    if let Some(identity) = settings.signing_identity() {
        args.push("--sign".into());
        args.push(identity.into());
    }

    args.push(output.into());
    args
}

/// Copies the configured install scripts into `scripts_dir`.
///
/// Scripts are renamed to the names Installer looks for (`preinstall`,
/// `postinstall`) and marked executable. Returns `None` when no script is set.
pub async fn stage_scripts(settings: &PkgSettings, scripts_dir: &Path) -> Result<Option<PathBuf>> {
    if !settings.has_scripts() {
        return Ok(None);
    }

    fs::create_dir_all(scripts_dir, true).await?;

    let scripts = [
        ("preinstall", settings.preinstall_script()),
        ("postinstall", settings.postinstall_script()),
    ];
    for (name, source) in scripts {
        if let Some(source) = source {
            let target = scripts_dir.join(name);
            fs::copy_file(source, &target).await?;
            fs::make_executable(&target).await?;
            log::debug!("Staged {} script from {}", name, source.display());
        }
    }

    Ok(Some(scripts_dir.to_path_buf()))
}

/// Runs `pkgbuild` to produce a component package at `output`.
pub async fn run(
    program: &Path,
    settings: &PkgSettings,
    root: &Path,
    scripts: Option<&Path>,
    output: &Path,
) -> Result<()> {
    log::info!("Running pkgbuild for {}...", settings.identifier());
    run_tool("pkgbuild", program, &args(settings, root, scripts, output)).await?;
    log::info!("✓ Built component package: {}", output.display());
    Ok(())
}
