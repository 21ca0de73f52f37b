//! File system utilities for staging package contents.
//!
//! Provides idempotent directory handling, permission-preserving copies and
//! symlink-aware directory mirroring.

use crate::pkg::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err::<(), _>(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err::<(), _>(e).fs_context("removing file", path),
    }
}

/// Makes a symbolic link.
#[cfg(unix)]
fn symlink(target: &Path, link: &Path, _is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Makes a symbolic link.
#[cfg(windows)]
fn symlink(target: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Permission bits travel with the copy. Fails if the source path is a
/// directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::MissingSource(from.to_path_buf()));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::MissingSource(from.to_path_buf()));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                symlink(&target, &dest_path, entry.path().is_dir())
                    .fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {e}")))?
}

/// Sets `rwxr-xr-x` on a file.
#[cfg(unix)]
pub async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .fs_context("setting permissions on", path)
}

/// No-op where there is no executable bit.
#[cfg(not(unix))]
pub async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
