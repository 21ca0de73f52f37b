//! Payload root staging.
//!
//! `pkgbuild --root` packages a directory that mirrors the target filesystem.
//! Each file structure entry is copied to `root/<destination>` with the leading
//! `/` stripped.

use super::error::Result;
use crate::utils::fs;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Path of `destination` inside a payload root.
pub fn payload_path(root: &Path, destination: &Path) -> PathBuf {
    let relative: PathBuf = destination
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    root.join(relative)
}

/// Copies every source into its destination under `root`.
///
/// Files keep their permission bits; directories are mirrored recursively.
/// Returns the staged paths in file structure order.
///
/// # Errors
///
/// Fails with [`super::Error::MissingSource`] if any source is absent.
pub async fn stage(file_structure: &BTreeMap<PathBuf, PathBuf>, root: &Path) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(file_structure.len());

    for (source, destination) in file_structure {
        let target = payload_path(root, destination);
        log::debug!("Staging {} -> {}", source.display(), target.display());

        if source.is_dir() {
            fs::copy_dir(source, &target).await?;
        } else {
            fs::copy_file(source, &target).await?;
        }
        staged.push(target);
    }

    log::info!("Staged {} payload item(s) in {}", staged.len(), root.display());
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::Error;

    #[test]
    fn payload_path_strips_root() {
        assert_eq!(
            payload_path(Path::new("/tmp/root"), Path::new("/usr/local/bin/sniffme")),
            PathBuf::from("/tmp/root/usr/local/bin/sniffme")
        );
    }

    #[tokio::test]
    async fn stages_binary_at_install_path() {
        let tmp = tempfile::tempdir().unwrap();
        let build = tmp.path().join("Build");
        std::fs::create_dir_all(&build).unwrap();
        std::fs::write(build.join("DarwinSniffer"), b"\xcf\xfa\xed\xfe").unwrap();

        let root = tmp.path().join("root");
        let mut map = BTreeMap::new();
        map.insert(build.join("DarwinSniffer"), PathBuf::from("/usr/local/bin/sniffme"));

        let staged = stage(&map, &root).await.unwrap();
        assert_eq!(staged, vec![root.join("usr/local/bin/sniffme")]);
        assert_eq!(std::fs::read(&staged[0]).unwrap(), b"\xcf\xfa\xed\xfe");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn staged_binary_keeps_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("tool");
        std::fs::write(&bin, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let root = tmp.path().join("root");
        let mut map = BTreeMap::new();
        map.insert(bin, PathBuf::from("/usr/local/bin/tool"));

        let staged = stage(&map, &root).await.unwrap();
        let mode = std::fs::metadata(&staged[0]).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[tokio::test]
    async fn directory_sources_are_mirrored() {
        let tmp = tempfile::tempdir().unwrap();
        let share = tmp.path().join("share");
        std::fs::create_dir_all(share.join("templates")).unwrap();
        std::fs::write(share.join("templates/report.json"), "{}").unwrap();

        let root = tmp.path().join("root");
        let mut map = BTreeMap::new();
        map.insert(share, PathBuf::from("/usr/local/share/sniffme"));

        stage(&map, &root).await.unwrap();
        assert!(root.join("usr/local/share/sniffme/templates/report.json").is_file());
    }

    #[tokio::test]
    async fn missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut map = BTreeMap::new();
        map.insert(
            tmp.path().join("Build/DarwinSniffer"),
            PathBuf::from("/usr/local/bin/sniffme"),
        );

        let err = stage(&map, &tmp.path().join("root")).await.unwrap_err();
        assert!(matches!(err, Error::MissingSource(ref p) if p.ends_with("Build/DarwinSniffer")));
    }
}
