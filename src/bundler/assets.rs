//! Asset discovery for SEA embedding.
//!
//! The SEA config's `assets` table maps an asset key to the file the runtime
//! embeds. Keys are the file paths themselves, so a program reads an embedded
//! asset with `sea.getAsset("assets/img/logo.png")` using the same path it
//! would use on disk.

use crate::bundler::{
    Error, Result,
    utils::path::{normalize, to_native_string},
};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Flat mapping from asset key to source file, where key and value are the
/// same project-relative path.
///
/// Only regular files appear; directories never do. Entries are kept sorted
/// so the written config is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetMap(BTreeMap<String, String>);

impl AssetMap {
    /// Returns the number of mapped files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no files are mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up the source path for an asset key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates asset keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert(&mut self, path: String) {
        self.0.insert(path.clone(), path);
    }
}

/// Maps every regular file under `root`, recursively.
///
/// Keys are the walked paths as given, so a relative `root` produces keys
/// relative to the current directory.
///
/// See [`map_assets_in`] for the failure policy.
pub fn map_assets(root: &Path) -> Result<AssetMap> {
    map_assets_in(Path::new(""), root)
}

/// Maps every regular file under `base/root`, with keys relative to `base`.
///
/// A `root` that does not exist, cannot be inspected, or is not a directory
/// yields an empty map and a warning, never an error. Failures while walking
/// an existing root (an entry vanishing, an unreadable subdirectory) abort
/// the mapping.
///
/// Symbolic links are followed. A link that loops back to one of its
/// ancestors or points nowhere is skipped with a warning.
pub fn map_assets_in(base: &Path, root: &Path) -> Result<AssetMap> {
    let root = normalize(root);
    let scan_root = base.join(&root);

    match std::fs::metadata(&scan_root) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            log::warn!(
                "Assets path {} is not a directory, skip bundling assets",
                root.display()
            );
            return Ok(AssetMap::default());
        }
        Err(e) => {
            log::warn!(
                "Cannot find assets directory {} ({}), skip bundling assets",
                root.display(),
                e
            );
            return Ok(AssetMap::default());
        }
    }

    let mut assets = AssetMap::default();

    for entry in WalkDir::new(&scan_root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.loop_ancestor().is_some() => {
                log::warn!("Skipping symlink loop at {}", error_path(&e).display());
                continue;
            }
            Err(e) if is_dangling_symlink(&e) => {
                log::warn!("Skipping dangling symlink {}", error_path(&e).display());
                continue;
            }
            Err(e) => return Err(Error::WalkDirError(e)),
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let key = asset_key(base, entry.path())?;
        log::debug!("Mapped asset {}", key);
        assets.insert(key);
    }

    log::info!("Mapped {} asset(s) under {}", assets.len(), root.display());

    Ok(assets)
}

fn asset_key(base: &Path, path: &Path) -> Result<String> {
    let relative: PathBuf = path
        .strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf());
    to_native_string(&relative)
}

fn error_path(error: &walkdir::Error) -> &Path {
    error.path().unwrap_or_else(|| Path::new("?"))
}

fn is_dangling_symlink(error: &walkdir::Error) -> bool {
    let not_found = error
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);

    not_found
        && error.path().is_some_and(|p| {
            std::fs::symlink_metadata(p).is_ok_and(|m| m.file_type().is_symlink())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"data").unwrap();
    }

    #[test]
    fn maps_flat_directory() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/a.txt"));
        touch(&tmp.path().join("assets/b.png"));

        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets.get("assets/a.txt"), Some("assets/a.txt"));
        assert_eq!(assets.get("assets/b.png"), Some("assets/b.png"));
    }

    #[test]
    fn nested_directories_flatten_to_files_only() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/top.txt"));
        touch(&tmp.path().join("assets/img/logo.png"));
        touch(&tmp.path().join("assets/img/icons/x.svg"));
        touch(&tmp.path().join("assets/fonts/deep/er/font.ttf"));
        fs::create_dir_all(tmp.path().join("assets/empty")).unwrap();

        let assets = map_assets_in(tmp.path(), Path::new("./assets")).unwrap();

        let keys: Vec<_> = assets.keys().collect();
        assert_eq!(
            keys,
            vec![
                "assets/fonts/deep/er/font.ttf",
                "assets/img/icons/x.svg",
                "assets/img/logo.png",
                "assets/top.txt",
            ]
        );
        for key in assets.keys() {
            assert_eq!(assets.get(key), Some(key));
        }
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn file_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets"));
        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn absolute_root_keeps_walked_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("res/one.bin");
        touch(&file);

        let assets = map_assets(&tmp.path().join("res")).unwrap();

        let key = file.to_str().unwrap();
        assert_eq!(assets.get(key), Some(key));
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn serializes_as_flat_object() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/sub/a.txt"));
        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();

        let json = serde_json::to_value(&assets).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "assets/sub/a.txt": "assets/sub/a.txt" })
        );
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_files_and_directories() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("shared/dir/inner.txt"));
        touch(&tmp.path().join("shared/file.txt"));
        fs::create_dir_all(tmp.path().join("assets")).unwrap();
        symlink(tmp.path().join("shared/dir"), tmp.path().join("assets/linked")).unwrap();
        symlink(
            tmp.path().join("shared/file.txt"),
            tmp.path().join("assets/file.txt"),
        )
        .unwrap();

        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();

        assert_eq!(assets.len(), 2);
        assert!(assets.get("assets/linked/inner.txt").is_some());
        assert!(assets.get("assets/file.txt").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn skips_symlink_loops() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/a.txt"));
        symlink(tmp.path().join("assets"), tmp.path().join("assets/loop")).unwrap();

        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();

        assert_eq!(assets.keys().collect::<Vec<_>>(), vec!["assets/a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn skips_dangling_symlinks() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/a.txt"));
        symlink(tmp.path().join("nowhere"), tmp.path().join("assets/broken")).unwrap();

        let assets = map_assets_in(tmp.path(), Path::new("assets")).unwrap();

        assert_eq!(assets.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_fails_mapping() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/a.txt"));
        let locked = tmp.path().join("assets/locked");
        touch(&locked.join("secret.txt"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = map_assets_in(tmp.path(), Path::new("assets"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(Error::WalkDirError(e)) => {
                assert_eq!(e.path(), Some(locked.as_path()));
                assert_eq!(
                    e.io_error().map(io::Error::kind),
                    Some(io::ErrorKind::PermissionDenied)
                );
            }
            other => panic!("expected walk error, got {other:?}"),
        }
    }

    #[test]
    fn walk_errors_other_than_links_propagate() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("assets/a.txt"));

        // A vanished path that is not a symlink
        let walk_error = WalkDir::new(tmp.path().join("assets/gone"))
            .into_iter()
            .find_map(std::result::Result::err)
            .unwrap();
        assert!(walk_error.loop_ancestor().is_none());
        assert!(!is_dangling_symlink(&walk_error));
    }
}
