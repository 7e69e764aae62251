//! Lexical path helpers.
//!
//! Paths handed to the runtime (SEA config `main`, `output` and asset keys)
//! must be relative to the project root and joined with the platform
//! separator, without `./` noise. These helpers normalize paths without
//! touching the file system.

use crate::bundler::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Normalizes a path lexically.
///
/// Drops `.` components, resolves `..` against preceding normal components
/// and collapses repeated separators. An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Renders a path as a UTF-8 string suitable for JSON output.
pub fn to_native_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_current_dir_prefix() {
        assert_eq!(normalize(Path::new("./build")), PathBuf::from("build"));
        assert_eq!(
            normalize(Path::new("./build/./index.js")),
            PathBuf::from("build/index.js")
        );
    }

    #[test]
    fn resolves_parent_components() {
        assert_eq!(normalize(Path::new("a/b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("a/../../c")), PathBuf::from("../c"));
        assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn empty_and_dot_become_dot() {
        assert_eq!(normalize(Path::new("")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn keeps_absolute_paths() {
        assert_eq!(
            normalize(Path::new("/srv//app/build/")),
            PathBuf::from("/srv/app/build")
        );
    }

    #[test]
    fn native_string_uses_separator() {
        let joined = Path::new("build").join("index.js");
        assert_eq!(to_native_string(&joined).unwrap(), "build/index.js");
    }
}
