//! Stub toolchain for pipeline tests.
//!
//! Every stub is a shell script that appends its command line to
//! `calls.log` in its working directory, which is the project root for
//! every pipeline stage.

#![allow(dead_code)]

use kodegen_bundler_sea::bundler::{NCC_CLI_PATH, SEA_SENTINEL_FUSE, ToolCommand, Toolchain};
use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

pub const CALLS_LOG: &str = "calls.log";

pub struct StubProject {
    _dir: TempDir,
    root: PathBuf,
    tools: PathBuf,
}

impl StubProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("project");
        let tools = dir.path().join("tools");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&tools).unwrap();
        Self {
            _dir: dir,
            root,
            tools,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn write_manifest(&self, json: &str) {
        self.write("package.json", json);
    }

    /// Runtime stub: answers `--version` and writes the blob named in the
    /// SEA config. Carries the sentinel fuse so its copy can be injected.
    pub fn node_with_version(&self, version: &str) -> PathBuf {
        script(
            &self.tools.join("node"),
            &format!(
                r#"# {SEA_SENTINEL_FUSE}
case "$1" in
  --version) echo "v{version}" ;;
  -e) echo "v{version}"; echo "$0" ;;
  --experimental-sea-config)
    echo "node $*" >> {CALLS_LOG}
    out=$(sed -n 's/.*"output":"\([^"]*\)".*/\1/p' "$2")
    printf 'blob' > "$out"
    ;;
esac
"#
            ),
        )
    }

    pub fn node(&self) -> PathBuf {
        self.node_with_version("20.11.1")
    }

    /// Version-manager style wrapper that execs `target`. Has no fuse.
    pub fn node_shim(&self, target: &Path) -> PathBuf {
        script(
            &self.tools.join("node-shim"),
            &format!("exec {} \"$@\"\n", target.display()),
        )
    }

    /// `npm run build` stub producing `dist/entry.js`.
    pub fn npm(&self, exit_code: i32) -> PathBuf {
        script(
            &self.tools.join("npm"),
            &format!(
                r#"echo "npm $*" >> {CALLS_LOG}
mkdir -p dist
echo "console.log('built')" > dist/entry.js
exit {exit_code}
"#
            ),
        )
    }

    /// ncc stub invoked as `build <entry> -o <dir>`.
    fn ncc_script(&self, path: &Path) -> PathBuf {
        script(
            path,
            &format!(
                r#"echo "ncc $*" >> {CALLS_LOG}
mkdir -p "$4"
cp "$2" "$4/index.js"
"#
            ),
        )
    }

    pub fn ncc(&self) -> PathBuf {
        self.ncc_script(&self.tools.join("ncc"))
    }

    /// Installs the ncc stub where tool detection looks for it.
    pub fn install_ncc(&self) -> PathBuf {
        let path = self.root.join(NCC_CLI_PATH);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        self.ncc_script(&path)
    }

    /// postject stub appending a marker to the target executable.
    pub fn injector(&self) -> PathBuf {
        script(
            &self.tools.join("postject"),
            &format!(
                r#"echo "inject $*" >> {CALLS_LOG}
printf 'injected' >> "$1"
"#
            ),
        )
    }

    pub fn toolchain(&self, npm_exit_code: i32) -> Toolchain {
        Toolchain {
            npm: ToolCommand::new(self.npm(npm_exit_code)),
            ncc: ToolCommand::new(self.ncc()),
            node: ToolCommand::new(self.node()),
            injector: ToolCommand::new(self.injector()),
            runtime_image: None,
        }
    }

    /// Recorded tool invocations, tool names without directories.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(self.root.join(CALLS_LOG)) {
            Ok(log) => log.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn script(path: &Path, body: &str) -> PathBuf {
    fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}
