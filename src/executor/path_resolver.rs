use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

use crate::environment::Environment;

/// Locates executables, either by literal path or through a search path.
pub struct PathResolver<'a> {
    search_path: Option<&'a str>,
    cwd: &'a Path,
}

impl<'a> PathResolver<'a> {
    pub fn new(search_path: Option<&'a str>, cwd: &'a Path) -> Self {
        PathResolver { search_path, cwd }
    }

    pub fn from_env(env: &'a Environment) -> Self {
        Self::new(env.get("PATH"), env.cwd())
    }

    /// Returns the path a command would run from, or `None` if nothing matches.
    ///
    /// A name containing `/` is checked as-is (relative to the session cwd) and
    /// returned verbatim; bare names are looked up in each search directory in order.
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.contains('/') {
            return is_executable(&self.cwd.join(command)).then(|| PathBuf::from(command));
        }

        let paths = self.search_path?;
        // An empty entry names no directory; it never means the cwd.
        env::split_paths(paths)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| self.cwd.join(dir).join(command))
            .find(|candidate| is_executable(candidate))
    }
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
        && access(path, AccessFlags::X_OK).is_ok()
}
