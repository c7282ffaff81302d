use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

#[derive(Debug, Clone, PartialEq)]
struct Variable {
    value: String,
    exported: bool,
}

/// Per-session interpreter state.
///
/// The working directory lives here rather than in the process: `cd` updates
/// it, `pwd` reads it, and spawned children are started inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    vars: HashMap<String, Variable>,
    cwd: PathBuf,
    last_status: i32,
}

impl Environment {
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        // Import all OS environment variables when starting the process (default value)
        Self::with_vars(cwd, std::env::vars())
    }

    /// Build a session from an explicit directory and variable set, all exported.
    pub fn with_vars<I, K, V>(cwd: impl Into<PathBuf>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| {
                (
                    k.into(),
                    Variable {
                        value: v.into(),
                        exported: true,
                    },
                )
            })
            .collect();
        Environment {
            vars,
            cwd: cwd.into(),
            last_status: 0,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.value.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars
            .entry(key.to_string())
            .and_modify(|var| var.value = value.to_string())
            .or_insert(Variable {
                value: value.to_string(),
                exported: false,
            });
    }

    pub fn export(&mut self, key: &str) {
        if let Some(var) = self.vars.get_mut(key) {
            var.exported = true;
        }
    }

    pub fn exported_vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .filter(|(_, v)| v.exported)
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Anchor a relative path at the session directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.cwd.join(path)
    }

    /// Move the session into `path`; on error the directory is left as it was.
    pub fn change_dir(&mut self, path: &str) -> io::Result<()> {
        let candidate = self.resolve_path(path);
        let meta = fs::metadata(&candidate)?;
        if !meta.is_dir() {
            return Err(io::Error::from(io::ErrorKind::NotADirectory));
        }
        access(candidate.as_path(), AccessFlags::X_OK).map_err(io::Error::from)?;
        self.cwd = fs::canonicalize(&candidate)?;
        Ok(())
    }

    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: i32) {
        self.last_status = status;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
