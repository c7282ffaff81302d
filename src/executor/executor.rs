use std::path::PathBuf;
use std::{fmt, io};

use crate::environment::Environment;
use crate::parser::ParsedCommand;

/// What the read loop should do after a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    Code(i32),
    Exit,
}

pub type ExecStatus = Result<ExecOutcome, ExecError>;

#[derive(Debug)]
pub enum ExecError {
    Io(io::Error),
    Redirect { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Io(e) => write!(f, "IO error: {}", e),
            ExecError::Redirect { path, source } => {
                write!(f, "{}: {}", path.display(), describe_io_error(source))
            }
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Io(e) => Some(e),
            ExecError::Redirect { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

impl From<nix::Error> for ExecError {
    fn from(e: nix::Error) -> Self {
        ExecError::Io(io::Error::from(e))
    }
}

/// Short shell-style wording for the filesystem errors users actually hit.
pub fn describe_io_error(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        io::ErrorKind::NotADirectory => "Not a directory".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::IsADirectory => "Is a directory".to_string(),
        _ => e.to_string(),
    }
}

pub trait Executor {
    fn exec(&mut self, cmd: &ParsedCommand, env: &mut Environment) -> ExecStatus;
}
