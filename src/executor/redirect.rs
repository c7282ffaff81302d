use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

use nix::fcntl::{fcntl, FcntlArg};
use nix::unistd::{close, dup2};
use tracing::{debug, warn};

use crate::executor::ExecError;
use crate::parser::RedirectMode;

/// Open a redirection target, creating it with mode 0644 if needed.
pub fn open_target(path: &Path, mode: RedirectMode) -> Result<File, ExecError> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).mode(0o644);
    match mode {
        RedirectMode::Truncate => opts.truncate(true),
        RedirectMode::Append => opts.append(true),
    };
    opts.open(path).map_err(|source| ExecError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}

/// Points a standard descriptor at a file until dropped.
///
/// The original descriptor is parked on a close-on-exec duplicate so children
/// never inherit it, and is put back on every exit path.
pub struct RedirectGuard {
    target_fd: RawFd,
    saved_fd: RawFd,
}

impl RedirectGuard {
    pub fn acquire(target_fd: RawFd, file: &File) -> Result<Self, ExecError> {
        flush_stream(target_fd);
        let saved_fd = fcntl(target_fd, FcntlArg::F_DUPFD_CLOEXEC(0))?;
        if let Err(e) = dup2(file.as_raw_fd(), target_fd) {
            let _ = close(saved_fd);
            return Err(e.into());
        }
        debug!(fd = target_fd, saved = saved_fd, "descriptor redirected");
        Ok(RedirectGuard { target_fd, saved_fd })
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        flush_stream(self.target_fd);
        if let Err(e) = dup2(self.saved_fd, self.target_fd) {
            warn!(fd = self.target_fd, error = %e, "failed to restore descriptor");
        }
        let _ = close(self.saved_fd);
        debug!(fd = self.target_fd, "descriptor restored");
    }
}

fn flush_stream(fd: RawFd) {
    let _ = match fd {
        libc::STDOUT_FILENO => io::stdout().flush(),
        libc::STDERR_FILENO => io::stderr().flush(),
        _ => Ok(()),
    };
}
