use std::io::{self, Write};
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::Command;

use tracing::{debug, warn};

use crate::environment::Environment;
use crate::executor::builtin::Builtin;
use crate::executor::path_resolver::PathResolver;
use crate::executor::redirect::{open_target, RedirectGuard};
use crate::executor::{ExecError, ExecOutcome, ExecStatus, Executor};
use crate::parser::{ParsedCommand, Redirect};

/// Conventional shell statuses for lookup and spawn failures.
const STATUS_NOT_FOUND: i32 = 127;
const STATUS_CANNOT_EXECUTE: i32 = 126;

pub struct DefaultExecutor;

impl Executor for DefaultExecutor {
    fn exec(&mut self, cmd: &ParsedCommand, env: &mut Environment) -> ExecStatus {
        // Guards restore the original descriptors when they go out of scope,
        // whichever branch below returns.
        let _stdout_guard = self.redirect(cmd.stdout.as_ref(), libc::STDOUT_FILENO, env)?;
        let _stderr_guard = self.redirect(cmd.stderr.as_ref(), libc::STDERR_FILENO, env)?;

        let Some(name) = cmd.name() else {
            return Ok(ExecOutcome::Code(env.last_status()));
        };

        if let Some(builtin) = Builtin::lookup(name) {
            debug!(command = name, "running builtin");
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let outcome = builtin.run(cmd.args(), env, &mut out);
            out.flush()?;
            return outcome;
        }

        self.exec_external(name, cmd.args(), env)
    }
}

impl DefaultExecutor {
    fn redirect(
        &self,
        redirect: Option<&Redirect>,
        fd: libc::c_int,
        env: &Environment,
    ) -> Result<Option<RedirectGuard>, ExecError> {
        let Some(redirect) = redirect else {
            return Ok(None);
        };
        let path = env.resolve_path(&redirect.target);
        debug!(fd, path = %path.display(), mode = ?redirect.mode, "opening redirection target");
        let file = open_target(&path, redirect.mode)?;
        RedirectGuard::acquire(fd, &file).map(Some)
    }

    fn exec_external(&mut self, name: &str, args: &[String], env: &mut Environment) -> ExecStatus {
        let resolved = PathResolver::from_env(env).resolve(name);
        let Some(path) = resolved else {
            let mut out = io::stdout().lock();
            writeln!(out, "{}: command not found", name)?;
            out.flush()?;
            env.set_last_status(STATUS_NOT_FOUND);
            return Ok(ExecOutcome::Code(STATUS_NOT_FOUND));
        };
        debug!(command = name, path = %path.display(), "resolved external command");

        // Anything still buffered must reach the descriptor before the child writes.
        io::stdout().flush()?;

        let status = Command::new(env.resolve_path(&path))
            .arg0(name)
            .args(args)
            .current_dir(env.cwd())
            .env_clear()
            .envs(env.exported_vars())
            .status();

        let code = match status {
            Ok(status) => status
                .code()
                .or_else(|| status.signal().map(|sig| 128 + sig))
                .unwrap_or(1),
            Err(e) => {
                warn!(command = name, error = %e, "spawn failed");
                writeln!(io::stderr(), "{}: {}", name, e)?;
                STATUS_CANNOT_EXECUTE
            }
        };
        debug!(command = name, code, "external command finished");
        env.set_last_status(code);
        Ok(ExecOutcome::Code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::parse_tokens;
    use std::fs;

    // Descriptor-level redirection of the real stdout/stderr is exercised by
    // tests/repl.rs against the built binary.

    fn parsed(line: &str) -> ParsedCommand {
        parse_tokens(Lexer::tokenize(line)).unwrap()
    }

    fn session(dir: &tempfile::TempDir) -> Environment {
        let path = std::env::var("PATH").unwrap_or_default();
        Environment::with_vars(dir.path(), [("PATH", path)])
    }

    #[test]
    fn test_external_status_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = session(&dir);
        let mut exec = DefaultExecutor;

        let outcome = exec.exec(&parsed("sh -c 'exit 3'"), &mut env).unwrap();
        assert_eq!(outcome, ExecOutcome::Code(3));
        assert_eq!(env.last_status(), 3);

        exec.exec(&parsed("sh -c 'exit 0'"), &mut env).unwrap();
        assert_eq!(env.last_status(), 0);
    }

    #[test]
    fn test_external_runs_in_session_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let mut env = session(&dir);
        let mut exec = DefaultExecutor;

        exec.exec(&parsed("cd nested"), &mut env).unwrap();
        exec.exec(&parsed("sh -c 'pwd >cwd.txt'"), &mut env).unwrap();

        let nested = fs::canonicalize(dir.path().join("nested")).unwrap();
        let content = fs::read_to_string(nested.join("cwd.txt")).unwrap();
        assert_eq!(fs::canonicalize(content.trim()).unwrap(), nested);
    }

    #[test]
    fn test_children_see_exported_session_vars() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = session(&dir);
        env.set("MINISH_TEST_VAR", "visible");
        env.export("MINISH_TEST_VAR");
        env.set("MINISH_HIDDEN", "nope");
        let mut exec = DefaultExecutor;

        exec.exec(
            &parsed(r#"sh -c 'echo "$MINISH_TEST_VAR-$MINISH_HIDDEN" >vars.txt'"#),
            &mut env,
        )
        .unwrap();
        let content = fs::read_to_string(dir.path().join("vars.txt")).unwrap();
        assert_eq!(content, "visible-\n");
    }

    #[test]
    fn test_unknown_command_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = Environment::with_vars(dir.path(), [("PATH", "")]);
        let outcome = DefaultExecutor.exec(&parsed("nonexistent_cmd_xyz"), &mut env).unwrap();
        assert_eq!(outcome, ExecOutcome::Code(STATUS_NOT_FOUND));
        assert_eq!(env.last_status(), STATUS_NOT_FOUND);
    }

    #[test]
    fn test_spawn_failure_is_reported_and_not_fatal() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let broken = bin.join("broken");
        fs::write(&broken, "#!/nonexistent_interp\n").unwrap();
        fs::set_permissions(&broken, fs::Permissions::from_mode(0o755)).unwrap();

        let system_path = std::env::var("PATH").unwrap_or_default();
        let search = format!("{}:{}", bin.display(), system_path);
        let mut env = Environment::with_vars(dir.path(), [("PATH", search)]);
        let mut exec = DefaultExecutor;

        let outcome = exec.exec(&parsed("broken arg"), &mut env).unwrap();
        assert_eq!(outcome, ExecOutcome::Code(STATUS_CANNOT_EXECUTE));
        assert_eq!(env.last_status(), STATUS_CANNOT_EXECUTE);

        let outcome = exec.exec(&parsed("sh -c 'exit 0'"), &mut env).unwrap();
        assert_eq!(outcome, ExecOutcome::Code(0));
        assert_eq!(env.last_status(), 0);
    }

    #[test]
    fn test_bad_redirect_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = session(&dir);
        let mut exec = DefaultExecutor;

        let err = exec.exec(&parsed("echo hi > missing/out.txt"), &mut env).unwrap_err();
        assert!(err.to_string().ends_with("missing/out.txt: No such file or directory"));
    }

    #[test]
    fn test_exit_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = session(&dir);
        let outcome = DefaultExecutor.exec(&parsed("exit"), &mut env).unwrap();
        assert_eq!(outcome, ExecOutcome::Exit);
    }
}
