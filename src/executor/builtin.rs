use std::io::Write;
use std::str::FromStr;

use crate::environment::Environment;
use crate::executor::path_resolver::PathResolver;
use crate::executor::{describe_io_error, ExecOutcome, ExecStatus};

/// The closed set of commands run inside the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Exit,
    Echo,
    Pwd,
    Cd,
    Type,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Exit,
        Builtin::Echo,
        Builtin::Pwd,
        Builtin::Cd,
        Builtin::Type,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
            Builtin::Type => "type",
        }
    }

    pub fn lookup(name: &str) -> Option<Builtin> {
        name.parse().ok()
    }

    pub fn is_builtin(name: &str) -> bool {
        Self::lookup(name).is_some()
    }

    /// Runs the builtin, writing any output (including its own error lines) to `out`.
    pub fn run(self, args: &[String], env: &mut Environment, out: &mut dyn Write) -> ExecStatus {
        match self {
            Builtin::Exit => Ok(ExecOutcome::Exit),
            Builtin::Echo => {
                writeln!(out, "{}", args.join(" "))?;
                Ok(ExecOutcome::Code(0))
            }
            Builtin::Pwd => {
                writeln!(out, "{}", env.cwd().display())?;
                Ok(ExecOutcome::Code(0))
            }
            Builtin::Cd => change_dir(args, env, out),
            Builtin::Type => describe_type(args, env, out),
        }
    }
}

impl FromStr for Builtin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Builtin::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or(())
    }
}

fn change_dir(args: &[String], env: &mut Environment, out: &mut dyn Write) -> ExecStatus {
    let Some(arg) = args.first() else {
        return Ok(ExecOutcome::Code(0));
    };
    let target = if arg == "~" {
        match env.get("HOME") {
            Some(home) => home.to_string(),
            None => {
                writeln!(out, "cd: HOME not set")?;
                return Ok(ExecOutcome::Code(1));
            }
        }
    } else {
        arg.clone()
    };

    match env.change_dir(&target) {
        Ok(()) => Ok(ExecOutcome::Code(0)),
        Err(e) => {
            writeln!(out, "cd: {}: {}", arg, describe_io_error(&e))?;
            Ok(ExecOutcome::Code(1))
        }
    }
}

fn describe_type(args: &[String], env: &mut Environment, out: &mut dyn Write) -> ExecStatus {
    let Some(name) = args.first() else {
        return Ok(ExecOutcome::Code(0));
    };
    if Builtin::is_builtin(name) {
        writeln!(out, "{} is a shell builtin", name)?;
        return Ok(ExecOutcome::Code(0));
    }
    match PathResolver::from_env(env).resolve(name) {
        Some(path) => {
            writeln!(out, "{} is {}", name, path.display())?;
            Ok(ExecOutcome::Code(0))
        }
        None => {
            writeln!(out, "{}: not found", name)?;
            Ok(ExecOutcome::Code(1))
        }
    }
}
