use std::io::{self, Write};

use tracing::{debug, trace};

use crate::config::{Config, EofBehavior};
use crate::environment::Environment;
use crate::error::ShellError;
use crate::executor::{DefaultExecutor, ExecOutcome, Executor};
use crate::lexer::Lexer;
use crate::parser::parse_tokens;
use crate::prompt::LineSource;

pub struct Repl<S: LineSource, E: Executor = DefaultExecutor> {
    source: S,
    executor: E,
    config: Config,
    env: Environment,
}

impl<S: LineSource> Repl<S> {
    pub fn new(source: S, config: Config, env: Environment) -> Self {
        Self::with_executor(source, DefaultExecutor, config, env)
    }
}

impl<S: LineSource, E: Executor> Repl<S, E> {
    pub fn with_executor(source: S, executor: E, config: Config, mut env: Environment) -> Self {
        for (k, v) in &config.env_vars {
            env.set(k, v);
            env.export(k);
        }
        Repl {
            source,
            executor,
            config,
            env,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Tokenize, parse and run one line.
    pub fn eval_line(&mut self, line: &str) -> Result<ExecOutcome, ShellError> {
        let tokens = Lexer::tokenize(line);
        trace!(?tokens, "tokenized");
        if tokens.is_empty() {
            return Ok(ExecOutcome::Code(self.env.last_status()));
        }
        let cmd = parse_tokens(tokens)?;
        Ok(self.executor.exec(&cmd, &mut self.env)?)
    }

    /// Run until `exit`, or until input runs out when configured to stop there.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            let Some(line) = self.source.read_line(&self.config.prompt)? else {
                match self.config.eof {
                    EofBehavior::Exit => {
                        debug!("end of input");
                        return Ok(());
                    }
                    EofBehavior::Continue => continue,
                }
            };

            match self.eval_line(&line) {
                Ok(ExecOutcome::Exit) => return Ok(()),
                Ok(ExecOutcome::Code(code)) => trace!(code, "line finished"),
                Err(e) => {
                    let _ = io::stdout().flush();
                    writeln!(io::stderr(), "minish: {}", e)?;
                }
            }
        }
    }
}
