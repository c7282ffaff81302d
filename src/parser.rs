use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub mode: RedirectMode,
}

/// A command line after redirection operators have been pulled out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub argv: Vec<String>,
    pub stdout: Option<Redirect>,
    pub stderr: Option<Redirect>,
}

impl ParsedCommand {
    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(|s| s.as_str())
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingRedirectTarget(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectTarget(_) => {
                write!(f, "syntax error near unexpected token `newline'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn classify(token: &str) -> Option<(Stream, RedirectMode)> {
    match token {
        ">" | "1>" => Some((Stream::Stdout, RedirectMode::Truncate)),
        ">>" | "1>>" => Some((Stream::Stdout, RedirectMode::Append)),
        "2>" => Some((Stream::Stderr, RedirectMode::Truncate)),
        "2>>" => Some((Stream::Stderr, RedirectMode::Append)),
        _ => None,
    }
}

/// Pull the first redirection operator and its target off a token list.
///
/// Scanning stops at the first operator: it, its target and every token after
/// them are removed from the command words. A later operator on the same line
/// is therefore dropped rather than honored.
pub fn parse_tokens(tokens: Vec<String>) -> Result<ParsedCommand, ParseError> {
    let mut cmd = ParsedCommand::default();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        let Some((stream, mode)) = classify(&token) else {
            cmd.argv.push(token);
            continue;
        };
        let target = iter
            .next()
            .ok_or(ParseError::MissingRedirectTarget(token))?;
        let redirect = Some(Redirect { target, mode });
        match stream {
            Stream::Stdout => cmd.stdout = redirect,
            Stream::Stderr => cmd.stderr = redirect,
        }
        break;
    }

    Ok(cmd)
}
