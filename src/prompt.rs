use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Anything that can hand the interpreter one line at a time.
///
/// `Ok(None)` means the source is exhausted.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads from stdin, printing the prompt to stdout first.
pub struct ShellPrompt {}

impl ShellPrompt {
    pub fn new() -> Self {
        ShellPrompt {}
    }
}

impl Default for ShellPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for ShellPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut buf = Vec::new();
        let bytes_read = io::stdin().lock().read_until(b'\n', &mut buf)?;
        if bytes_read == 0 {
            // EOF (e.g., Ctrl-D)
            return Ok(None);
        }
        Ok(Some(decode_line(&buf)))
    }
}

/// Replays a fixed list of lines, ignoring the prompt.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedSource {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Invalid UTF-8 is replaced rather than rejected so one bad line never ends the session.
fn decode_line(bytes: &[u8]) -> String {
    strip_newline(String::from_utf8_lossy(bytes).into_owned())
}

fn strip_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
