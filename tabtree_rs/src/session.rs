//! Dispatch session: operating mode and the token stream it works on.
//!
//! The mode is decided exactly once, when the session is created, and is
//! carried explicitly through dispatch from there on.

use crate::config::DispatchOptions;

/// What the interactive entry point is doing this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal invocation: terminal actions run.
    Execute,
    /// The shell asked for completion candidates.
    Complete,
}

/// Mode plus the tokens to dispatch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    mode: Mode,
    tokens: Vec<String>,
}

impl Session {
    /// Execution-mode session over raw arguments (program name excluded).
    pub fn execute(args: Vec<String>) -> Self {
        Self {
            mode: Mode::Execute,
            tokens: args,
        }
    }

    /// Completion-mode session over a shell command-line buffer.
    pub fn complete(line: &str) -> Self {
        Self {
            mode: Mode::Complete,
            tokens: tokens_from_command_line(line),
        }
    }

    /// Detect the mode from the process environment.
    pub fn detect(opts: &DispatchOptions) -> Self {
        Self::detect_with(opts, |name| std::env::var(name).ok(), || {
            std::env::args().skip(1).collect()
        })
    }

    /// Detect the mode using the supplied environment lookup and argv source.
    pub fn detect_with<E, A>(opts: &DispatchOptions, env: E, args: A) -> Self
    where
        E: FnOnce(&str) -> Option<String>,
        A: FnOnce() -> Vec<String>,
    {
        match env(opts.completion_var) {
            Some(line) => Self::complete(&line),
            None => Self::execute(args()),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

/// Split a completion buffer into tokens.
///
/// Words are separated by whitespace. A buffer ending in whitespace yields a
/// trailing empty token so that a freshly started word completes from an
/// empty prefix. The first token (the program name) is dropped.
pub fn tokens_from_command_line(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if line.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }
    if !tokens.is_empty() {
        tokens.remove(0);
    }
    tokens
}
