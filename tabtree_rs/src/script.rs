//! Shell snippets that register a tabtree program as its own completer.
//!
//! Bash's `complete -C` runs the program with `COMP_LINE` set to the current
//! command line and reads candidates from stdout, one per line. That is the
//! whole protocol, so the snippets are one-liners. Zsh gets there through
//! `bashcompinit`.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
}

impl Shell {
    pub const ALL: [Shell; 2] = [Shell::Bash, Shell::Zsh];

    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shell {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            other => Err(DispatchError::UnsupportedShell(other.to_string())),
        }
    }
}

/// Registration snippet for `program` in `shell`.
///
/// `-o default` falls back to filename completion when the program prints
/// nothing (dead ends, unmatched tokens).
pub fn registration_script(shell: Shell, program: &str) -> String {
    match shell {
        Shell::Bash => format!(
            "# {program} completion (bash)\n\
             complete -o default -C '{program}' {program}\n"
        ),
        Shell::Zsh => format!(
            "# {program} completion (zsh)\n\
             autoload -U +X bashcompinit && bashcompinit\n\
             complete -o default -C '{program}' {program}\n"
        ),
    }
}
