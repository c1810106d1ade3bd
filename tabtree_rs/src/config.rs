//! Entry-point options for an application built on tabtree.
//!
//! Nothing here is persisted; the options are compiled into the binary that
//! embeds the dispatcher.

/// Environment variable bash sets for `complete -C` completers.
pub const DEFAULT_COMPLETION_VAR: &str = "COMP_LINE";

/// Options controlling how the interactive entry point reads its input.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Name the program is installed under (used in registration scripts).
    pub program: &'static str,
    /// Environment variable whose presence switches on completion mode and
    /// whose value is the command-line buffer.
    pub completion_var: &'static str,
}

impl DispatchOptions {
    pub const fn new(program: &'static str) -> Self {
        Self {
            program,
            completion_var: DEFAULT_COMPLETION_VAR,
        }
    }

    pub const fn with_completion_var(mut self, var: &'static str) -> Self {
        self.completion_var = var;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_bash_variable() {
        let opts = DispatchOptions::new("tool");
        assert_eq!(opts.program, "tool");
        assert_eq!(opts.completion_var, "COMP_LINE");
    }

    #[test]
    fn completion_var_can_be_overridden() {
        let opts = DispatchOptions::new("tool").with_completion_var("TOOL_COMPLETE");
        assert_eq!(opts.completion_var, "TOOL_COMPLETE");
    }
}
