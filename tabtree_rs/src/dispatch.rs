//! The dispatcher: walks frames over a token stream.
//!
//! Two entry points share one matching loop:
//!
//! - [`dispatch`] is the interactive entry point. In [`Mode::Execute`] it runs
//!   terminal actions; in [`Mode::Complete`] it produces completion
//!   candidates. Tokens are lowercased before matching and hidden branches
//!   never show up in the output.
//! - [`traverse`] walks an explicit token list the way completion would, but
//!   matches case-sensitively, includes hidden branches and never runs
//!   actions. Useful for checking a tree from tests or generating docs.
//!
//! Each step visits one frame:
//!
//! ```text
//!   build registry ──► action bound & executing? ──yes──► run action, done
//!          │                      │no
//!          ▼                      ▼
//!   pop token ──► filter candidates ──► stream empty? ──yes──► emit values
//!                        │                    │no
//!                        ▼                    ▼
//!                 none survived?        pick smallest name
//!                 complete: emit all    repeat? same frame : branch.next
//!                 execute: stop         no frame? stop
//! ```
//!
//! The two entry points disagree on case folding and on hidden branches. That
//! mirrors how the tree behaves when a shell drives it versus when a program
//! inspects it, and is kept as is.

use std::io::{ErrorKind, Write};

use tracing::{debug, trace};

use crate::config::DispatchOptions;
use crate::error::{DispatchError, Result};
use crate::matcher;
use crate::registry::Frame;
use crate::session::{Mode, Session};

/// How a dispatch run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Candidates to print, one per line.
    Completions(Vec<String>),
    /// A terminal action ran with the given unconsumed tokens.
    Executed {
        action: &'static str,
        args: Vec<String>,
    },
    /// Dispatch ended without output (dead end or unmatched token).
    Stopped,
}

impl Outcome {
    /// Write completion candidates, one per line. Other outcomes write nothing.
    pub fn emit<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if let Outcome::Completions(values) = self {
            for value in values {
                writeln!(out, "{value}")?;
            }
        }
        out.flush()
    }

    pub fn completions(&self) -> &[String] {
        match self {
            Outcome::Completions(values) => values,
            _ => &[],
        }
    }
}

/// Per-entry-point matching behaviour.
#[derive(Debug, Clone, Copy)]
struct Rules {
    run_actions: bool,
    fold_case: bool,
    include_hidden: bool,
    /// Emit the whole frame when a token matches nothing (otherwise stop).
    complete_on_miss: bool,
}

impl Rules {
    fn interactive(mode: Mode) -> Self {
        Self {
            run_actions: mode == Mode::Execute,
            fold_case: true,
            include_hidden: false,
            complete_on_miss: mode == Mode::Complete,
        }
    }

    fn traversal() -> Self {
        Self {
            run_actions: false,
            fold_case: false,
            include_hidden: true,
            complete_on_miss: true,
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Interactive dispatch over a session, starting at `root`.
pub fn dispatch(session: Session, root: Frame) -> Result<Outcome> {
    let rules = Rules::interactive(session.mode());
    debug!(mode = ?session.mode(), tokens = ?session.tokens(), root = root.name(), "dispatch");
    walk(rules, session.into_tokens(), root)
}

/// Completion-style traversal over an explicit token list.
///
/// Never runs terminal actions, so the only possible outcomes are
/// [`Outcome::Completions`] and [`Outcome::Stopped`].
pub fn traverse<I, S>(tokens: I, root: Frame) -> Outcome
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    debug!(tokens = ?tokens, root = root.name(), "traverse");
    match walk(Rules::traversal(), tokens, root) {
        Ok(outcome) => outcome,
        // Only terminal actions can fail, and traversal never runs them.
        Err(_) => Outcome::Stopped,
    }
}

/// Detect the session from the environment, dispatch, and print candidates.
///
/// Returning `Ok` means the process should exit successfully; an `Err`
/// carries a terminal action's failure to the caller's `main`.
pub fn launch(opts: &DispatchOptions, root: Frame) -> Result<Outcome> {
    let session = Session::detect(opts);
    let outcome = dispatch(session, root)?;
    let stdout = std::io::stdout();
    deliver(&outcome, &mut stdout.lock())?;
    Ok(outcome)
}

/// Emit candidates; a reader that went away early is a normal end.
fn deliver<W: Write>(outcome: &Outcome, out: &mut W) -> Result<()> {
    match outcome.emit(out) {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {
            debug!("completion reader closed the pipe");
            Ok(())
        }
        other => other.map_err(DispatchError::from),
    }
}

// ============================================================================
// Frame walk
// ============================================================================

fn walk(rules: Rules, tokens: Vec<String>, root: Frame) -> Result<Outcome> {
    let mut cursor = 0usize;
    let mut frame = root;
    let mut repeat = false;
    let mut path: Vec<String> = Vec::new();

    loop {
        let registry = frame.build(&path);
        trace!(
            frame = frame.name(),
            branches = registry.len(),
            action = registry.action().map(|a| a.name()),
            "visit"
        );

        if rules.run_actions
            && let Some(action) = registry.action()
        {
            let args = tokens[cursor..].to_vec();
            debug!(action = action.name(), args = ?args, "terminal action");
            action
                .invoke(&args)
                .map_err(|error| DispatchError::Action {
                    action: action.name(),
                    error,
                })?;
            return Ok(Outcome::Executed {
                action: action.name(),
                args,
            });
        }

        let mut token = tokens.get(cursor).cloned().unwrap_or_default();
        cursor = (cursor + 1).min(tokens.len());
        if rules.fold_case {
            token = token.to_lowercase();
        }

        let candidates = matcher::candidates(&registry, &token);
        let values = matcher::aggregate_values(candidates.iter().copied(), rules.include_hidden);
        trace!(
            token = %token,
            candidates = ?candidates.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "filtered"
        );

        if cursor >= tokens.len() {
            debug!(frame = frame.name(), count = values.len(), "stream exhausted");
            return Ok(Outcome::Completions(values));
        }

        let Some(selected) = matcher::select(&candidates) else {
            if rules.complete_on_miss {
                let all = matcher::aggregate_values(registry.branches(), rules.include_hidden);
                debug!(frame = frame.name(), token = %token, "no match, offering frame");
                return Ok(Outcome::Completions(all));
            }
            debug!(frame = frame.name(), token = %token, "no match, stopping");
            return Ok(Outcome::Stopped);
        };

        let next = if repeat { Some(frame) } else { selected.next() };
        let Some(next) = next else {
            debug!(branch = selected.name(), "dead end");
            return Ok(Outcome::Stopped);
        };

        if selected.is_repeat() && !repeat {
            debug!(branch = selected.name(), "entering repeat mode");
        }
        repeat |= selected.is_repeat();
        trace!(branch = selected.name(), next = next.name(), repeat, "descend");

        path.push(token);
        frame = next;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::registry::{Action, Registration, Registry};

    thread_local! {
        static RECORDED: RefCell<Vec<Vec<String>>> = const { RefCell::new(Vec::new()) };
        static PATHS: RefCell<Vec<(String, Vec<String>)>> = const { RefCell::new(Vec::new()) };
    }

    fn record(args: &[String]) -> anyhow::Result<()> {
        RECORDED.with(|r| r.borrow_mut().push(args.to_vec()));
        Ok(())
    }

    fn recorded() -> Vec<Vec<String>> {
        RECORDED.with(|r| r.borrow_mut().drain(..).collect())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn execute(args: &[&str], root: Frame) -> Outcome {
        dispatch(Session::execute(strings(args)), root).expect("dispatch")
    }

    fn complete(line: &str, root: Frame) -> Outcome {
        dispatch(Session::complete(line), root).expect("dispatch")
    }

    // --- a small git-like tree -------------------------------------------

    fn root(reg: &mut Registry, _path: &[String]) {
        reg.register("commit", Registration::new().next(COMMIT))
            .register("status", Registration::new().next(STATUS))
            .register("stash", Registration::new().next(STASH))
            .register("debug", Registration::new().hidden().next(STATUS))
            .keyword("version");
    }

    fn commit(reg: &mut Registry, _path: &[String]) {
        reg.keyword("-m").keyword("--amend");
        reg.set_action(Action::new("commit", record));
    }

    fn status(reg: &mut Registry, _path: &[String]) {
        reg.keyword("--short");
    }

    fn stash(reg: &mut Registry, _path: &[String]) {
        reg.keyword("pop").keyword("push").keyword("list");
    }

    const ROOT: Frame = Frame::new("root", root);
    const COMMIT: Frame = Frame::new("commit", commit);
    const STATUS: Frame = Frame::new("status", status);
    const STASH: Frame = Frame::new("stash", stash);

    // --- repeat tree -------------------------------------------------------

    fn files_root(reg: &mut Registry, _path: &[String]) {
        reg.register("add", Registration::new().next(ADD));
    }

    fn add(reg: &mut Registry, path: &[String]) {
        PATHS.with(|p| p.borrow_mut().push(("add".to_string(), path.to_vec())));
        for file in ["a.txt", "b.txt", "c.rs"] {
            reg.register(file, Registration::value(file).repeat().next(ADD_TAIL));
        }
    }

    fn add_tail(reg: &mut Registry, path: &[String]) {
        PATHS.with(|p| p.borrow_mut().push(("tail".to_string(), path.to_vec())));
        // Own branches are not repeating and point elsewhere; repeat mode
        // must keep revisiting this frame anyway.
        for file in ["a.txt", "b.txt", "c.rs", "x.txt"] {
            reg.register(file, Registration::value(file).next(STATUS));
        }
    }

    const FILES_ROOT: Frame = Frame::new("files-root", files_root);
    const ADD: Frame = Frame::new("add", add);
    const ADD_TAIL: Frame = Frame::new("add-tail", add_tail);

    fn visited() -> Vec<(String, Vec<String>)> {
        PATHS.with(|p| p.borrow_mut().drain(..).collect())
    }

    // --- execution mode --------------------------------------------------

    #[test]
    fn commit_action_receives_remaining_tokens() {
        let outcome = execute(&["commit", "-m", "hello"], ROOT);

        assert_eq!(
            outcome,
            Outcome::Executed {
                action: "commit",
                args: strings(&["-m", "hello"]),
            }
        );
        assert_eq!(recorded(), vec![strings(&["-m", "hello"])]);
    }

    #[test]
    fn action_wins_over_branches_and_runs_once() {
        fn only_action(reg: &mut Registry, _path: &[String]) {
            reg.set_action(Action::new("all", record));
        }
        let frame = Frame::new("only-action", only_action);

        let outcome = execute(&["anything", "at", "all"], frame);

        assert!(matches!(outcome, Outcome::Executed { action: "all", .. }));
        assert_eq!(recorded(), vec![strings(&["anything", "at", "all"])]);
    }

    #[test]
    fn execution_folds_case_before_matching() {
        let outcome = execute(&["COMMIT", "x"], ROOT);
        assert!(matches!(outcome, Outcome::Executed { action: "commit", .. }));
        recorded();
    }

    #[test]
    fn execution_unmatched_token_stops_quietly() {
        assert_eq!(execute(&["frobnicate", "x"], ROOT), Outcome::Stopped);
    }

    #[test]
    fn execution_dead_end_stops_quietly() {
        assert_eq!(execute(&["version", "extra"], ROOT), Outcome::Stopped);
    }

    #[test]
    fn execution_with_empty_stream_lists_frame() {
        let outcome = execute(&[], ROOT);
        assert_eq!(
            outcome.completions(),
            ["commit", "stash", "status", "version"]
        );
    }

    #[test]
    fn action_error_propagates() {
        fn failing(reg: &mut Registry, _path: &[String]) {
            reg.set_action(Action::new("explode", |_| anyhow::bail!("boom")));
        }
        let frame = Frame::new("failing", failing);

        let err = dispatch(Session::execute(strings(&["x"])), frame).unwrap_err();
        assert!(matches!(err, DispatchError::Action { action: "explode", .. }));
        assert!(err.to_string().contains("boom"));
    }

    // --- completion mode -------------------------------------------------

    #[test]
    fn completion_skips_actions() {
        let outcome = complete("git commit ", ROOT);
        assert_eq!(outcome.completions(), ["--amend", "-m"]);
        assert!(recorded().is_empty());
    }

    #[test]
    fn completion_of_partial_word() {
        let outcome = complete("git sta", ROOT);
        assert_eq!(outcome.completions(), ["stash", "status"]);
    }

    #[test]
    fn completion_hides_secret_branches() {
        let outcome = complete("git ", ROOT);
        assert_eq!(
            outcome.completions(),
            ["commit", "stash", "status", "version"]
        );
    }

    #[test]
    fn hidden_branch_still_matches() {
        // "debug" leads to the status frame even though it is never offered
        let outcome = complete("git debug ", ROOT);
        assert_eq!(outcome.completions(), ["--short"]);
    }

    #[test]
    fn ambiguous_prefix_descends_into_smallest_name() {
        // "sta" matches stash and status; stash wins the tie-break
        let outcome = complete("git sta ", ROOT);
        assert_eq!(outcome.completions(), ["list", "pop", "push"]);
    }

    #[test]
    fn completion_miss_offers_whole_frame() {
        let outcome = complete("git stash zzz ", ROOT);
        assert_eq!(outcome.completions(), ["list", "pop", "push"]);
    }

    #[test]
    fn completion_miss_leaves_out_hidden_branches() {
        let outcome = complete("git zzz more", ROOT);
        assert_eq!(
            outcome.completions(),
            ["commit", "stash", "status", "version"]
        );
        assert!(!outcome.completions().iter().any(|v| v == "debug"));
    }

    #[test]
    fn completion_miss_in_last_word_is_empty() {
        let outcome = complete("git zzz", ROOT);
        assert_eq!(outcome, Outcome::Completions(Vec::new()));
    }

    #[test]
    fn completion_folds_case() {
        let outcome = complete("git STA", ROOT);
        assert_eq!(outcome.completions(), ["stash", "status"]);
    }

    #[test]
    fn completion_dead_end_is_silent() {
        assert_eq!(complete("git version x ", ROOT), Outcome::Stopped);
    }

    #[test]
    fn exact_match_at_end_still_lists_candidates() {
        let outcome = complete("git status", ROOT);
        assert_eq!(outcome.completions(), ["status"]);
    }

    // --- repeat mode -----------------------------------------------------

    #[test]
    fn repeat_mode_revisits_same_frame() {
        visited();
        let outcome = complete("git add a.txt b.txt ", FILES_ROOT);

        // add-tail's own values are offered: we never left add-tail
        assert_eq!(outcome.completions(), ["a.txt", "b.txt", "c.rs", "x.txt"]);
        let frames: Vec<String> = visited().into_iter().map(|(f, _)| f).collect();
        assert_eq!(frames, ["add", "tail", "tail"]);
    }

    #[test]
    fn repeat_mode_ignores_descendant_next() {
        visited();
        // add-tail's branch points at STATUS, which would offer --short
        let outcome = complete("git add a.txt x.txt x.txt ", FILES_ROOT);
        assert_eq!(outcome.completions(), ["a.txt", "b.txt", "c.rs", "x.txt"]);
    }

    #[test]
    fn path_records_consumed_tokens() {
        visited();
        complete("git add a.txt B.TXT ", FILES_ROOT);

        let seen = visited();
        assert_eq!(seen[0], ("add".to_string(), strings(&["add"])));
        assert_eq!(seen[1], ("tail".to_string(), strings(&["add", "a.txt"])));
        assert_eq!(
            seen[2],
            ("tail".to_string(), strings(&["add", "a.txt", "b.txt"]))
        );
    }

    #[test]
    fn value_like_matches_anywhere_in_name() {
        let outcome = complete("git add tx", FILES_ROOT);
        assert_eq!(outcome.completions(), ["a.txt", "b.txt"]);
    }

    // --- static traversal ------------------------------------------------

    #[test]
    fn traversal_includes_hidden_values() {
        let outcome = traverse([""], ROOT);
        assert_eq!(
            outcome.completions(),
            ["commit", "debug", "stash", "status", "version"]
        );
    }

    #[test]
    fn traversal_is_case_sensitive() {
        assert_eq!(traverse(["STA"], ROOT), Outcome::Completions(Vec::new()));
        assert_eq!(traverse(["sta"], ROOT).completions(), ["stash", "status"]);
    }

    #[test]
    fn traversal_never_runs_actions() {
        let outcome = traverse(["commit", "-m", "msg"], ROOT);
        // "-m" matched, "msg" pending: -m has no sub-frame, so dispatch ends
        assert_eq!(outcome, Outcome::Stopped);
        assert!(recorded().is_empty());
    }

    #[test]
    fn traversal_on_empty_list_lists_root() {
        let outcome = traverse(Vec::<String>::new(), ROOT);
        assert_eq!(outcome.completions().len(), 5);
    }

    #[test]
    fn traversal_miss_offers_frame_including_hidden() {
        let outcome = traverse(["nope", "more"], ROOT);
        assert_eq!(
            outcome.completions(),
            ["commit", "debug", "stash", "status", "version"]
        );
    }

    // --- output ----------------------------------------------------------

    #[test]
    fn emit_writes_one_value_per_line() {
        let mut buf = Vec::new();
        Outcome::Completions(strings(&["stash", "status"]))
            .emit(&mut buf)
            .expect("emit");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "stash\nstatus\n");
    }

    #[test]
    fn emit_is_silent_for_other_outcomes() {
        let mut buf = Vec::new();
        Outcome::Stopped.emit(&mut buf).expect("emit");
        Outcome::Executed {
            action: "x",
            args: Vec::new(),
        }
        .emit(&mut buf)
        .expect("emit");
        assert!(buf.is_empty());
    }

    /// Writer that fails every write with the given error kind.
    struct FailingWriter(ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(self.0))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::from(self.0))
        }
    }

    #[test]
    fn closed_pipe_ends_delivery_successfully() {
        let outcome = Outcome::Completions(strings(&["stash", "status"]));
        let mut out = FailingWriter(ErrorKind::BrokenPipe);

        assert!(outcome.emit(&mut out).is_err());
        assert!(deliver(&outcome, &mut out).is_ok());
    }

    #[test]
    fn other_write_failures_surface() {
        let outcome = Outcome::Completions(strings(&["stash"]));
        let mut out = FailingWriter(ErrorKind::PermissionDenied);

        let err = deliver(&outcome, &mut out).unwrap_err();
        assert!(matches!(err, DispatchError::Emit(_)));
    }
}
