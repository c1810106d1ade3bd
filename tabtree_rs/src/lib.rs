//! # tabtree
//!
//! **One command tree for dispatch and tab-completion.** Describe the shape of
//! a command line once, as a tree of frame functions, and the same tree both
//! runs the program and answers the shell's completion requests.
//!
//! ## Features
//!
//! - **Frames as functions** - each level of the tree is a plain `fn` that
//!   fills a [`Registry`]; it is rebuilt on every visit and may depend on the
//!   path typed so far
//! - **Keyword and value branches** - keywords match by prefix, value-like
//!   branches match anywhere inside their name
//! - **Repeat mode** - consume runs of similar arguments (`add a b c ...`)
//! - **Hidden branches** - reachable but never offered
//! - **Terminal actions** - take over the remaining arguments when executing
//! - **Bash/zsh integration** - the program is its own `complete -C` helper
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabtree::{Action, DispatchOptions, Frame, Registration, Registry};
//!
//! fn root(reg: &mut Registry, _path: &[String]) {
//!     reg.register("greet", Registration::new().next(GREET));
//! }
//!
//! fn greet(reg: &mut Registry, _path: &[String]) {
//!     reg.register("name", Registration::value("world"));
//!     reg.set_action(Action::new("greet", |args| {
//!         println!("hello {}", args.join(" "));
//!         Ok(())
//!     }));
//! }
//!
//! const ROOT: Frame = Frame::new("root", root);
//! const GREET: Frame = Frame::new("greet", greet);
//!
//! fn main() -> anyhow::Result<()> {
//!     tabtree::launch(&DispatchOptions::new("hello"), ROOT)?;
//!     Ok(())
//! }
//! ```
//!
//! Register with `complete -o default -C hello hello` (see [`script`]) and
//! `hello g<TAB>` completes to `greet`.

// ============================================================================
// Core Modules
// ============================================================================

/// Registry builder, branches and frame/action references.
pub mod registry;

/// Candidate filtering, value aggregation and tie-breaking.
pub mod matcher;

/// Execution/completion mode and token acquisition.
pub mod session;

/// The frame walk and its two entry points.
pub mod dispatch;

// ============================================================================
// Support
// ============================================================================

pub mod config;
pub mod error;
pub mod inspect;
pub mod script;

pub use config::DispatchOptions;
pub use dispatch::{Outcome, dispatch, launch, traverse};
pub use error::DispatchError;
pub use registry::{Action, Branch, Frame, Registration, Registry};
pub use session::{Mode, Session};
