//! Option registry: the per-frame set of branches a frame can transition to.
//!
//! A frame definition is a plain function that receives a fresh [`Registry`]
//! and the path of tokens consumed so far, and fills the registry with
//! [`Registration`]s. The dispatcher calls it again on every visit, so a
//! definition may register different branches depending on the path or on the
//! state of the world (files on disk, branches in a repository, ...).
//!
//! ```
//! use tabtree::{Action, Frame, Registration, Registry};
//!
//! fn root(reg: &mut Registry, _path: &[String]) {
//!     reg.register("commit", Registration::new().next(COMMIT));
//!     reg.register("status", Registration::new());
//! }
//!
//! fn commit(reg: &mut Registry, _path: &[String]) {
//!     reg.set_action(Action::new("commit", |_args| Ok(())));
//! }
//!
//! const COMMIT: Frame = Frame::new("commit", commit);
//! # let _ = Frame::new("root", root);
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Signature of a frame definition.
pub type DefineFn = fn(&mut Registry, &[String]);

/// Signature of a terminal action. Receives the unconsumed tokens.
pub type ActionFn = fn(&[String]) -> anyhow::Result<()>;

// ============================================================================
// Frame / Action references
// ============================================================================

/// A named reference to a frame definition.
///
/// Frames are compared by name, which keeps registries inspectable: a
/// [`Branch`] only stores which frame it leads to, not a closure.
#[derive(Clone, Copy)]
pub struct Frame {
    name: &'static str,
    define: DefineFn,
}

impl Frame {
    pub const fn new(name: &'static str, define: DefineFn) -> Self {
        Self { name, define }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build this frame's registry for one visit.
    pub fn build(&self, path: &[String]) -> Registry {
        let mut registry = Registry::default();
        (self.define)(&mut registry, path);
        registry
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frame").field(&self.name).finish()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Frame {}

/// A named terminal action bound to a frame.
#[derive(Clone, Copy)]
pub struct Action {
    name: &'static str,
    run: ActionFn,
}

impl Action {
    pub const fn new(name: &'static str, run: ActionFn) -> Self {
        Self { name, run }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invoke(&self, args: &[String]) -> anyhow::Result<()> {
        (self.run)(args)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Action {}

// ============================================================================
// Registration (builder input)
// ============================================================================

/// Options for one `register` call.
///
/// Defaults: no explicit value (the branch name is the completion value),
/// not repeating, visible, no sub-frame.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    value: Option<String>,
    repeat: bool,
    hidden: bool,
    next: Option<Frame>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a value-like registration.
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Set an explicit completion value. Marks the branch value-like.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Enter repeat mode once this branch is selected.
    pub fn repeat(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Keep this branch out of interactive completion output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Frame reached when this branch is selected.
    pub fn next(mut self, frame: Frame) -> Self {
        self.next = Some(frame);
        self
    }
}

// ============================================================================
// Branch (registry entry)
// ============================================================================

/// One named transition out of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: String,
    values: Vec<String>,
    value_like: bool,
    hidden: bool,
    repeat: bool,
    next: Option<Frame>,
}

impl Branch {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
            value_like: false,
            hidden: false,
            repeat: false,
            next: None,
        }
    }

    fn merge(&mut self, registration: Registration) {
        let value = match registration.value {
            Some(value) => {
                self.value_like = true;
                value
            }
            None => self.name.clone(),
        };
        if !self.values.contains(&value) {
            self.values.push(value);
        }
        self.repeat = registration.repeat;
        self.hidden |= registration.hidden;
        if self.next.is_none() {
            self.next = registration.next;
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Completion values in registration order, without duplicates.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_value_like(&self) -> bool {
        self.value_like
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    pub fn next(&self) -> Option<Frame> {
        self.next
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Branches and terminal action collected for one visit of a frame.
///
/// Branches are keyed by name and iterate in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    branches: BTreeMap<String, Branch>,
    action: Option<Action>,
}

impl Registry {
    /// Ensure a branch named `name` exists and merge `registration` into it.
    ///
    /// Values accumulate, `hidden` never reverts, `repeat` follows the latest
    /// call and the first bound sub-frame wins.
    pub fn register(&mut self, name: &str, registration: Registration) -> &mut Self {
        self.branches
            .entry(name.to_string())
            .or_insert_with(|| Branch::empty(name))
            .merge(registration);
        self
    }

    /// Plain keyword branch with no sub-frame.
    pub fn keyword(&mut self, name: &str) -> &mut Self {
        self.register(name, Registration::new())
    }

    /// Bind the frame's terminal action. The last call wins.
    pub fn set_action(&mut self, action: Action) -> &mut Self {
        self.action = Some(action);
        self
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn get(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    /// Branches in lexicographic name order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}
