//! Error types.
//!
//! Unmatched input is never an error: it ends dispatch quietly or with a list
//! of completion candidates. Errors only come from outside the matching logic.

use thiserror::Error;

/// Failure surfaced by the dispatch entry points.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A terminal action returned an error. Passed through untouched; the
    /// message already carries the action's own context chain.
    #[error("{action}: {error:#}")]
    Action {
        action: &'static str,
        error: anyhow::Error,
    },

    /// Writing completion candidates failed.
    #[error("failed to write completion candidates: {0}")]
    Emit(#[from] std::io::Error),

    /// No registration script exists for the requested shell.
    #[error("unsupported shell '{0}' (expected one of: bash, zsh)")]
    UnsupportedShell(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
