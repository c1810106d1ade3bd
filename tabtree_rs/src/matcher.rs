//! Candidate filtering, value aggregation and tie-breaking for one frame.
//!
//! Keyword branches match when the token is a prefix of the branch name.
//! Value-like branches match when the token occurs anywhere inside the branch
//! name, so typing `login` finds `feature/login`. The completion values never
//! take part in matching; they are only what gets offered.
//! An empty token matches everything under both rules.

use std::collections::HashSet;

use crate::registry::{Branch, Registry};

/// Does `token` select `branch`?
pub fn matches(branch: &Branch, token: &str) -> bool {
    if branch.is_value_like() {
        branch.name().contains(token)
    } else {
        branch.name().starts_with(token)
    }
}

/// Surviving candidates, in lexicographic name order.
pub fn candidates<'a>(registry: &'a Registry, token: &str) -> Vec<&'a Branch> {
    registry
        .branches()
        .filter(|branch| matches(branch, token))
        .collect()
}

/// Union of the candidates' completion values.
///
/// Order follows candidate name order, then registration order inside a
/// branch; duplicates keep their first position.
pub fn aggregate_values<'a, I>(candidates: I, include_hidden: bool) -> Vec<String>
where
    I: IntoIterator<Item = &'a Branch>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for branch in candidates {
        if branch.is_hidden() && !include_hidden {
            continue;
        }
        for value in branch.values() {
            if seen.insert(value.as_str()) {
                out.push(value.clone());
            }
        }
    }
    out
}

/// The candidate that decides where dispatch goes next: the smallest name.
pub fn select<'a>(candidates: &[&'a Branch]) -> Option<&'a Branch> {
    candidates.iter().copied().min_by(|a, b| a.name().cmp(b.name()))
}
