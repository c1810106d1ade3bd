//! Serializable snapshots of a frame's registry.
//!
//! Frames are functions, so the only way to look at a tree is to build a
//! registry and read it back. [`describe`] does exactly that for one frame
//! and one path, producing plain data for docs, debugging or JSON output.

use serde::Serialize;

use crate::registry::{Branch, Frame};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    pub frame: &'static str,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    pub branches: Vec<BranchSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub name: String,
    pub values: Vec<String>,
    pub value_like: bool,
    pub hidden: bool,
    pub repeat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<&'static str>,
}

impl From<&Branch> for BranchSummary {
    fn from(branch: &Branch) -> Self {
        Self {
            name: branch.name().to_string(),
            values: branch.values().to_vec(),
            value_like: branch.is_value_like(),
            hidden: branch.is_hidden(),
            repeat: branch.is_repeat(),
            next: branch.next().map(|f| f.name()),
        }
    }
}

/// Build `frame` for `path` and summarize what it registered.
pub fn describe(frame: Frame, path: &[String]) -> FrameSummary {
    let registry = frame.build(path);
    FrameSummary {
        frame: frame.name(),
        path: path.to_vec(),
        action: registry.action().map(|a| a.name()),
        branches: registry.branches().map(BranchSummary::from).collect(),
    }
}

impl FrameSummary {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
