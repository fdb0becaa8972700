//! Resolver-side ref state.

use std::fmt;

use cairn_types::{Hash, RefName};

/// The state of HEAD: either symbolic (naming a branch) or detached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    /// HEAD names a branch by its short name (e.g. "main").
    Symbolic(RefName),
    /// HEAD points directly at a commit.
    Detached(Hash),
}

impl Head {
    /// The `refs/heads/` path HEAD follows, if symbolic.
    pub fn branch_ref(&self) -> Option<String> {
        match self {
            Head::Symbolic(branch) => Some(format!("refs/heads/{branch}")),
            Head::Detached(_) => None,
        }
    }

    /// Returns `true` if HEAD is detached.
    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Symbolic(branch) => write!(f, "ref: refs/heads/{branch}"),
            Head::Detached(hash) => write!(f, "{hash}"),
        }
    }
}
