use thiserror::Error;

use crate::path::{Key, TreePath};

/// Failures raised by path resolution, mutation, and strict deletion.
///
/// All variants are local, recoverable conditions returned to the immediate
/// caller; nothing is swallowed internally and rendering never fails.
#[derive(Error, Debug)]
pub enum TreeError {
    /// A strict lookup or strict deletion hit a missing segment.
    ///
    /// Permissive operations ([`Tree::get_or_create`](crate::Tree::get_or_create),
    /// [`Tree::set`](crate::Tree::set), [`Tree::remove`](crate::Tree::remove))
    /// never produce this variant.
    #[error("segment `{segment}` of `{path}` not found in sub-tree {subtree}")]
    PathNotFound {
        path: TreePath,
        segment: Key,
        subtree: String,
    },

    /// A path argument was empty or contained an empty dotted segment.
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    /// A branch was expected at a position but a leaf was found.
    ///
    /// Raised when a walk must descend through a leaf, or when a non-mapping
    /// value is offered as a tree root. Distinct from the write-time
    /// overwrite policy of [`Tree::set`](crate::Tree::set), which silently
    /// replaces whatever sits at the terminal segment.
    #[error("expected a branch at `{at}`, found leaf {found}")]
    TypeConflict { at: String, found: String },
}

impl TreeError {
    /// Invalid path argument with a reason.
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            reason: reason.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
