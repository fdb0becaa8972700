//! Error types for ref resolution.

use cairn_types::ModelError;
use thiserror::Error;

/// Errors that can occur while resolving or recording refs.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No ref by this name (after trying every lookup candidate).
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// A tag with this name already exists.
    #[error("ref already exists: {name}")]
    AlreadyExists { name: String },

    /// A tag ref cannot be moved once written.
    #[error("tag is immutable: {name}")]
    TagImmutable { name: String },

    /// Writes need a fully qualified name such as `refs/heads/main`.
    #[error("not a fully qualified ref: {name}")]
    NotFullRef { name: String },

    /// `HEAD` was looked up before it was set.
    #[error("HEAD is not set")]
    HeadUnset,

    /// Cannot delete the branch HEAD points at.
    #[error("cannot delete current branch: {name}")]
    DeleteCurrentBranch { name: String },

    /// A `git show-ref` line could not be parsed.
    #[error("malformed show-ref output at line {line}: {reason}")]
    MalformedShowRef { line: usize, reason: String },

    /// A resolver lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// A name, hash, or composed value failed model validation.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Convenience type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
