//! Ref resolution for cairn.
//!
//! This crate turns the symbolic side of the model ([`RefName`],
//! [`CommitRangeSpec`]) into the resolved side ([`Ref`], [`CommitRange`]).
//!
//! # Modules
//!
//! - [`error`] — [`ResolveError`] and the crate `Result`
//! - [`traits`] — The [`RefResolver`] trait
//! - [`types`] — [`Head`] state
//! - [`memory`] — In-memory [`InMemoryResolver`] for tests
//! - [`show_ref`] — Loading an [`InMemoryResolver`] from `git show-ref` output
//!
//! [`RefName`]: cairn_types::RefName
//! [`CommitRangeSpec`]: cairn_types::CommitRangeSpec
//! [`Ref`]: cairn_types::Ref
//! [`CommitRange`]: cairn_types::CommitRange

pub mod error;
pub mod memory;
pub mod show_ref;
pub mod traits;
pub mod types;

pub use error::{ResolveError, Result};
pub use memory::InMemoryResolver;
pub use traits::RefResolver;
pub use types::Head;
