//! Reference and commit-range data model for cairn.
//!
//! Users name commits symbolically (`main`, `v1.2.0`, `HEAD~3`,
//! `main@{upstream}`). This crate validates and classifies those names and
//! keeps two independently valid shapes for a range of history: the
//! symbolic [`CommitRangeSpec`] the user asked for, and the resolved
//! [`CommitRange`] a resolver produces by binding each name to a [`Hash`].
//!
//! # Key Types
//!
//! - [`Hash`] — Git object id (SHA-1 or SHA-256, lowercase hex)
//! - [`RefName`] — Symbolic reference or revision expression
//! - [`TagName`] — Tag identifier with its own, stricter charset
//! - [`RefKind`] — Coarse classification of a reference
//! - [`CommitRangeSpec`] — Unresolved `from..to` range
//! - [`Ref`] / [`CommitRange`] — Resolved reference and range
//! - [`Tag`] — Lightweight or annotated tag
//!
//! Every type validates before it is encoded and after it is decoded; see
//! [`codec`] for the JSON and YAML entry points.

pub mod codec;
pub mod error;
pub mod hash;
pub mod range;
pub mod ref_kind;
pub mod ref_name;
pub mod resolved;
pub mod tag;
pub mod traits;

pub use codec::Format;
pub use error::{ModelError, Result};
pub use hash::{Hash, HashAlgorithm};
pub use range::CommitRangeSpec;
pub use ref_kind::RefKind;
pub use ref_name::RefName;
pub use resolved::{CommitRange, Ref};
pub use tag::{Tag, TagName, MAX_TAG_MESSAGE_BYTES};
pub use traits::{Model, Redact, Validate};
