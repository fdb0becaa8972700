//! Contracts shared by every model type.
//!
//! - [`Validate`] checks a value against its invariants.
//! - [`Redact`] renders a value for logs with sensitive parts masked.
//! - [`Model`] ties both to serde so [`crate::codec`] can encode and decode
//!   any model type with a uniform error shape.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::{CommitRange, CommitRangeSpec, Hash, Ref, RefKind, RefName, Tag, TagName};

/// A value with checkable invariants.
pub trait Validate {
    /// Returns `Ok(())` if every invariant holds.
    fn validate(&self) -> Result<()>;

    /// Shorthand for `self.validate().is_ok()`.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A value that can be rendered safely into logs.
pub trait Redact {
    /// Log-safe rendering. Ref names are not secret, so most model types
    /// return their plain display form.
    fn redacted(&self) -> String;
}

/// A serializable model type.
///
/// Implementors validate inside `Serialize` before emitting anything and
/// inside `Deserialize` before returning a value.
pub trait Model: Validate + Redact + Serialize + DeserializeOwned {
    /// Type name used in codec error messages.
    const NAME: &'static str;
}

// Every model type is a plain immutable value that can cross threads.
const _: () = {
    const fn assert_model<T: Model + Clone + PartialEq + Send + Sync>() {}

    assert_model::<Hash>();
    assert_model::<RefName>();
    assert_model::<TagName>();
    assert_model::<RefKind>();
    assert_model::<CommitRangeSpec>();
    assert_model::<Ref>();
    assert_model::<CommitRange>();
    assert_model::<Tag>();
};
