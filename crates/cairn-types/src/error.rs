//! Error types for the reference and range model.

use thiserror::Error;

use crate::codec::Format;

/// Errors produced while validating, constructing, or (de)serializing model
/// values.
///
/// Structural failures (`Invalid*`) name the offending value and the rule it
/// broke. Composition failures (`EmptyRange`, `MissingField`,
/// `LightweightMessage`, `MessageTooLarge`) are only reported once every
/// component has passed its own structural checks.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A ref name failed structural validation.
    #[error("invalid ref name {value:?}: {reason}")]
    InvalidRefName { value: String, reason: String },

    /// A tag name failed structural validation.
    #[error("invalid tag name {value:?}: {reason}")]
    InvalidTagName { value: String, reason: String },

    /// A hash is not a full lowercase SHA-1 or SHA-256 hex string.
    #[error("invalid hash {value:?}: {reason}")]
    InvalidHash { value: String, reason: String },

    /// A ref kind name or numeric tag is not one of the defined kinds.
    #[error("invalid ref kind {value:?}: expected one of {expected}")]
    InvalidRefKind { value: String, expected: String },

    /// A `from..to` string could not be split into two bounds.
    #[error("invalid range syntax {value:?}: {reason}")]
    InvalidRangeSyntax { value: String, reason: String },

    /// The all-empty commit range spec.
    #[error("commit range spec is empty: a `to` ref is required")]
    EmptyRange,

    /// A required field is zero.
    #[error("{ty} `{field}` is required")]
    MissingField {
        ty: &'static str,
        field: &'static str,
    },

    /// A field is present but failed its own validation.
    #[error("{ty} `{field}` is invalid: {source}")]
    InvalidField {
        ty: &'static str,
        field: &'static str,
        #[source]
        source: Box<ModelError>,
    },

    /// A lightweight tag was given a message.
    #[error("lightweight tag {name:?} must not carry a message")]
    LightweightMessage { name: String },

    /// An annotated tag message is over the size ceiling.
    #[error("tag {name:?} message is {size} bytes, exceeding the {max}-byte limit")]
    MessageTooLarge {
        name: String,
        size: usize,
        max: usize,
    },

    /// A value could not be encoded (including failing validation first).
    #[error("failed to encode {ty} as {format}: {reason}")]
    Encode {
        ty: &'static str,
        format: Format,
        reason: String,
    },

    /// Input could not be decoded into a valid value.
    #[error("failed to decode {ty} from {format}: {reason}")]
    Decode {
        ty: &'static str,
        format: Format,
        reason: String,
    },
}

impl ModelError {
    /// Wrap `self` as the failure of `field` on `ty`.
    pub(crate) fn in_field(self, ty: &'static str, field: &'static str) -> Self {
        Self::InvalidField {
            ty,
            field,
            source: Box::new(self),
        }
    }
}

/// Convenience type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
