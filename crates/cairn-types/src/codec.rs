//! JSON and YAML entry points for model types.
//!
//! Encoding validates first and emits nothing for an invalid value. Decoding
//! only returns values that passed validation. Failures name the type and
//! the wire format.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::traits::Model;

/// Wire format of an encode/decode operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

fn encode_error<T: Model>(format: Format, reason: impl fmt::Display) -> ModelError {
    ModelError::Encode {
        ty: T::NAME,
        format,
        reason: reason.to_string(),
    }
}

fn decode_error<T: Model>(format: Format, reason: impl fmt::Display) -> ModelError {
    let reason = reason.to_string();
    debug!(ty = T::NAME, %format, %reason, "rejected input");
    ModelError::Decode {
        ty: T::NAME,
        format,
        reason,
    }
}

/// Encode `value` as compact JSON.
pub fn to_json<T: Model>(value: &T) -> Result<String> {
    value.validate()?;
    serde_json::to_string(value).map_err(|e| encode_error::<T>(Format::Json, e))
}

/// Encode `value` as pretty-printed JSON.
pub fn to_json_pretty<T: Model>(value: &T) -> Result<String> {
    value.validate()?;
    serde_json::to_string_pretty(value).map_err(|e| encode_error::<T>(Format::Json, e))
}

/// Decode and validate a value from JSON.
pub fn from_json<T: Model>(input: &str) -> Result<T> {
    serde_json::from_str(input).map_err(|e| decode_error::<T>(Format::Json, e))
}

/// Encode `value` as YAML.
pub fn to_yaml<T: Model>(value: &T) -> Result<String> {
    value.validate()?;
    serde_yaml::to_string(value).map_err(|e| encode_error::<T>(Format::Yaml, e))
}

/// Decode and validate a value from YAML.
pub fn from_yaml<T: Model>(input: &str) -> Result<T> {
    serde_yaml::from_str(input).map_err(|e| decode_error::<T>(Format::Yaml, e))
}

/// Encode in the given format.
pub fn encode<T: Model>(value: &T, format: Format) -> Result<String> {
    match format {
        Format::Json => to_json(value),
        Format::Yaml => to_yaml(value),
    }
}

/// Decode in the given format.
pub fn decode<T: Model>(input: &str, format: Format) -> Result<T> {
    match format {
        Format::Json => from_json(input),
        Format::Yaml => from_yaml(input),
    }
}
