use std::fmt;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::traits::{Model, Redact, Validate};

/// Hash function behind a [`Hash`], inferred from its length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// 20-byte object ids (40 hex characters).
    Sha1,
    /// 32-byte object ids (64 hex characters).
    Sha256,
}

impl HashAlgorithm {
    /// Length of a full object id in hex characters.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }

    fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "sha1"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// A full Git object id in lowercase hex.
///
/// The zero value (empty string) means "no hash" and always validates;
/// composite types decide whether they require a non-zero hash.
/// Abbreviated ids are rejected: only a resolver can expand them.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(String);

impl Hash {
    /// Characters shown by [`Hash::short`].
    pub const SHORT_LEN: usize = 7;

    /// Create a hash from an exact lowercase hex string. No normalization.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let hash = Self(value.into());
        hash.validate()?;
        Ok(hash)
    }

    /// Trim and lowercase `s`, then validate.
    ///
    /// Empty input yields the zero hash.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Self::new(trimmed.to_ascii_lowercase())
    }

    /// Returns `true` for the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form (first 7 hex characters).
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(Self::SHORT_LEN)]
    }

    /// The algorithm implied by the length, or `None` for the zero hash.
    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        HashAlgorithm::from_hex_len(self.0.len())
    }

    /// Decoded object id bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        hex::decode(&self.0).unwrap_or_default()
    }

    /// Returns `true` if `s` is exactly a full lowercase SHA-1 or SHA-256
    /// hex string.
    pub fn is_full_hex(s: &str) -> bool {
        HashAlgorithm::from_hex_len(s.len()).is_some()
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl Validate for Hash {
    fn validate(&self) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }
        let invalid = |reason: String| ModelError::InvalidHash {
            value: self.0.clone(),
            reason,
        };
        if HashAlgorithm::from_hex_len(self.0.len()).is_none() {
            return Err(invalid(format!(
                "expected 40 (sha1) or 64 (sha256) hex characters, got {}",
                self.0.chars().count()
            )));
        }
        if self.0.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(invalid("must be lowercase hex".into()));
        }
        hex::decode(&self.0).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }
}

impl Redact for Hash {
    fn redacted(&self) -> String {
        self.0.clone()
    }
}

impl Model for Hash {
    const NAME: &'static str = "Hash";
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Hash {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
