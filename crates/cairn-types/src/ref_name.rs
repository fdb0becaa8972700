//! Symbolic reference names.
//!
//! A [`RefName`] holds anything a user may type where Git expects a
//! revision: a short branch name (`main`), a full ref (`refs/tags/v1.0.0`),
//! `HEAD`, or a revision expression (`HEAD~3`, `main^2`,
//! `main@{upstream}`). Validation is deliberately looser than
//! `git check-ref-format`; it only enforces:
//!
//! - no leading or trailing whitespace
//! - 1 to 256 characters
//! - characters from `[a-zA-Z0-9._/@{}^~:-]`
//! - no control or non-ASCII characters

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::ref_kind::RefKind;
use crate::traits::{Model, Redact, Validate};

/// Maximum length of a ref name, in characters.
pub const MAX_REF_NAME_LEN: usize = 256;

static REF_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._/@{}^~:-]+$").expect("static ref name pattern must compile")
});

fn is_ref_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "._/@{}^~:-".contains(ch)
}

/// Namespace prefixes stripped by [`RefName::short_name`].
const NAMESPACE_PREFIXES: &[&str] = &["refs/heads/", "refs/remotes/", "refs/tags/"];

/// A symbolic Git reference or revision expression.
///
/// The zero value (empty string) means "no ref specified" and always
/// validates. Equality is exact and case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    /// Create a ref name from `value` exactly as given.
    ///
    /// Unlike [`RefName::parse`], surrounding whitespace is an error here.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let name = Self(value.into());
        name.validate()?;
        Ok(name)
    }

    /// Trim `s` and validate it.
    ///
    /// Input that is empty after trimming yields the zero value without an
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn_types::RefName;
    ///
    /// assert_eq!(RefName::parse("  main ").unwrap().as_str(), "main");
    /// assert!(RefName::parse("").unwrap().is_zero());
    /// assert!(RefName::parse("HEAD~3").is_ok());
    /// assert!(RefName::parse("bad name").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        Self::new(s.trim())
    }

    /// The `HEAD` ref.
    pub fn head() -> Self {
        Self("HEAD".into())
    }

    /// Returns `true` for the zero value.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Structural classification of this name. See [`RefKind::classify`].
    pub fn kind(&self) -> RefKind {
        RefKind::classify(self)
    }

    /// The name without a `refs/heads/`, `refs/remotes/`, or `refs/tags/`
    /// prefix.
    pub fn short_name(&self) -> &str {
        NAMESPACE_PREFIXES
            .iter()
            .find_map(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }

    fn invalid(&self, reason: impl Into<String>) -> ModelError {
        ModelError::InvalidRefName {
            value: self.0.clone(),
            reason: reason.into(),
        }
    }
}

impl Validate for RefName {
    fn validate(&self) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }

        if self.0.trim() != self.0 {
            return Err(self.invalid("must not have leading or trailing whitespace"));
        }

        let len = self.0.chars().count();
        if !(1..=MAX_REF_NAME_LEN).contains(&len) {
            return Err(self.invalid(format!(
                "length {len} is outside 1..={MAX_REF_NAME_LEN} characters"
            )));
        }

        if !REF_NAME_PATTERN.is_match(&self.0) {
            let reason = match self.0.char_indices().find(|(_, ch)| !is_ref_name_char(*ch)) {
                Some((pos, ch)) => {
                    format!("character {ch:?} at byte {pos} is not allowed in a ref name")
                }
                None => "does not match the ref name pattern".to_string(),
            };
            return Err(self.invalid(reason));
        }

        // The pattern already excludes these; this pass names the exact
        // offending code point.
        for ch in self.0.chars() {
            if ch.is_control() {
                return Err(self.invalid(format!(
                    "contains control character U+{:04X}",
                    ch as u32
                )));
            }
            if !ch.is_ascii() {
                return Err(self.invalid(format!(
                    "contains non-ASCII character U+{:04X}",
                    ch as u32
                )));
            }
        }

        Ok(())
    }
}

impl Redact for RefName {
    fn redacted(&self) -> String {
        self.0.clone()
    }
}

impl Model for RefName {
    const NAME: &'static str = "RefName";
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RefName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for RefName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RefName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
