//! Tag names and tags.
//!
//! Tags are the release anchors of a changelog: a [`Tag`] binds a
//! [`TagName`] to the object its ref points at and to the commit that object
//! peels to. Lightweight tags point straight at a commit and never carry a
//! message; annotated tags point at a tag object and may carry up to
//! [`MAX_TAG_MESSAGE_BYTES`] of message.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::hash::Hash;
use crate::traits::{Model, Redact, Validate};

/// Maximum length of a tag name, in characters.
pub const MAX_TAG_NAME_LEN: usize = 256;

/// Maximum size of an annotated tag message, in bytes (64 KiB).
pub const MAX_TAG_MESSAGE_BYTES: usize = 64 * 1024;

static TAG_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._/+-]+$").expect("static tag name pattern must compile")
});

/// A tag identifier such as `v1.2.0`, `release/2024-06`, or
/// `v2.0.0-rc.1+build.5`.
///
/// The zero value (empty string) always validates. Validation never trims:
/// a stored name with surrounding whitespace is invalid. Use
/// [`TagName::parse`] for raw input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name from `value` exactly as given.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let name = Self(value.into());
        name.validate()?;
        Ok(name)
    }

    /// Trim `s` and validate it. Blank input yields the zero value.
    pub fn parse(s: &str) -> Result<Self> {
        Self::new(s.trim())
    }

    /// Returns `true` for the zero value.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fully qualified ref for this tag (`refs/tags/<name>`).
    pub fn ref_path(&self) -> String {
        format!("refs/tags/{}", self.0)
    }

    fn invalid(&self, reason: impl Into<String>) -> ModelError {
        ModelError::InvalidTagName {
            value: self.0.clone(),
            reason: reason.into(),
        }
    }
}

impl Validate for TagName {
    fn validate(&self) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }
        if self.0.trim() != self.0 {
            return Err(self.invalid("must not have leading or trailing whitespace"));
        }
        let len = self.0.chars().count();
        if !(1..=MAX_TAG_NAME_LEN).contains(&len) {
            return Err(self.invalid(format!(
                "length {len} is outside 1..={MAX_TAG_NAME_LEN} characters"
            )));
        }
        if !TAG_NAME_PATTERN.is_match(&self.0) {
            return Err(self.invalid("may only contain letters, digits, and . _ / + -"));
        }
        for ch in self.0.chars() {
            if ch.is_control() || !ch.is_ascii() {
                return Err(self.invalid(format!("contains disallowed character U+{:04X}", ch as u32)));
            }
        }
        Ok(())
    }
}

impl Redact for TagName {
    fn redacted(&self) -> String {
        self.0.clone()
    }
}

impl Model for TagName {
    const NAME: &'static str = "TagName";
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TagName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for TagName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TagName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// A tag and the objects it reaches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Tag name (e.g. "v1.0.0").
    pub name: TagName,
    /// What `refs/tags/<name>` points at: the tag object for annotated tags,
    /// the commit for lightweight ones.
    pub object: Hash,
    /// The commit the tag peels to.
    pub commit: Hash,
    /// Whether a tag object exists.
    pub annotated: bool,
    /// Annotated tag message. Always empty for lightweight tags.
    pub message: String,
}

impl Tag {
    /// Build and validate a tag.
    pub fn new(
        name: TagName,
        object: Hash,
        commit: Hash,
        annotated: bool,
        message: impl Into<String>,
    ) -> Result<Self> {
        let tag = Self {
            name,
            object,
            commit,
            annotated,
            message: message.into(),
        };
        tag.validate()?;
        Ok(tag)
    }

    /// A lightweight tag pointing straight at `commit`.
    pub fn lightweight(name: TagName, commit: Hash) -> Result<Self> {
        Self::new(name, commit.clone(), commit, false, String::new())
    }

    /// An annotated tag whose tag object `object` peels to `commit`.
    pub fn annotated(
        name: TagName,
        object: Hash,
        commit: Hash,
        message: impl Into<String>,
    ) -> Result<Self> {
        Self::new(name, object, commit, true, message)
    }
}

fn check_required_hash(hash: &Hash, field: &'static str) -> Result<()> {
    if hash.is_zero() {
        return Err(ModelError::MissingField { ty: "tag", field });
    }
    hash.validate().map_err(|e| e.in_field("tag", field))
}

impl Validate for Tag {
    fn validate(&self) -> Result<()> {
        if self.name.is_zero() {
            return Err(ModelError::MissingField {
                ty: "tag",
                field: "name",
            });
        }
        self.name.validate().map_err(|e| e.in_field("tag", "name"))?;
        check_required_hash(&self.object, "object")?;
        check_required_hash(&self.commit, "commit")?;

        if !self.annotated && !self.message.is_empty() {
            return Err(ModelError::LightweightMessage {
                name: self.name.to_string(),
            });
        }
        if self.annotated && self.message.len() > MAX_TAG_MESSAGE_BYTES {
            return Err(ModelError::MessageTooLarge {
                name: self.name.to_string(),
                size: self.message.len(),
                max: MAX_TAG_MESSAGE_BYTES,
            });
        }
        Ok(())
    }
}

impl Redact for Tag {
    fn redacted(&self) -> String {
        self.to_string()
    }
}

impl Model for Tag {
    const NAME: &'static str = "Tag";
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tag{{Name:{} Object:{} Commit:{} Annotated:{}}}",
            self.name,
            self.object.short(),
            self.commit.short(),
            self.annotated
        )
    }
}

#[derive(Serialize, Deserialize)]
struct TagWire {
    name: String,
    object: String,
    commit: String,
    #[serde(default)]
    annotated: bool,
    #[serde(default)]
    message: String,
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        TagWire {
            name: self.name.as_str().to_string(),
            object: self.object.as_str().to_string(),
            commit: self.commit.as_str().to_string(),
            annotated: self.annotated,
            message: self.message.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = TagWire::deserialize(deserializer)?;
        let decoded = || -> Result<Tag> {
            Tag::new(
                TagName::parse(&wire.name).map_err(|e| e.in_field("tag", "name"))?,
                Hash::parse(&wire.object).map_err(|e| e.in_field("tag", "object"))?,
                Hash::parse(&wire.commit).map_err(|e| e.in_field("tag", "commit"))?,
                wire.annotated,
                wire.message.clone(),
            )
        };
        decoded().map_err(de::Error::custom)
    }
}
