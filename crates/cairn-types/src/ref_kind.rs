use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::hash::Hash;
use crate::ref_name::RefName;
use crate::traits::{Model, Redact, Validate};

/// Names that classify as [`RefKind::Head`].
pub const HEAD_NAMES: &[&str] = &["HEAD", "FETCH_HEAD", "ORIG_HEAD", "MERGE_HEAD"];

/// Coarse classification of a reference by namespace or shape.
///
/// Encoded on the wire by canonical name (`"remote-branch"`), never by its
/// numeric tag, so new kinds can be added without renumbering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RefKind {
    /// Not (yet) classified: short names, abbreviated hashes, expressions.
    #[default]
    Unknown = 0,
    /// Local branch under `refs/heads/`.
    Branch = 1,
    /// Remote-tracking branch under `refs/remotes/`.
    RemoteBranch = 2,
    /// Tag under `refs/tags/`.
    Tag = 3,
    /// `HEAD` or one of its siblings (`FETCH_HEAD`, `ORIG_HEAD`, `MERGE_HEAD`).
    Head = 4,
    /// A full 40- or 64-character lowercase hex object id.
    Hash = 5,
}

impl RefKind {
    /// Every defined kind, in numeric order.
    pub const ALL: [RefKind; 6] = [
        Self::Unknown,
        Self::Branch,
        Self::RemoteBranch,
        Self::Tag,
        Self::Head,
        Self::Hash,
    ];

    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Branch => "branch",
            Self::RemoteBranch => "remote-branch",
            Self::Tag => "tag",
            Self::Head => "head",
            Self::Hash => "hash",
        }
    }

    /// Numeric tag.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a kind name, case-insensitively and ignoring surrounding
    /// whitespace. `remote_branch` and `remotebranch` are accepted for
    /// `remote-branch`.
    ///
    /// Unmatched input is an error; callers wanting the zero kind on failure
    /// use `unwrap_or_default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn_types::RefKind;
    ///
    /// assert_eq!(RefKind::parse(" REMOTE_BRANCH ").unwrap(), RefKind::RemoteBranch);
    /// assert_eq!(RefKind::parse("").unwrap_or_default(), RefKind::Unknown);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "unknown" => Ok(Self::Unknown),
            "branch" => Ok(Self::Branch),
            "remote-branch" | "remote_branch" | "remotebranch" => Ok(Self::RemoteBranch),
            "tag" => Ok(Self::Tag),
            "head" => Ok(Self::Head),
            "hash" => Ok(Self::Hash),
            _ => Err(invalid_kind(s.to_string())),
        }
    }

    /// Classify a ref name by its structure alone.
    ///
    /// First match wins:
    ///
    /// 1. zero name → `Unknown`
    /// 2. `HEAD`, `FETCH_HEAD`, `ORIG_HEAD`, `MERGE_HEAD` → `Head`
    /// 3. `refs/heads/` → `Branch`, `refs/remotes/` → `RemoteBranch`,
    ///    `refs/tags/` → `Tag`
    /// 4. full lowercase SHA-1/SHA-256 hex → `Hash`
    /// 5. anything else → `Unknown`
    ///
    /// Short names like `main` stay `Unknown`: without a repository there is
    /// no telling a branch from a tag.
    pub fn classify(name: &RefName) -> Self {
        let s = name.as_str();
        if s.is_empty() {
            Self::Unknown
        } else if HEAD_NAMES.contains(&s) {
            Self::Head
        } else if s.starts_with("refs/heads/") {
            Self::Branch
        } else if s.starts_with("refs/remotes/") {
            Self::RemoteBranch
        } else if s.starts_with("refs/tags/") {
            Self::Tag
        } else if Hash::is_full_hex(s) {
            Self::Hash
        } else {
            Self::Unknown
        }
    }
}

fn invalid_kind(value: String) -> ModelError {
    ModelError::InvalidRefKind {
        value,
        expected: RefKind::ALL.map(RefKind::as_str).join(", "),
    }
}

impl TryFrom<u8> for RefKind {
    type Error = ModelError;

    /// Out-of-range tags are rejected; their diagnostic form `RefKind(<n>)`
    /// is not itself a parseable name.
    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_u8() == value)
            .ok_or_else(|| invalid_kind(format!("RefKind({value})")))
    }
}

impl Validate for RefKind {
    fn validate(&self) -> Result<()> {
        // A `RefKind` value can only hold a defined variant; foreign numeric
        // tags are stopped at `TryFrom<u8>`.
        Ok(())
    }
}

impl Redact for RefKind {
    fn redacted(&self) -> String {
        self.as_str().to_string()
    }
}

impl Model for RefKind {
    const NAME: &'static str = "RefKind";
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RefKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for RefKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RefKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
