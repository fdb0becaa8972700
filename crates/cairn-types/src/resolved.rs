//! Resolved references and ranges.
//!
//! A resolver turns each [`RefName`] of a [`CommitRangeSpec`] into a [`Ref`]
//! carrying the concrete [`Hash`] it named at resolution time, producing a
//! [`CommitRange`].

use std::fmt;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::hash::Hash;
use crate::range::CommitRangeSpec;
use crate::ref_kind::RefKind;
use crate::ref_name::RefName;
use crate::traits::{Model, Redact, Validate};

/// A ref name bound to the hash it resolved to.
///
/// The zero value means "no ref" and is valid on its own; a non-zero `Ref`
/// needs both a name and a hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ref {
    /// The name as the user or config wrote it.
    pub name: RefName,
    /// The commit it resolved to.
    pub hash: Hash,
    /// How the resolver classified it.
    pub kind: RefKind,
}

impl Ref {
    /// Build and validate a resolved ref.
    pub fn new(name: RefName, hash: Hash, kind: RefKind) -> Result<Self> {
        let r = Self { name, hash, kind };
        r.validate()?;
        Ok(r)
    }

    /// A ref for a bare hash, named by the hash itself.
    pub fn from_hash(hash: Hash) -> Result<Self> {
        let name = RefName::new(hash.as_str())?;
        Self::new(name, hash, RefKind::Hash)
    }

    /// Returns `true` for the zero value.
    pub fn is_zero(&self) -> bool {
        self.name.is_zero() && self.hash.is_zero() && self.kind == RefKind::Unknown
    }
}

impl Validate for Ref {
    fn validate(&self) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }
        if self.name.is_zero() {
            return Err(ModelError::MissingField { ty: "ref", field: "name" });
        }
        self.name.validate().map_err(|e| e.in_field("ref", "name"))?;
        if self.hash.is_zero() {
            return Err(ModelError::MissingField { ty: "ref", field: "hash" });
        }
        self.hash.validate().map_err(|e| e.in_field("ref", "hash"))?;
        self.kind.validate()
    }
}

impl Redact for Ref {
    fn redacted(&self) -> String {
        if self.is_zero() {
            return String::new();
        }
        format!("{}@{}", self.name.redacted(), self.hash.short())
    }
}

impl Model for Ref {
    const NAME: &'static str = "Ref";
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return Ok(());
        }
        write!(f, "{}@{}", self.name, self.hash.short())
    }
}

#[derive(Serialize, Deserialize)]
struct RefWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    kind: RefKind,
}

impl Serialize for Ref {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        RefWire {
            name: self.name.as_str().to_string(),
            hash: self.hash.as_str().to_string(),
            kind: self.kind,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ref {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = RefWire::deserialize(deserializer)?;
        let decoded = || -> Result<Ref> {
            let r = Ref {
                name: RefName::parse(&wire.name).map_err(|e| e.in_field("ref", "name"))?,
                hash: Hash::parse(&wire.hash).map_err(|e| e.in_field("ref", "hash"))?,
                kind: wire.kind,
            };
            r.validate()?;
            Ok(r)
        };
        decoded().map_err(de::Error::custom)
    }
}

/// A resolved `from..to` range.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommitRange {
    /// Exclusive lower bound. Zero means the beginning of history.
    pub from: Ref,
    /// Inclusive upper bound. Never zero.
    pub to: Ref,
}

impl CommitRange {
    /// Build and validate a resolved range.
    pub fn new(from: Ref, to: Ref) -> Result<Self> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    /// Returns `true` when the range starts at the beginning of history.
    pub fn from_beginning(&self) -> bool {
        self.from.is_zero()
    }

    /// The symbolic range these refs were resolved from.
    pub fn spec(&self) -> CommitRangeSpec {
        CommitRangeSpec {
            from: self.from.name.clone(),
            to: self.to.name.clone(),
        }
    }

    /// Revision-range argument for `git log` and friends:
    /// `<from>..<to>` by hash, or just `<to>` from the beginning.
    pub fn rev_range(&self) -> String {
        if self.from_beginning() {
            self.to.hash.to_string()
        } else {
            format!("{}..{}", self.from.hash, self.to.hash)
        }
    }
}

impl Validate for CommitRange {
    fn validate(&self) -> Result<()> {
        self.from
            .validate()
            .map_err(|e| e.in_field("commit range", "from"))?;
        if self.to.is_zero() {
            return Err(ModelError::MissingField {
                ty: "commit range",
                field: "to",
            });
        }
        self.to
            .validate()
            .map_err(|e| e.in_field("commit range", "to"))
    }
}

impl Redact for CommitRange {
    fn redacted(&self) -> String {
        format!("{}..{}", self.from.redacted(), self.to.redacted())
    }
}

impl Model for CommitRange {
    const NAME: &'static str = "CommitRange";
}

impl fmt::Display for CommitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

#[derive(Serialize, Deserialize)]
struct CommitRangeWire {
    #[serde(default)]
    from: Ref,
    to: Ref,
}

impl Serialize for CommitRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        CommitRangeWire {
            from: self.from.clone(),
            to: self.to.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CommitRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = CommitRangeWire::deserialize(deserializer)?;
        Self::new(wire.from, wire.to).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(fill: char) -> Hash {
        Hash::new(fill.to_string().repeat(40)).unwrap()
    }

    fn resolved(name: &str, fill: char, kind: RefKind) -> Ref {
        Ref::new(RefName::parse(name).unwrap(), hash(fill), kind).unwrap()
    }

    #[test]
    fn zero_ref_is_valid() {
        assert!(Ref::default().is_zero());
        assert!(Ref::default().validate().is_ok());
        assert_eq!(Ref::default().to_string(), "");
    }

    #[test]
    fn ref_requires_name_and_hash() {
        let no_hash = Ref {
            name: RefName::parse("main").unwrap(),
            ..Ref::default()
        };
        assert_eq!(
            no_hash.validate().unwrap_err(),
            ModelError::MissingField { ty: "ref", field: "hash" }
        );

        let no_name = Ref {
            hash: hash('a'),
            kind: RefKind::Hash,
            ..Ref::default()
        };
        assert_eq!(
            no_name.validate().unwrap_err(),
            ModelError::MissingField { ty: "ref", field: "name" }
        );
    }

    #[test]
    fn ref_from_hash_names_itself() {
        let r = Ref::from_hash(hash('c')).unwrap();
        assert_eq!(r.name.as_str(), "c".repeat(40));
        assert_eq!(r.kind, RefKind::Hash);
    }

    #[test]
    fn ref_display() {
        let r = resolved("main", 'a', RefKind::Branch);
        assert_eq!(r.to_string(), "main@aaaaaaa");
    }

    #[test]
    fn range_requires_to() {
        let err = CommitRange::new(resolved("v1", 'a', RefKind::Tag), Ref::default()).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingField {
                ty: "commit range",
                field: "to"
            }
        );
    }

    #[test]
    fn range_from_beginning() {
        let range = CommitRange::new(Ref::default(), resolved("HEAD", 'b', RefKind::Head)).unwrap();
        assert!(range.from_beginning());
        assert_eq!(range.rev_range(), "b".repeat(40));
        assert_eq!(range.to_string(), "..HEAD@bbbbbbb");
        assert_eq!(range.spec().to_string(), "..HEAD");
    }

    #[test]
    fn range_rev_range_uses_hashes() {
        let range = CommitRange::new(
            resolved("v1.0.0", 'a', RefKind::Tag),
            resolved("v2.0.0", 'b', RefKind::Tag),
        )
        .unwrap();
        assert_eq!(range.rev_range(), format!("{}..{}", "a".repeat(40), "b".repeat(40)));
        assert_eq!(range.spec(), CommitRangeSpec::parse("v1.0.0", "v2.0.0").unwrap());
    }

    #[test]
    fn range_wraps_invalid_from() {
        let bad_from = Ref {
            name: RefName::parse("v1").unwrap(),
            ..Ref::default()
        };
        let err = CommitRange::new(bad_from, resolved("HEAD", 'b', RefKind::Head)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { field: "from", .. }));
    }

    #[test]
    fn serde_roundtrip() {
        let range = CommitRange::new(
            resolved("refs/tags/v1", 'a', RefKind::Tag),
            resolved("main", 'b', RefKind::Branch),
        )
        .unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert!(json.contains(r#""kind":"branch""#), "got: {json}");
        let back: CommitRange = serde_json::from_str(&json).unwrap();
        assert_eq!(range, back);
    }

    #[test]
    fn deserialize_zero_from() {
        let json = format!(r#"{{"to":{{"name":"HEAD","hash":"{}","kind":"head"}}}}"#, "d".repeat(40));
        let range: CommitRange = serde_json::from_str(&json).unwrap();
        assert!(range.from_beginning());
    }

    #[test]
    fn deserialize_rejects_zero_to() {
        let json = r#"{"from":{},"to":{}}"#;
        assert!(serde_json::from_str::<CommitRange>(json).is_err());
    }
}
