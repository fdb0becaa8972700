//! The symbolic commit range a user asks for.
//!
//! A [`CommitRangeSpec`] is Git's `from..to` in unresolved form: commits
//! reachable from `to` but not from `from`. An empty `from` means "from the
//! start of history". Resolution into hashes happens elsewhere and yields a
//! [`crate::CommitRange`].

use std::fmt;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::ref_name::RefName;
use crate::traits::{Model, Redact, Validate};

const TY: &str = "commit range spec";

/// Placeholder shown for a missing `to` bound.
const EMPTY_TOKEN: &str = "(empty)";

/// A symbolic `from..to` commit range.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CommitRangeSpec {
    /// Exclusive lower bound. Zero means the beginning of history.
    pub from: RefName,
    /// Inclusive upper bound. Required.
    pub to: RefName,
}

impl CommitRangeSpec {
    /// Build and validate a range from already-parsed bounds.
    pub fn new(from: RefName, to: RefName) -> Result<Self> {
        let spec = Self { from, to };
        spec.validate()?;
        Ok(spec)
    }

    /// Parse both bounds from raw strings and validate the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn_types::CommitRangeSpec;
    ///
    /// let spec = CommitRangeSpec::parse("v1.0.0", "v2.0.0").unwrap();
    /// assert_eq!(spec.to_string(), "v1.0.0..v2.0.0");
    ///
    /// assert!(CommitRangeSpec::parse("v1.0.0", "").is_err());
    /// ```
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = RefName::parse(from).map_err(|e| e.in_field(TY, "from"))?;
        let to = RefName::parse(to).map_err(|e| e.in_field(TY, "to"))?;
        Self::new(from, to)
    }

    /// A range covering all history up to `to`.
    pub fn up_to(to: RefName) -> Result<Self> {
        Self::new(RefName::default(), to)
    }

    /// Returns `true` when the range starts at the beginning of history.
    pub fn from_beginning(&self) -> bool {
        self.from.is_zero()
    }

    /// Returns `true` for the all-empty value.
    pub fn is_zero(&self) -> bool {
        self.from.is_zero() && self.to.is_zero()
    }

    fn render(&self, bound: impl Fn(&RefName) -> String) -> String {
        let to = if self.to.is_zero() {
            EMPTY_TOKEN.to_string()
        } else {
            bound(&self.to)
        };
        format!("{}..{to}", bound(&self.from))
    }
}

impl Validate for CommitRangeSpec {
    fn validate(&self) -> Result<()> {
        if self.is_zero() {
            return Err(ModelError::EmptyRange);
        }
        if self.to.is_zero() {
            return Err(ModelError::MissingField { ty: TY, field: "to" });
        }
        self.from.validate().map_err(|e| e.in_field(TY, "from"))?;
        self.to.validate().map_err(|e| e.in_field(TY, "to"))?;
        Ok(())
    }
}

impl Redact for CommitRangeSpec {
    fn redacted(&self) -> String {
        self.render(|bound| bound.redacted())
    }
}

impl Model for CommitRangeSpec {
    const NAME: &'static str = "CommitRangeSpec";
}

/// Debug/log rendering, not a Git argument: a missing `to` shows as
/// `(empty)`, a missing `from` as nothing (`..HEAD`).
impl fmt::Display for CommitRangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|bound| bound.to_string()))
    }
}

/// Parses `from..to`. A three-dot symmetric difference is rejected.
impl std::str::FromStr for CommitRangeSpec {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = |reason: &str| ModelError::InvalidRangeSyntax {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let (from, to) = s
            .split_once("..")
            .ok_or_else(|| invalid("expected `<from>..<to>`"))?;
        if to.starts_with('.') {
            return Err(invalid("symmetric difference `...` is not supported"));
        }
        Self::parse(from, to)
    }
}

#[derive(Serialize, Deserialize)]
struct CommitRangeSpecWire {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

impl Serialize for CommitRangeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(ser::Error::custom)?;
        CommitRangeSpecWire {
            from: self.from.as_str().to_string(),
            to: self.to.as_str().to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CommitRangeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = CommitRangeSpecWire::deserialize(deserializer)?;
        Self::parse(&wire.from, &wire.to).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> RefName {
        RefName::parse(s).unwrap()
    }

    #[test]
    fn zero_value_is_invalid() {
        assert_eq!(
            CommitRangeSpec::default().validate().unwrap_err(),
            ModelError::EmptyRange
        );
    }

    #[test]
    fn from_may_be_empty() {
        let spec = CommitRangeSpec {
            from: RefName::default(),
            to: name("HEAD"),
        };
        assert!(spec.validate().is_ok());
        assert!(spec.from_beginning());
        assert_eq!(spec.to_string(), "..HEAD");
    }

    #[test]
    fn to_is_required() {
        let spec = CommitRangeSpec {
            from: name("v1.0.0"),
            to: RefName::default(),
        };
        assert_eq!(
            spec.validate().unwrap_err(),
            ModelError::MissingField { ty: TY, field: "to" }
        );
        assert_eq!(spec.to_string(), "v1.0.0..(empty)");
    }

    #[test]
    fn parse_builds_valid_range() {
        let spec = CommitRangeSpec::parse("v1.0.0", "v2.0.0").unwrap();
        assert_eq!(spec.from.as_str(), "v1.0.0");
        assert_eq!(spec.to.as_str(), "v2.0.0");
        assert_eq!(spec.to_string(), "v1.0.0..v2.0.0");
        assert_eq!(spec.redacted(), "v1.0.0..v2.0.0");
    }

    #[test]
    fn parse_wraps_malformed_bound() {
        let err = CommitRangeSpec::parse("bad name", "HEAD").unwrap_err();
        match err {
            ModelError::InvalidField { field, source, .. } => {
                assert_eq!(field, "from");
                assert!(matches!(*source, ModelError::InvalidRefName { .. }));
            }
            other => panic!("expected InvalidField, got: {other}"),
        }

        let err = CommitRangeSpec::parse("", "HEAD*").unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { field: "to", .. }));
    }

    #[test]
    fn from_str_splits_two_dot_syntax() {
        let spec: CommitRangeSpec = "v1.0.0..HEAD~2".parse().unwrap();
        assert_eq!(spec.from.as_str(), "v1.0.0");
        assert_eq!(spec.to.as_str(), "HEAD~2");

        let open: CommitRangeSpec = "..main".parse().unwrap();
        assert!(open.from_beginning());
    }

    #[test]
    fn from_str_rejects_bad_syntax() {
        assert!(matches!(
            "main".parse::<CommitRangeSpec>().unwrap_err(),
            ModelError::InvalidRangeSyntax { .. }
        ));
        assert!(matches!(
            "main...dev".parse::<CommitRangeSpec>().unwrap_err(),
            ModelError::InvalidRangeSyntax { .. }
        ));
        assert!(matches!(
            "v1..".parse::<CommitRangeSpec>().unwrap_err(),
            ModelError::MissingField { field: "to", .. }
        ));
    }

    #[test]
    fn json_shape_and_roundtrip() {
        let spec = CommitRangeSpec::parse("v1.0.0", "v2.0.0").unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"from":"v1.0.0","to":"v2.0.0"}"#);
        let back: CommitRangeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn serialize_fails_closed() {
        let err = serde_json::to_string(&CommitRangeSpec::default()).unwrap_err();
        assert!(err.to_string().contains("empty"), "got: {err}");
    }

    #[test]
    fn deserialize_validates_after_decoding() {
        assert!(serde_json::from_str::<CommitRangeSpec>(r#"{"from":"v1","to":""}"#).is_err());
        assert!(serde_json::from_str::<CommitRangeSpec>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<CommitRangeSpec>(r#"{"to":"bad name"}"#).is_err());

        let spec: CommitRangeSpec = serde_json::from_str(r#"{"to":" HEAD "}"#).unwrap();
        assert_eq!(spec.to.as_str(), "HEAD");
        assert!(spec.from_beginning());
    }
}
