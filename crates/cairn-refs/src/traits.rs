//! The [`RefResolver`] trait: the seam between the symbolic model and
//! whatever can answer "which commit does this name mean?".
//!
//! A Git-backed implementation lives with the binary that owns the
//! repository handle; [`crate::InMemoryResolver`] answers from tables.

use cairn_types::{CommitRange, CommitRangeSpec, Ref, RefName, Tag, TagName, Validate};
use tracing::debug;

use crate::error::{ResolveError, Result};

/// Turns symbolic names into concrete refs.
///
/// Implementations must be thread-safe (`Send + Sync`); resolution is a
/// read-only operation.
pub trait RefResolver: Send + Sync {
    /// Resolve a single non-zero name to the commit it currently names.
    fn resolve(&self, name: &RefName) -> Result<Ref>;

    /// Look up a tag by name, including its peeled commit.
    fn resolve_tag(&self, name: &TagName) -> Result<Tag> {
        Err(ResolveError::NotFound {
            name: name.ref_path(),
        })
    }

    /// Resolve both bounds of a range spec.
    ///
    /// A zero `from` resolves to the zero [`Ref`] ("from the beginning")
    /// without consulting the resolver.
    fn resolve_range(&self, spec: &CommitRangeSpec) -> Result<CommitRange> {
        spec.validate()?;
        let from = if spec.from.is_zero() {
            Ref::default()
        } else {
            self.resolve(&spec.from)?
        };
        let to = self.resolve(&spec.to)?;
        let range = CommitRange::new(from, to)?;
        debug!(%spec, %range, "resolved commit range");
        Ok(range)
    }
}
