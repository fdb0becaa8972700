//! Loading an [`InMemoryResolver`] from `git show-ref --head -d` output.
//!
//! Each line is `<hash> <refname>`. `HEAD` detaches the resolver's HEAD at
//! that hash. A `refs/tags/<name>^{}` line gives the commit the preceding
//! annotated tag peels to.

use std::collections::BTreeMap;

use cairn_types::{Hash, RefName, Tag, TagName};
use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::memory::InMemoryResolver;

const PEEL_SUFFIX: &str = "^{}";

fn malformed(line: usize, reason: impl Into<String>) -> ResolveError {
    ResolveError::MalformedShowRef {
        line,
        reason: reason.into(),
    }
}

impl InMemoryResolver {
    /// Build a resolver from `git show-ref` output.
    ///
    /// Blank lines are skipped. Annotated tags become [`Tag`]s with an empty
    /// message (show-ref does not print messages).
    pub fn from_show_ref(text: &str) -> Result<Self> {
        let resolver = Self::new();
        let mut tag_objects: BTreeMap<TagName, Hash> = BTreeMap::new();
        let mut peeled: BTreeMap<TagName, (Hash, usize)> = BTreeMap::new();

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (hash, name) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| malformed(lineno, "expected `<hash> <refname>`"))?;
            let hash = Hash::parse(hash).map_err(|e| malformed(lineno, e.to_string()))?;
            let name = name.trim();

            if name == "HEAD" {
                resolver.set_head_detached(hash)?;
                continue;
            }
            if let Some(short) = name
                .strip_prefix("refs/tags/")
                .and_then(|rest| rest.strip_suffix(PEEL_SUFFIX))
            {
                let tag = TagName::parse(short).map_err(|e| malformed(lineno, e.to_string()))?;
                peeled.insert(tag, (hash, lineno));
                continue;
            }
            if let Some(short) = name.strip_prefix("refs/tags/") {
                let tag = TagName::parse(short).map_err(|e| malformed(lineno, e.to_string()))?;
                tag_objects.insert(tag, hash);
                continue;
            }

            let name = RefName::parse(name).map_err(|e| malformed(lineno, e.to_string()))?;
            resolver.write_ref(&name, hash)?;
        }

        for (name, object) in tag_objects {
            let tag = match peeled.remove(&name) {
                Some((commit, _)) => Tag::annotated(name, object, commit, String::new())?,
                None => Tag::lightweight(name, object)?,
            };
            resolver.add_tag(tag)?;
        }
        if let Some((orphan, &(_, line))) = peeled.iter().min_by_key(|(_, (_, line))| *line) {
            return Err(malformed(
                line,
                format!("peeled entry for {orphan} without its tag line"),
            ));
        }

        debug!(
            refs = resolver.list_refs("")?.len(),
            "loaded resolver from show-ref output"
        );
        Ok(resolver)
    }
}
