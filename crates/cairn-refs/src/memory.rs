//! In-memory ref resolver for testing and ephemeral use.
//!
//! [`InMemoryResolver`] keeps refs, tags, and HEAD in `HashMap`s behind
//! `RwLock`s. Name lookup follows Git's short-name rules: for `x` it tries
//! `x`, `refs/x`, `refs/tags/x`, `refs/heads/x`, `refs/remotes/x`, and
//! `refs/remotes/x/HEAD`, first hit wins. Revision expressions (`HEAD~1`,
//! `main@{upstream}`) are not evaluated here.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cairn_types::ref_kind::HEAD_NAMES;
use cairn_types::{Hash, ModelError, Ref, RefKind, RefName, Tag, TagName, Validate};
use tracing::{debug, warn};

use crate::error::{ResolveError, Result};
use crate::traits::RefResolver;
use crate::types::Head;

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| ResolveError::LockPoisoned(e.to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| ResolveError::LockPoisoned(e.to_string()))
}

/// Full ref names tried, in order, for a short name.
fn lookup_candidates(name: &str) -> [String; 6] {
    [
        name.to_string(),
        format!("refs/{name}"),
        format!("refs/tags/{name}"),
        format!("refs/heads/{name}"),
        format!("refs/remotes/{name}"),
        format!("refs/remotes/{name}/HEAD"),
    ]
}

/// An in-memory implementation of [`RefResolver`].
///
/// Data is lost when the resolver is dropped.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    refs: RwLock<HashMap<String, Hash>>,
    tags: RwLock<HashMap<TagName, Tag>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryResolver {
    /// Create a new empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or move the ref `name` to `hash`.
    ///
    /// `name` must be fully qualified (`refs/...`) or one of `FETCH_HEAD`,
    /// `ORIG_HEAD`, `MERGE_HEAD`; use [`set_head`](Self::set_head) for HEAD.
    /// Tag refs cannot be moved once written.
    pub fn write_ref(&self, name: &RefName, hash: Hash) -> Result<()> {
        let full = name.as_str();
        let is_pseudo_head = HEAD_NAMES.contains(&full) && full != "HEAD";
        if !full.starts_with("refs/") && !is_pseudo_head {
            return Err(ResolveError::NotFullRef {
                name: full.to_string(),
            });
        }
        if hash.is_zero() {
            return Err(ModelError::MissingField {
                ty: "ref",
                field: "hash",
            }
            .into());
        }

        let is_tag = name.kind() == RefKind::Tag;
        if is_tag {
            TagName::parse(name.short_name())?;
        }

        let mut refs = write(&self.refs)?;
        if is_tag && refs.contains_key(full) {
            warn!(name = full, "refusing to move tag");
            return Err(ResolveError::TagImmutable {
                name: full.to_string(),
            });
        }
        debug!(name = full, hash = hash.short(), "ref written");
        refs.insert(full.to_string(), hash);
        Ok(())
    }

    /// Delete the ref `name`. Returns `Ok(false)` if it did not exist.
    ///
    /// Deleting a tag ref also forgets the tag's metadata.
    pub fn delete_ref(&self, name: &RefName) -> Result<bool> {
        {
            let head = read(&self.head)?;
            if let Some(current) = head.as_ref().and_then(Head::branch_ref) {
                if current == name.as_str() {
                    return Err(ResolveError::DeleteCurrentBranch {
                        name: name.short_name().to_string(),
                    });
                }
            }
        }

        let removed = write(&self.refs)?.remove(name.as_str()).is_some();
        if removed && name.kind() == RefKind::Tag {
            let tag_name = TagName::parse(name.short_name())?;
            write(&self.tags)?.remove(&tag_name);
        }
        Ok(removed)
    }

    /// Record a tag and write `refs/tags/<name>` at its object.
    pub fn add_tag(&self, tag: Tag) -> Result<()> {
        tag.validate()?;
        let mut tags = write(&self.tags)?;
        if tags.contains_key(&tag.name) {
            return Err(ResolveError::AlreadyExists {
                name: tag.name.ref_path(),
            });
        }
        let ref_name = RefName::new(tag.name.ref_path())?;
        self.write_ref(&ref_name, tag.object.clone())?;
        debug!(tag = %tag, "tag added");
        tags.insert(tag.name.clone(), tag);
        Ok(())
    }

    /// Point HEAD at a branch, given as `main` or `refs/heads/main`.
    ///
    /// Other namespaces, revision expressions, and HEAD-like names are
    /// rejected.
    pub fn set_head(&self, branch: &RefName) -> Result<()> {
        if branch.is_zero() {
            return Err(ModelError::MissingField {
                ty: "head",
                field: "branch",
            }
            .into());
        }
        let short = branch
            .as_str()
            .strip_prefix("refs/heads/")
            .unwrap_or(branch.as_str());
        let reason = if short.is_empty() {
            Some("empty branch name")
        } else if short.starts_with("refs/") {
            Some("HEAD can only follow a refs/heads/ branch")
        } else if short.contains(['~', '^', ':', '@', '{', '}']) {
            Some("HEAD cannot follow a revision expression")
        } else if HEAD_NAMES.contains(&short) {
            Some("HEAD cannot follow another HEAD name")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ModelError::InvalidRefName {
                value: branch.to_string(),
                reason: reason.to_string(),
            }
            .into());
        }
        let short = RefName::new(short)?;
        *write(&self.head)? = Some(Head::Symbolic(short));
        Ok(())
    }

    /// Detach HEAD at `hash`.
    pub fn set_head_detached(&self, hash: Hash) -> Result<()> {
        if hash.is_zero() {
            return Err(ModelError::MissingField {
                ty: "head",
                field: "hash",
            }
            .into());
        }
        *write(&self.head)? = Some(Head::Detached(hash));
        Ok(())
    }

    /// Current HEAD state, if set.
    pub fn head(&self) -> Result<Option<Head>> {
        Ok(read(&self.head)?.clone())
    }

    /// All refs whose full name starts with `prefix`, sorted by name.
    pub fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Hash)>> {
        let refs = read(&self.refs)?;
        let mut result: Vec<(String, Hash)> = refs
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }

    /// All branch refs.
    pub fn branches(&self) -> Result<Vec<(String, Hash)>> {
        self.list_refs("refs/heads/")
    }

    /// All known tags sorted by name. Tag refs written without
    /// [`add_tag`](Self::add_tag) are reported as lightweight tags.
    pub fn tags(&self) -> Result<Vec<Tag>> {
        let recorded = read(&self.tags)?;
        let mut result = Vec::new();
        for (full, hash) in self.list_refs("refs/tags/")? {
            let name = TagName::parse(full.trim_start_matches("refs/tags/"))?;
            match recorded.get(&name) {
                Some(tag) => result.push(tag.clone()),
                None => result.push(Tag::lightweight(name, hash)?),
            }
        }
        Ok(result)
    }

    /// All remote names that have tracking refs.
    pub fn remotes(&self) -> Result<Vec<String>> {
        let mut remotes: Vec<String> = self
            .list_refs("refs/remotes/")?
            .iter()
            .filter_map(|(name, _)| {
                let rest = name.strip_prefix("refs/remotes/")?;
                let remote = rest.split('/').next()?;
                Some(remote.to_string())
            })
            .collect();
        remotes.sort();
        remotes.dedup();
        Ok(remotes)
    }

    fn resolve_head(&self, name: &RefName) -> Result<Ref> {
        let head = read(&self.head)?.clone().ok_or(ResolveError::HeadUnset)?;
        let hash = match &head {
            Head::Detached(hash) => hash.clone(),
            Head::Symbolic(branch) => {
                let path = format!("refs/heads/{branch}");
                read(&self.refs)?
                    .get(&path)
                    .cloned()
                    .ok_or(ResolveError::NotFound { name: path })?
            }
        };
        Ok(Ref::new(name.clone(), hash, RefKind::Head)?)
    }

    /// The commit a tag ref peels to: the recorded tag's commit for
    /// annotated tags, the ref target otherwise.
    fn peel(&self, full: &str, target: Hash) -> Result<Hash> {
        let Some(short) = full.strip_prefix("refs/tags/") else {
            return Ok(target);
        };
        let name = TagName::parse(short)?;
        Ok(read(&self.tags)?
            .get(&name)
            .map(|tag| tag.commit.clone())
            .unwrap_or(target))
    }
}

impl RefResolver for InMemoryResolver {
    fn resolve(&self, name: &RefName) -> Result<Ref> {
        if name.is_zero() {
            return Err(ResolveError::NotFound {
                name: String::new(),
            });
        }
        if name.as_str() == "HEAD" {
            return self.resolve_head(name);
        }
        if Hash::is_full_hex(name.as_str()) {
            let hash = Hash::new(name.as_str())?;
            return Ok(Ref::new(name.clone(), hash, RefKind::Hash)?);
        }

        let found = {
            let refs = read(&self.refs)?;
            lookup_candidates(name.as_str())
                .into_iter()
                .find_map(|candidate| refs.get(&candidate).cloned().map(|hash| (candidate, hash)))
        };
        let Some((full, target)) = found else {
            debug!(%name, "no ref matched");
            return Err(ResolveError::NotFound {
                name: name.to_string(),
            });
        };

        let kind = RefName::new(full.as_str())?.kind();
        let hash = self.peel(&full, target)?;
        debug!(%name, full = %full, hash = hash.short(), %kind, "resolved ref");
        Ok(Ref::new(name.clone(), hash, kind)?)
    }

    fn resolve_tag(&self, name: &TagName) -> Result<Tag> {
        if let Some(tag) = read(&self.tags)?.get(name) {
            return Ok(tag.clone());
        }
        let path = name.ref_path();
        let target = read(&self.refs)?.get(&path).cloned();
        match target {
            Some(hash) => Ok(Tag::lightweight(name.clone(), hash)?),
            None => Err(ResolveError::NotFound { name: path }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(fill: char) -> Hash {
        Hash::new(fill.to_string().repeat(40)).unwrap()
    }

    fn name(s: &str) -> RefName {
        RefName::parse(s).unwrap()
    }

    fn tag_name(s: &str) -> TagName {
        TagName::parse(s).unwrap()
    }

    #[test]
    fn write_and_resolve_branch_by_short_name() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/main"), hash('a')).unwrap();

        let r = resolver.resolve(&name("main")).unwrap();
        assert_eq!(r.name.as_str(), "main");
        assert_eq!(r.hash, hash('a'));
        assert_eq!(r.kind, RefKind::Branch);
    }

    #[test]
    fn resolve_full_name() {
        let resolver = InMemoryResolver::new();
        resolver
            .write_ref(&name("refs/remotes/origin/main"), hash('b'))
            .unwrap();
        let r = resolver.resolve(&name("refs/remotes/origin/main")).unwrap();
        assert_eq!(r.kind, RefKind::RemoteBranch);
        let short = resolver.resolve(&name("origin/main")).unwrap();
        assert_eq!(short.hash, hash('b'));
        assert_eq!(short.kind, RefKind::RemoteBranch);
    }

    #[test]
    fn tags_win_over_branches_for_short_names() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/v1"), hash('a')).unwrap();
        resolver.write_ref(&name("refs/tags/v1"), hash('b')).unwrap();

        let r = resolver.resolve(&name("v1")).unwrap();
        assert_eq!(r.kind, RefKind::Tag);
        assert_eq!(r.hash, hash('b'));
    }

    #[test]
    fn remote_head_fallback() {
        let resolver = InMemoryResolver::new();
        resolver
            .write_ref(&name("refs/remotes/origin/HEAD"), hash('c'))
            .unwrap();
        let r = resolver.resolve(&name("origin")).unwrap();
        assert_eq!(r.hash, hash('c'));
        assert_eq!(r.kind, RefKind::RemoteBranch);
    }

    #[test]
    fn write_requires_full_name() {
        let resolver = InMemoryResolver::new();
        let err = resolver.write_ref(&name("main"), hash('a')).unwrap_err();
        assert!(matches!(err, ResolveError::NotFullRef { .. }));
        let err = resolver.write_ref(&name("HEAD"), hash('a')).unwrap_err();
        assert!(matches!(err, ResolveError::NotFullRef { .. }));
        assert!(resolver.write_ref(&name("FETCH_HEAD"), hash('a')).is_ok());
    }

    #[test]
    fn write_rejects_zero_hash() {
        let resolver = InMemoryResolver::new();
        let err = resolver
            .write_ref(&name("refs/heads/main"), Hash::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Model(ModelError::MissingField { .. })));
    }

    #[test]
    fn pseudo_head_resolves_with_head_kind() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("ORIG_HEAD"), hash('d')).unwrap();
        let r = resolver.resolve(&name("ORIG_HEAD")).unwrap();
        assert_eq!(r.kind, RefKind::Head);
    }

    #[test]
    fn branches_are_mutable() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/main"), hash('a')).unwrap();
        resolver.write_ref(&name("refs/heads/main"), hash('b')).unwrap();
        assert_eq!(resolver.resolve(&name("main")).unwrap().hash, hash('b'));
    }

    #[test]
    fn tags_are_immutable() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/tags/v1"), hash('a')).unwrap();
        let err = resolver
            .write_ref(&name("refs/tags/v1"), hash('b'))
            .unwrap_err();
        assert!(
            matches!(err, ResolveError::TagImmutable { .. }),
            "expected TagImmutable, got: {err}"
        );
    }

    #[test]
    fn head_symbolic_and_detached() {
        let resolver = InMemoryResolver::new();
        assert!(matches!(
            resolver.resolve(&RefName::head()).unwrap_err(),
            ResolveError::HeadUnset
        ));

        resolver.write_ref(&name("refs/heads/main"), hash('a')).unwrap();
        resolver.set_head(&name("main")).unwrap();
        let r = resolver.resolve(&RefName::head()).unwrap();
        assert_eq!(r.hash, hash('a'));
        assert_eq!(r.kind, RefKind::Head);

        resolver.set_head_detached(hash('f')).unwrap();
        assert_eq!(resolver.resolve(&RefName::head()).unwrap().hash, hash('f'));
        assert!(resolver.head().unwrap().unwrap().is_detached());
    }

    #[test]
    fn set_head_accepts_full_branch_path() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/main"), hash('a')).unwrap();
        resolver.set_head(&name("refs/heads/main")).unwrap();
        assert_eq!(
            resolver.head().unwrap(),
            Some(Head::Symbolic(name("main")))
        );
        assert_eq!(resolver.resolve(&RefName::head()).unwrap().hash, hash('a'));
    }

    #[test]
    fn set_head_rejects_non_branches() {
        let resolver = InMemoryResolver::new();
        for bad in ["main~1", "refs/tags/v1", "refs/remotes/origin/main", "HEAD", "refs/heads/"] {
            let err = resolver.set_head(&name(bad)).unwrap_err();
            assert!(
                matches!(err, ResolveError::Model(ModelError::InvalidRefName { .. })),
                "{bad}: got {err}"
            );
        }
        assert_eq!(resolver.head().unwrap(), None);
    }

    #[test]
    fn head_on_unborn_branch_is_not_found() {
        let resolver = InMemoryResolver::new();
        resolver.set_head(&name("main")).unwrap();
        let err = resolver.resolve(&RefName::head()).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn full_hash_resolves_to_itself() {
        let resolver = InMemoryResolver::new();
        let full = "e".repeat(64);
        let r = resolver.resolve(&name(&full)).unwrap();
        assert_eq!(r.kind, RefKind::Hash);
        assert_eq!(r.hash.as_str(), full);
    }

    #[test]
    fn revision_expressions_are_not_found() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/main"), hash('a')).unwrap();
        for expr in ["main~1", "main@{upstream}", "abc1234"] {
            let err = resolver.resolve(&name(expr)).unwrap_err();
            assert!(matches!(err, ResolveError::NotFound { .. }), "input {expr:?}");
        }
    }

    #[test]
    fn annotated_tag_peels_to_commit() {
        let resolver = InMemoryResolver::new();
        let tag = Tag::annotated(tag_name("v2.0.0"), hash('1'), hash('2'), "Release").unwrap();
        resolver.add_tag(tag.clone()).unwrap();

        let r = resolver.resolve(&name("v2.0.0")).unwrap();
        assert_eq!(r.hash, hash('2'));
        assert_eq!(r.kind, RefKind::Tag);

        assert_eq!(resolver.resolve_tag(&tag_name("v2.0.0")).unwrap(), tag);
        assert_eq!(resolver.list_refs("refs/tags/").unwrap()[0].1, hash('1'));
    }

    #[test]
    fn duplicate_tag_rejected() {
        let resolver = InMemoryResolver::new();
        let tag = Tag::lightweight(tag_name("v1"), hash('a')).unwrap();
        resolver.add_tag(tag.clone()).unwrap();
        let err = resolver.add_tag(tag).unwrap_err();
        assert!(matches!(err, ResolveError::AlreadyExists { .. }));
    }

    #[test]
    fn resolve_tag_for_plain_tag_ref_is_lightweight() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/tags/v0.9"), hash('9')).unwrap();
        let tag = resolver.resolve_tag(&tag_name("v0.9")).unwrap();
        assert!(!tag.annotated);
        assert_eq!(tag.commit, hash('9'));
        assert!(resolver.resolve_tag(&tag_name("v9")).is_err());
    }

    #[test]
    fn delete_ref_and_tag_metadata() {
        let resolver = InMemoryResolver::new();
        resolver
            .add_tag(Tag::annotated(tag_name("v1"), hash('1'), hash('2'), "").unwrap())
            .unwrap();
        assert!(resolver.delete_ref(&name("refs/tags/v1")).unwrap());
        assert!(!resolver.delete_ref(&name("refs/tags/v1")).unwrap());
        assert!(resolver.tags().unwrap().is_empty());

        // The name is free again.
        resolver
            .add_tag(Tag::lightweight(tag_name("v1"), hash('3')).unwrap())
            .unwrap();
    }

    #[test]
    fn cannot_delete_current_branch() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/main"), hash('a')).unwrap();
        resolver.set_head(&name("main")).unwrap();
        let err = resolver.delete_ref(&name("refs/heads/main")).unwrap_err();
        assert!(matches!(err, ResolveError::DeleteCurrentBranch { .. }));
    }

    #[test]
    fn listings() {
        let resolver = InMemoryResolver::new();
        resolver.write_ref(&name("refs/heads/main"), hash('1')).unwrap();
        resolver.write_ref(&name("refs/heads/develop"), hash('2')).unwrap();
        resolver
            .write_ref(&name("refs/remotes/origin/main"), hash('3'))
            .unwrap();
        resolver
            .write_ref(&name("refs/remotes/upstream/main"), hash('4'))
            .unwrap();
        resolver
            .add_tag(Tag::annotated(tag_name("v1"), hash('5'), hash('1'), "one").unwrap())
            .unwrap();
        resolver.write_ref(&name("refs/tags/v0"), hash('6')).unwrap();

        let branches = resolver.branches().unwrap();
        assert_eq!(
            branches.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            vec!["refs/heads/develop", "refs/heads/main"]
        );
        assert_eq!(resolver.remotes().unwrap(), vec!["origin", "upstream"]);

        let tags = resolver.tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name.as_str(), "v0");
        assert!(!tags[0].annotated);
        assert!(tags[1].annotated);
    }
}
