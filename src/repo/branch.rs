//! repo::branch
//!
//! Local and remote-tracking branches, their upstreams, and how far each
//! local branch has diverged from the upstream it tracks.

use serde::Serialize;
use tracing::{debug, warn};

use super::commit::{Commit, CommitType};
use crate::core::config::WalkOrder;
use crate::core::types::{BranchName, Oid, RefName};
use crate::git::{BranchEntry, CommitInfo, Git, GitError};

/// The remote-tracking branch a local branch follows.
///
/// Always names a remote-tracking ref; a branch configured to track another
/// local branch is treated as having no upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamRef {
    /// Full ref name, e.g. `refs/remotes/origin/main`
    pub full_name: RefName,
    /// Commit the upstream points to
    pub hash: Oid,
}

impl UpstreamRef {
    /// Short name, e.g. `origin/main`.
    pub fn name(&self) -> &str {
        self.full_name
            .strip_prefix("refs/remotes/")
            .unwrap_or(self.full_name.as_str())
    }

    /// Always true; non-remote upstreams are dropped while loading.
    pub fn is_remote(&self) -> bool {
        self.full_name.is_remote_ref()
    }
}

impl std::fmt::Display for UpstreamRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A branch tip plus its tracking state.
///
/// Identity is the full ref name.
#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    name: BranchName,
    full_name: RefName,
    hash: Oid,
    is_remote: bool,
    upstream: Option<UpstreamRef>,
    ahead: Vec<Commit>,
    behind: Vec<Commit>,
    clean: bool,
}

impl Branch {
    /// Short name (`main`, `origin/main`).
    pub fn name(&self) -> &BranchName {
        &self.name
    }

    /// Full ref name (`refs/heads/main`).
    pub fn full_name(&self) -> &RefName {
        &self.full_name
    }

    /// Tip commit.
    pub fn hash(&self) -> &Oid {
        &self.hash
    }

    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    /// Tracked upstream. Never set on remote-tracking branches.
    pub fn upstream(&self) -> Option<&UpstreamRef> {
        self.upstream.as_ref()
    }

    /// Commits on this branch that the upstream lacks, typed `local`.
    pub fn ahead(&self) -> &[Commit] {
        &self.ahead
    }

    /// Commits on the upstream that this branch lacks, typed `remote`.
    pub fn behind(&self) -> &[Commit] {
        &self.behind
    }

    /// Whether the branch and its upstream point at the same commit.
    ///
    /// A branch without an upstream is never clean.
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    fn from_entry(entry: BranchEntry, upstream: Option<UpstreamRef>) -> Self {
        Self {
            name: entry.name,
            full_name: entry.target.name,
            hash: entry.target.oid,
            is_remote: entry.is_remote,
            upstream,
            ahead: Vec::new(),
            behind: Vec::new(),
            clean: false,
        }
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for Branch {}

impl std::hash::Hash for Branch {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Enumerate local and remote-tracking branches and resolve upstreams.
///
/// A local branch whose upstream is unset, missing, or not a
/// remote-tracking ref is kept with no upstream; a warning is logged.
pub(crate) fn load_branches(git: &Git) -> Result<Vec<Branch>, GitError> {
    let mut branches = Vec::new();

    for entry in git.branches()? {
        let upstream = if entry.is_remote {
            None
        } else {
            resolve_upstream(git, &entry)
        };
        branches.push(Branch::from_entry(entry, upstream));
    }

    debug!(count = branches.len(), "loaded branches");
    Ok(branches)
}

fn resolve_upstream(git: &Git, entry: &BranchEntry) -> Option<UpstreamRef> {
    match git.upstream_of(&entry.target.name) {
        Ok(Some(target)) if target.name.is_remote_ref() => Some(UpstreamRef {
            full_name: target.name,
            hash: target.oid,
        }),
        Ok(Some(target)) => {
            warn!(
                branch = %entry.name,
                upstream = %target.name,
                "upstream is not a remote-tracking branch, ignoring"
            );
            None
        }
        Ok(None) => {
            warn!(branch = %entry.name, "upstream not found");
            None
        }
        Err(err) => {
            warn!(branch = %entry.name, error = %err, "upstream could not be resolved");
            None
        }
    }
}

/// Fill `ahead`, `behind` and `clean` for every branch with an upstream.
pub(crate) fn compute_divergence(
    git: &Git,
    branches: &mut [Branch],
    order: WalkOrder,
) -> Result<(), GitError> {
    for branch in branches.iter_mut() {
        let Some(upstream) = branch.upstream.as_ref() else {
            continue;
        };

        let ahead = git.commits_between(&upstream.hash, &branch.hash, order)?;
        let behind = git.commits_between(&branch.hash, &upstream.hash, order)?;
        branch.ahead = typed(ahead, CommitType::Local);
        branch.behind = typed(behind, CommitType::Remote);
        branch.clean = upstream.hash == branch.hash;

        debug!(
            branch = %branch.name,
            ahead = branch.ahead.len(),
            behind = branch.behind.len(),
            "computed divergence"
        );
    }

    Ok(())
}

fn typed(infos: Vec<CommitInfo>, commit_type: CommitType) -> Vec<Commit> {
    infos
        .into_iter()
        .map(|info| Commit::from(info).with_type(commit_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::RefEntry;

    fn entry(full: &str, oid_digit: char, is_remote: bool) -> BranchEntry {
        let name = RefName::new(full).unwrap();
        BranchEntry {
            name: BranchName::new(
                full.trim_start_matches("refs/heads/")
                    .trim_start_matches("refs/remotes/"),
            )
            .unwrap(),
            target: RefEntry {
                name,
                oid: Oid::new(oid_digit.to_string().repeat(40)).unwrap(),
            },
            is_remote,
        }
    }

    #[test]
    fn equality_is_by_full_name() {
        let a = Branch::from_entry(entry("refs/heads/main", 'a', false), None);
        let b = Branch::from_entry(entry("refs/heads/main", 'b', false), None);
        let c = Branch::from_entry(entry("refs/heads/dev", 'a', false), None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fresh_branch_is_not_clean() {
        let branch = Branch::from_entry(entry("refs/heads/main", 'a', false), None);
        assert!(!branch.is_clean());
        assert!(branch.ahead().is_empty());
        assert!(branch.behind().is_empty());
        assert!(branch.upstream().is_none());
    }

    #[test]
    fn upstream_short_name() {
        let upstream = UpstreamRef {
            full_name: RefName::new("refs/remotes/origin/main").unwrap(),
            hash: Oid::new("c".repeat(40)).unwrap(),
        };
        assert_eq!(upstream.name(), "origin/main");
        assert_eq!(upstream.to_string(), "origin/main");
        assert!(upstream.is_remote());
    }

    #[test]
    fn display_is_short_name() {
        let branch = Branch::from_entry(entry("refs/remotes/origin/main", 'a', true), None);
        assert_eq!(branch.to_string(), "origin/main");
        assert!(branch.is_remote());
    }
}
