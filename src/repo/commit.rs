//! repo::commit
//!
//! Commits, their authors, and the history walk that produces them.
//!
//! # Walk seeding
//!
//! The walk has a single start. When the current branch tracks an upstream,
//! the walk starts at the **upstream** tip, so the listed history is the
//! upstream line; commits only present locally show up in the branch's
//! `ahead` list instead. Without an upstream the walk starts at HEAD.
//!
//! # Classification
//!
//! With an upstream, each walked commit is either in the branch's `behind`
//! set (`remote`) or reachable from both tips (`even`). Without one, walked
//! commits stay unclassified.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::branch::Branch;
use super::RepoOptions;
use crate::core::types::Oid;
use crate::git::{CommitInfo, Git, GitError, HeadState};

/// Where a commit sits relative to the tracked upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    /// Reachable from the local tip only
    Local,
    /// Reachable from both tips
    Even,
    /// Reachable from the upstream tip only
    Remote,
}

impl CommitType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitType::Local => "local",
            CommitType::Even => "even",
            CommitType::Remote => "remote",
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    /// Authored time in the author's own UTC offset
    pub when: chrono::DateTime<chrono::FixedOffset>,
}

/// `Name <email>`
impl std::fmt::Display for Contributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A handle to a commit in the store.
///
/// Only produced from a loaded [`Commit`] or from a hash the store has
/// confirmed to be a commit. It carries no metadata; use
/// [`Repository::commit`](super::Repository::commit) to materialize one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitRef {
    oid: Oid,
}

impl CommitRef {
    pub(crate) fn new(oid: Oid) -> Self {
        Self { oid }
    }

    /// The commit id.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }
}

impl From<&Commit> for CommitRef {
    fn from(commit: &Commit) -> Self {
        commit.commit_ref()
    }
}

/// A fully materialized commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub hash: Oid,
    pub author: Contributor,
    /// Full message
    pub message: String,
    /// First line of the message
    pub summary: String,
    /// `None` until classified against an upstream
    #[serde(rename = "type")]
    pub commit_type: Option<CommitType>,
}

impl Commit {
    /// Handle for diffing this commit.
    pub fn commit_ref(&self) -> CommitRef {
        CommitRef::new(self.hash.clone())
    }

    /// Authored date in RFC 2822 form.
    pub fn date(&self) -> String {
        self.author.when.to_rfc2822()
    }

    pub(crate) fn with_type(mut self, commit_type: CommitType) -> Self {
        self.commit_type = Some(commit_type);
        self
    }
}

/// The full hash.
impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<CommitInfo> for Commit {
    fn from(info: CommitInfo) -> Self {
        Self {
            hash: info.oid,
            author: Contributor {
                name: info.author_name,
                email: info.author_email,
                when: info.author_time,
            },
            message: info.message,
            summary: info.summary,
            commit_type: None,
        }
    }
}

/// Find the branch HEAD is on.
///
/// Prefers the local branch HEAD symbolically points to; for a detached
/// HEAD, falls back to the first local branch whose tip is the HEAD commit.
pub(crate) fn current_branch_index(head: &HeadState, branches: &[Branch]) -> Option<usize> {
    let local = || branches.iter().enumerate().filter(|(_, b)| !b.is_remote());

    if let Some(refname) = head.refname() {
        if let Some((idx, _)) = local().find(|(_, b)| b.full_name() == refname) {
            return Some(idx);
        }
    }

    let oid = head.oid()?;
    local().find(|(_, b)| b.hash() == oid).map(|(idx, _)| idx)
}

/// Walk history from the current branch's upstream, or from HEAD.
///
/// An unborn HEAD yields no commits.
pub(crate) fn load_commits(
    git: &Git,
    head: &HeadState,
    current: Option<&Branch>,
    options: &RepoOptions,
) -> Result<Vec<Commit>, GitError> {
    let Some(head_oid) = head.oid() else {
        debug!("HEAD is unborn, no history to walk");
        return Ok(Vec::new());
    };

    let start = match current.and_then(Branch::upstream) {
        Some(upstream) => {
            debug!(upstream = %upstream.full_name, "walking from upstream");
            &upstream.hash
        }
        None => {
            debug!(head = %head_oid, "walking from HEAD");
            head_oid
        }
    };

    let commits = git
        .walk(start, options.walk_order, options.walk_reverse)?
        .into_iter()
        .map(Commit::from)
        .collect();

    Ok(commits)
}

/// Type walked commits against the current branch's `behind` set.
///
/// Leaves everything untouched when the branch has no upstream.
pub(crate) fn classify(commits: &mut [Commit], current: &Branch) {
    if current.upstream().is_none() {
        return;
    }

    let behind: HashSet<&Oid> = current.behind().iter().map(|c| &c.hash).collect();
    for commit in commits.iter_mut() {
        let commit_type = if behind.contains(&commit.hash) {
            CommitType::Remote
        } else {
            CommitType::Even
        };
        commit.commit_type = Some(commit_type);
    }
}
