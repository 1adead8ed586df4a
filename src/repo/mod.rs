//! repo
//!
//! The repository model: branches, walked history, remotes, and commit diffs.
//!
//! # Loading
//!
//! [`Repository::open`] loads everything eagerly, in this order:
//!
//! 1. Branches, with upstreams resolved and ahead/behind computed
//! 2. Remotes
//! 3. Commits, walked from the current branch's upstream or from HEAD
//! 4. Classification of the walked commits against the upstream
//!
//! Any fatal error aborts the load; no partially loaded repository is
//! returned. A missing upstream is logged and tolerated.
//!
//! # Example
//!
//! ```no_run
//! use gitscope::repo::Repository;
//! use std::path::Path;
//!
//! let repo = Repository::open(Path::new(".")).unwrap();
//! for commit in repo.commits() {
//!     let diff = repo.diff(&commit.commit_ref()).unwrap();
//!     println!("{} {} files", commit.hash.abbrev(), diff.deltas().len());
//! }
//! ```

pub mod branch;
pub mod commit;
pub mod remote;

pub use branch::{Branch, UpstreamRef};
pub use commit::{Commit, CommitRef, CommitType, Contributor};
pub use remote::Remote;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::config::{Config, WalkOrder};
use crate::core::types::RepoId;
use crate::git::{Diff, DiffOptions, Git, GitError, HeadState};

/// Knobs for loading and diffing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoOptions {
    /// Sort order of every history walk
    pub walk_order: WalkOrder,
    /// Yield the main walk oldest first
    pub walk_reverse: bool,
    /// Options for [`Repository::diff`]
    pub diff: DiffOptions,
}

impl RepoOptions {
    /// Options from merged configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            walk_order: config.walk_order(),
            walk_reverse: config.walk_reverse(),
            diff: DiffOptions {
                context_lines: config.context_lines(),
                stats_width: config.stats_width(),
                detect_renames: config.detect_renames(),
            },
        }
    }
}

/// A loaded repository.
///
/// Owns the store handle; dropping the repository releases it.
#[derive(Debug)]
pub struct Repository {
    id: RepoId,
    name: String,
    abs_path: PathBuf,
    git: Git,
    head: HeadState,
    branches: Vec<Branch>,
    current: Option<usize>,
    commits: Vec<Commit>,
    remotes: Vec<Remote>,
    options: RepoOptions,
}

impl Repository {
    /// Open and load the repository containing `path` with default options.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not inside a repository
    /// - Any fatal error while loading branches, remotes or commits
    pub fn open(path: &Path) -> Result<Self, GitError> {
        Self::open_with(path, &RepoOptions::default())
    }

    /// Open and load the repository containing `path`.
    pub fn open_with(path: &Path, options: &RepoOptions) -> Result<Self, GitError> {
        Self::load(Git::open(path)?, options)
    }

    /// Load the model from an already opened store.
    ///
    /// Lets callers read per-repository configuration from
    /// [`Git::git_dir`] before choosing options.
    pub fn load(git: Git, options: &RepoOptions) -> Result<Self, GitError> {
        let info = git.info();
        let git_dir = std::fs::canonicalize(&info.git_dir).unwrap_or_else(|_| info.git_dir.clone());
        let id = RepoId::compute(&git_dir);
        let root = info.work_dir.as_deref().unwrap_or(&info.git_dir);
        let abs_path = std::fs::canonicalize(root).map_err(|e| GitError::AccessError {
            message: format!("cannot canonicalize '{}': {}", root.display(), e),
        })?;
        let name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(repo = %abs_path.display(), id = %id, "loading repository");

        let mut branches = branch::load_branches(&git)?;
        branch::compute_divergence(&git, &mut branches, options.walk_order)?;

        let remotes = remote::load_remotes(&git)?;

        let head = git.head()?;
        let current = commit::current_branch_index(&head, &branches);
        let current_branch = current.map(|idx| &branches[idx]);
        let mut commits = commit::load_commits(&git, &head, current_branch, options)?;
        if let Some(branch) = current_branch {
            commit::classify(&mut commits, branch);
        }

        debug!(
            branches = branches.len(),
            remotes = remotes.len(),
            commits = commits.len(),
            "repository loaded"
        );

        Ok(Self {
            id,
            name,
            abs_path,
            git,
            head,
            branches,
            current,
            commits,
            remotes,
            options: options.clone(),
        })
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Stable identifier derived from the git directory path.
    pub fn id(&self) -> &RepoId {
        &self.id
    }

    /// Final component of the working directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical working directory (git directory if bare).
    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    pub fn git_dir(&self) -> &Path {
        self.git.git_dir()
    }

    pub fn options(&self) -> &RepoOptions {
        &self.options
    }

    // =========================================================================
    // Loaded model
    // =========================================================================

    pub fn head(&self) -> &HeadState {
        &self.head
    }

    /// Local and remote-tracking branches, in store order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// The branch HEAD is on, if any.
    pub fn current_branch(&self) -> Option<&Branch> {
        self.current.map(|idx| &self.branches[idx])
    }

    /// Walked history, in walk order.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn remotes(&self) -> &[Remote] {
        &self.remotes
    }

    // =========================================================================
    // Lookups and diffs
    // =========================================================================

    /// Resolve a full or abbreviated hash to a commit handle.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidOid`] if `hash` is not hex, too short, or ambiguous
    /// - [`GitError::ObjectNotFound`] if nothing matches
    /// - [`GitError::NotACommit`] if it names another kind of object
    pub fn commit_ref(&self, hash: &str) -> Result<CommitRef, GitError> {
        self.git.resolve_commit(hash).map(CommitRef::new)
    }

    /// Materialize a full commit from a handle.
    pub fn commit(&self, commit: &CommitRef) -> Result<Commit, GitError> {
        if let Some(loaded) = self.commits.iter().find(|c| &c.hash == commit.oid()) {
            return Ok(loaded.clone());
        }
        self.git.commit_info(commit.oid()).map(Commit::from)
    }

    /// Changes introduced by `commit` relative to its first parent.
    ///
    /// Deltas that cannot be extracted are skipped; see [`Git::diff_commit`].
    pub fn diff(&self, commit: &CommitRef) -> Result<Diff, GitError> {
        self.git.diff_commit(commit.oid(), &self.options.diff)
    }

    /// [`diff`](Self::diff) for a hash given as text.
    pub fn diff_from_hash(&self, hash: &str) -> Result<Diff, GitError> {
        let commit = self.commit_ref(hash)?;
        self.diff(&commit)
    }
}
