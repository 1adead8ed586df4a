//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to the object store. All
//! reads flow through [`Git`], which returns structured results and
//! normalizes libgit2 errors into typed failure categories.
//!
//! # Architecture
//!
//! No module outside `git` imports `git2`. Everything handed out of this
//! module is an owned value ([`Oid`], [`RefName`], [`CommitInfo`], ...),
//! never a handle borrowing the underlying repository.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::ObjectNotFound`]: Requested object does not exist
//! - [`GitError::NotACommit`]: Object exists but is not a commit
//! - [`GitError::InvalidOid`]: Malformed object id
//!
//! # Example
//!
//! ```ignore
//! use gitscope::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head()?;
//! println!("HEAD is {:?}", head);
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::WalkOrder;
use crate::core::types::{BranchName, Oid, RefName, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Object exists but is not a commit.
    #[error("not a commit: {oid}")]
    NotACommit {
        /// The OID of the object
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// A name stored in the repository is not valid UTF-8.
    #[error("{what} is not valid UTF-8")]
    InvalidUtf8Name {
        /// What kind of name could not be decoded
        what: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    pub(super) fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context == "HEAD" || context.contains("ref") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => GitError::InvalidOid {
                oid: context.to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    pub(super) fn internal(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: err.message().to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: err.message().to_string(),
            },
            _ => GitError::internal(err),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::InvalidRefName { message: msg },
            TypeError::InvalidBranchName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory (`None` for bare repositories)
    pub work_dir: Option<PathBuf>,
}

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD names a branch that has no commits yet.
    Unborn,
    /// HEAD is a symbolic ref to a branch.
    Branch {
        /// The branch ref HEAD points to
        refname: RefName,
        /// The commit at the branch tip
        oid: Oid,
    },
    /// HEAD points directly at a commit.
    Detached {
        /// The commit HEAD points to
        oid: Oid,
    },
}

impl HeadState {
    /// The commit HEAD resolves to, if any.
    pub fn oid(&self) -> Option<&Oid> {
        match self {
            HeadState::Unborn => None,
            HeadState::Branch { oid, .. } | HeadState::Detached { oid } => Some(oid),
        }
    }

    /// The branch ref HEAD points to, if attached.
    pub fn refname(&self) -> Option<&RefName> {
        match self {
            HeadState::Branch { refname, .. } => Some(refname),
            _ => None,
        }
    }
}

/// A ref with its name and target OID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    /// The full ref name
    pub name: RefName,
    /// The OID the ref points to
    pub oid: Oid,
}

/// A local or remote-tracking branch as the store reports it.
#[derive(Debug, Clone)]
pub struct BranchEntry {
    /// Short name (`main`, `origin/main`)
    pub name: BranchName,
    /// Full ref name and target commit
    pub target: RefEntry,
    /// Whether this is a remote-tracking branch
    pub is_remote: bool,
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Remote name
    pub name: String,
    /// Fetch URL, if configured
    pub url: Option<String>,
    /// Push URL, if configured separately
    pub push_url: Option<String>,
}

/// Information about a commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// The commit OID
    pub oid: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp in the author's own offset
    pub author_time: chrono::DateTime<chrono::FixedOffset>,
}

/// The Git interface.
///
/// This is the **single point of interaction** with the object store.
/// Repository handles (walkers, iterators, trees, diffs, patches) are
/// acquired and released inside each method; nothing borrowed from the
/// store escapes.
pub struct Git {
    /// The underlying git2 repository
    pub(super) repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository. Bare
    /// repositories are accepted; nothing here needs a working tree.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Get repository information (git_dir and work_dir paths).
    pub fn info(&self) -> RepoInfo {
        RepoInfo {
            git_dir: self.repo.path().to_path_buf(),
            work_dir: self.repo.workdir().map(Path::to_path_buf),
        }
    }

    /// Get direct access to the .git directory path.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    // =========================================================================
    // Ref Resolution
    // =========================================================================

    /// Read HEAD.
    ///
    /// An unborn HEAD (fresh repository) is reported as [`HeadState::Unborn`]
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is missing or dangling
    pub fn head(&self) -> Result<HeadState, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(HeadState::Unborn),
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        let oid = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?
            .id();
        let oid = Oid::new(oid.to_string())?;

        if head.is_branch() {
            let name = head.name().ok_or_else(|| GitError::InvalidUtf8Name {
                what: "HEAD target".to_string(),
            })?;
            return Ok(HeadState::Branch {
                refname: RefName::new(name)?,
                oid,
            });
        }

        Ok(HeadState::Detached { oid })
    }

    /// Parse a hex hash and verify it names a commit.
    ///
    /// Full hashes are looked up directly; shorter hex prefixes (at least
    /// four characters) are expanded when they are unambiguous.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidOid`] if `hash` is not hex, too short, or ambiguous
    /// - [`GitError::ObjectNotFound`] if no such object exists
    /// - [`GitError::NotACommit`] if the object is a tree, blob or tag
    pub fn resolve_commit(&self, hash: &str) -> Result<Oid, GitError> {
        const MIN_PREFIX: usize = 4;

        let object = match Oid::new(hash) {
            Ok(oid) => self
                .repo
                .find_object(to_git2(&oid)?, None)
                .map_err(|e| GitError::from_git2(e, oid.as_str()))?,
            Err(e) => {
                let is_prefix =
                    hash.len() >= MIN_PREFIX && hash.chars().all(|c| c.is_ascii_hexdigit());
                if !is_prefix {
                    return Err(e.into());
                }
                self.repo
                    .find_object_by_prefix(hash, None)
                    .map_err(|e| GitError::from_git2(e, hash))?
            }
        };

        if object.kind() != Some(git2::ObjectType::Commit) {
            return Err(GitError::NotACommit {
                oid: object.id().to_string(),
            });
        }

        Oid::new(object.id().to_string()).map_err(|e| e.into())
    }

    // =========================================================================
    // Branch Enumeration
    // =========================================================================

    /// List all local and remote-tracking branches in store order.
    ///
    /// Branches whose reference has no direct target (e.g. the symbolic
    /// `refs/remotes/origin/HEAD`) are resolved to their final target.
    ///
    /// # Errors
    ///
    /// Failing to open the iterator, decode a name, or resolve a target is
    /// an error; nothing is skipped.
    pub fn branches(&self) -> Result<Vec<BranchEntry>, GitError> {
        let branches = self.repo.branches(None).map_err(GitError::internal)?;

        let mut entries = Vec::new();
        for branch in branches {
            let (branch, kind) = branch.map_err(GitError::internal)?;

            let short = branch
                .name()
                .map_err(GitError::internal)?
                .ok_or_else(|| GitError::InvalidUtf8Name {
                    what: "branch name".to_string(),
                })?;
            let name = BranchName::new(short)?;

            let reference = branch.get();
            let full_name = reference.name().ok_or_else(|| GitError::InvalidUtf8Name {
                what: format!("ref name of branch {}", short),
            })?;
            let full_name = RefName::new(full_name)?;

            let oid = match reference.target() {
                Some(oid) => oid,
                None => reference
                    .resolve()
                    .map_err(|e| GitError::from_git2(e, full_name.as_str()))?
                    .target()
                    .ok_or_else(|| GitError::RefNotFound {
                        refname: full_name.to_string(),
                    })?,
            };

            entries.push(BranchEntry {
                name,
                target: RefEntry {
                    name: full_name,
                    oid: Oid::new(oid.to_string())?,
                },
                is_remote: kind == git2::BranchType::Remote,
            });
        }

        Ok(entries)
    }

    /// Resolve the configured upstream of a local branch.
    ///
    /// Returns `Ok(None)` when no upstream is configured. A configured
    /// upstream whose ref is missing is an error the caller may choose to
    /// tolerate.
    pub fn upstream_of(&self, branch: &RefName) -> Result<Option<RefEntry>, GitError> {
        let reference = self
            .repo
            .find_reference(branch.as_str())
            .map_err(|e| GitError::from_git2(e, branch.as_str()))?;

        let upstream = match git2::Branch::wrap(reference).upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                // Either no tracking config, or the tracked ref is gone.
                if self.upstream_configured(branch) {
                    return Err(GitError::RefNotFound {
                        refname: format!("upstream of {}", branch),
                    });
                }
                return Ok(None);
            }
            Err(e) => return Err(GitError::from_git2(e, branch.as_str())),
        };

        let reference = upstream.get();
        let name = reference.name().ok_or_else(|| GitError::InvalidUtf8Name {
            what: format!("upstream ref name of {}", branch),
        })?;
        let name = RefName::new(name)?;
        let oid = reference
            .resolve()
            .map_err(|e| GitError::from_git2(e, name.as_str()))?
            .target()
            .ok_or_else(|| GitError::RefNotFound {
                refname: name.to_string(),
            })?;

        Ok(Some(RefEntry {
            name,
            oid: Oid::new(oid.to_string())?,
        }))
    }

    fn upstream_configured(&self, branch: &RefName) -> bool {
        self.repo.branch_upstream_name(branch.as_str()).is_ok()
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// List configured remotes in configuration order.
    pub fn remotes(&self) -> Result<Vec<RemoteEntry>, GitError> {
        let names = self.repo.remotes().map_err(GitError::internal)?;

        let mut entries = Vec::new();
        for name in names.iter() {
            let name = name.ok_or_else(|| GitError::InvalidUtf8Name {
                what: "remote name".to_string(),
            })?;
            let remote = self
                .repo
                .find_remote(name)
                .map_err(|e| GitError::from_git2(e, name))?;

            entries.push(RemoteEntry {
                name: name.to_string(),
                url: remote.url().map(String::from),
                push_url: remote.pushurl().map(String::from),
            });
        }

        Ok(entries)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Walk history reachable from `start`, in the given order.
    ///
    /// # Errors
    ///
    /// Failing to create the walker, push the start, or read any commit is
    /// an error.
    pub fn walk(
        &self,
        start: &Oid,
        order: WalkOrder,
        reverse: bool,
    ) -> Result<Vec<CommitInfo>, GitError> {
        self.walk_excluding(start, None, order, reverse)
    }

    /// List commits reachable from `tip` but not from `base`.
    ///
    /// Returns an empty list when `tip` is an ancestor of `base`.
    pub fn commits_between(
        &self,
        base: &Oid,
        tip: &Oid,
        order: WalkOrder,
    ) -> Result<Vec<CommitInfo>, GitError> {
        self.walk_excluding(tip, Some(base), order, false)
    }

    fn walk_excluding(
        &self,
        start: &Oid,
        hide: Option<&Oid>,
        order: WalkOrder,
        reverse: bool,
    ) -> Result<Vec<CommitInfo>, GitError> {
        let mut revwalk = self.repo.revwalk().map_err(GitError::internal)?;

        let mut sort = match order {
            WalkOrder::TopologicalTime => git2::Sort::TOPOLOGICAL | git2::Sort::TIME,
            WalkOrder::Topological => git2::Sort::TOPOLOGICAL,
            WalkOrder::Time => git2::Sort::TIME,
            WalkOrder::None => git2::Sort::NONE,
        };
        if reverse {
            sort |= git2::Sort::REVERSE;
        }
        revwalk.set_sorting(sort).map_err(GitError::internal)?;

        revwalk
            .push(to_git2(start)?)
            .map_err(|e| GitError::from_git2(e, start.as_str()))?;
        if let Some(hide) = hide {
            revwalk
                .hide(to_git2(hide)?)
                .map_err(|e| GitError::from_git2(e, hide.as_str()))?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(GitError::internal)?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::from_git2(e, &oid.to_string()))?;
            commits.push(commit_info(&commit)?);
        }

        Ok(commits)
    }

    /// Get information about a commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        commit_info(&commit)
    }
}

/// Convert a validated OID into the git2 representation.
pub(super) fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
}

/// Materialize a commit into owned data.
fn commit_info(commit: &git2::Commit<'_>) -> Result<CommitInfo, GitError> {
    let author = commit.author();
    let when = author.when();
    let offset = chrono::FixedOffset::east_opt(when.offset_minutes() * 60)
        .unwrap_or_else(|| chrono::Offset::fix(&chrono::Utc));
    let author_time = chrono::DateTime::from_timestamp(when.seconds(), 0)
        .unwrap_or(chrono::DateTime::UNIX_EPOCH)
        .with_timezone(&offset);

    // Messages in legacy encodings are kept, not blanked.
    let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

    Ok(CommitInfo {
        oid: Oid::new(commit.id().to_string())?,
        summary: summary_of(&message),
        message,
        author_name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
        author_email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
        author_time,
    })
}

/// First paragraph of a message with its lines joined, as `git log --oneline`.
fn summary_of(message: &str) -> String {
    message
        .trim_start()
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}
