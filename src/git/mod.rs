//! git
//!
//! Single interface to the Git object store.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. Repository reads (refs,
//! history, trees, diffs) flow through [`Git`]. No other module imports
//! `git2`; the rest of the crate sees owned values only.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - HEAD, branch, upstream and remote enumeration
//! - History walks with an explicit sort order
//! - Tree-to-tree diffs of a commit against its first parent
//!
//! # Example
//!
//! ```ignore
//! use gitscope::git::{DiffOptions, Git};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head()?;
//! if let Some(oid) = head.oid() {
//!     let diff = git.diff_commit(oid, &DiffOptions::default())?;
//!     for delta in diff.deltas() {
//!         println!("{}", delta);
//!     }
//! }
//! ```

mod diff;
mod interface;

pub use diff::{DeltaStatus, Diff, DiffDelta, DiffFile, DiffOptions};
pub use interface::{
    BranchEntry, CommitInfo, Git, GitError, HeadState, RefEntry, RemoteEntry, RepoInfo,
};
