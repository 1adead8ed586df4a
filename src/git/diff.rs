//! git::diff
//!
//! Commit diffs: a commit's tree against its first parent's tree, or against
//! the empty tree for root commits.
//!
//! # Best effort
//!
//! Every delta of the tree diff is visited in order. A delta whose patch or
//! metadata cannot be extracted is skipped and the walk continues, so
//! [`Diff::deltas`] may be shorter than the store's delta count. Deltas and
//! patches are always pushed together and stay index-aligned.
//!
//! Trees, the diff and each patch are scoped values; they are released when
//! they go out of scope on every path out of [`Git::diff_commit`].

use serde::Serialize;
use tracing::debug;

use super::interface::{to_git2, Git, GitError};
use crate::core::types::Oid;

/// Options for the tree-to-tree diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Unified diff context lines
    pub context_lines: u32,
    /// Width of the rendered stats block
    pub stats_width: usize,
    /// Run rename/copy detection
    pub detect_renames: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            stats_width: 80,
            detect_renames: false,
        }
    }
}

/// Status of a file-level change.
///
/// Mirrors libgit2's `git_delta_t`; [`DeltaStatus::code`] returns the raw
/// libgit2 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaStatus {
    Unmodified,
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Ignored,
    Untracked,
    Typechange,
    Unreadable,
    Conflicted,
}

impl DeltaStatus {
    /// The libgit2 integer code for this status.
    pub fn code(self) -> i32 {
        match self {
            DeltaStatus::Unmodified => 0,
            DeltaStatus::Added => 1,
            DeltaStatus::Deleted => 2,
            DeltaStatus::Modified => 3,
            DeltaStatus::Renamed => 4,
            DeltaStatus::Copied => 5,
            DeltaStatus::Ignored => 6,
            DeltaStatus::Untracked => 7,
            DeltaStatus::Typechange => 8,
            DeltaStatus::Unreadable => 9,
            DeltaStatus::Conflicted => 10,
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            DeltaStatus::Unmodified => "unmodified",
            DeltaStatus::Added => "added",
            DeltaStatus::Deleted => "deleted",
            DeltaStatus::Modified => "modified",
            DeltaStatus::Renamed => "renamed",
            DeltaStatus::Copied => "copied",
            DeltaStatus::Ignored => "ignored",
            DeltaStatus::Untracked => "untracked",
            DeltaStatus::Typechange => "typechange",
            DeltaStatus::Unreadable => "unreadable",
            DeltaStatus::Conflicted => "conflicted",
        }
    }

    /// The file did not exist before the change.
    pub fn old_side_absent(self) -> bool {
        matches!(
            self,
            DeltaStatus::Added | DeltaStatus::Untracked | DeltaStatus::Ignored
        )
    }

    /// The file does not exist after the change.
    pub fn new_side_absent(self) -> bool {
        self == DeltaStatus::Deleted
    }

    fn from_git2(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Unmodified => DeltaStatus::Unmodified,
            git2::Delta::Added => DeltaStatus::Added,
            git2::Delta::Deleted => DeltaStatus::Deleted,
            git2::Delta::Modified => DeltaStatus::Modified,
            git2::Delta::Renamed => DeltaStatus::Renamed,
            git2::Delta::Copied => DeltaStatus::Copied,
            git2::Delta::Ignored => DeltaStatus::Ignored,
            git2::Delta::Untracked => DeltaStatus::Untracked,
            git2::Delta::Typechange => DeltaStatus::Typechange,
            git2::Delta::Unreadable => DeltaStatus::Unreadable,
            git2::Delta::Conflicted => DeltaStatus::Conflicted,
        }
    }
}

impl std::fmt::Display for DeltaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a delta.
///
/// An empty `path` means the file is absent on this side; its `hash` is then
/// the zero OID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffFile {
    pub path: String,
    pub hash: Oid,
}

impl DiffFile {
    /// A side on which the file does not exist.
    pub fn absent() -> Self {
        Self {
            path: String::new(),
            hash: Oid::zero(),
        }
    }

    /// Whether the file is absent on this side.
    pub fn is_absent(&self) -> bool {
        self.path.is_empty()
    }
}

/// A single file-level change with its unified patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffDelta {
    pub status: DeltaStatus,
    pub old_file: DiffFile,
    pub new_file: DiffFile,
    pub patch: String,
}

impl DiffDelta {
    /// The path to show for this delta: the new path unless the file was
    /// deleted.
    pub fn path(&self) -> &str {
        if self.new_file.is_absent() {
            &self.old_file.path
        } else {
            &self.new_file.path
        }
    }

    /// Whether the file moved to a different path.
    pub fn is_move(&self) -> bool {
        !self.old_file.is_absent()
            && !self.new_file.is_absent()
            && self.old_file.path != self.new_file.path
    }

    /// The patch with a `patch: ` label.
    pub fn patch_string(&self) -> String {
        format!("patch: {}", self.patch)
    }
}

/// `<code> <old> -> <new>` for moves, `<code> <path> <old7>..<new7>` otherwise.
impl std::fmt::Display for DiffDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.status.code())?;
        if self.is_move() {
            write!(f, "{} -> {}", self.old_file.path, self.new_file.path)
        } else {
            write!(
                f,
                "{} {}..{}",
                self.path(),
                self.old_file.hash.abbrev(),
                self.new_file.hash.abbrev()
            )
        }
    }
}

/// The changes a commit introduces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diff {
    deltas: Vec<DiffDelta>,
    stats: Vec<String>,
    patches: Vec<String>,
}

impl Diff {
    /// Per-file deltas in diff order.
    pub fn deltas(&self) -> &[DiffDelta] {
        &self.deltas
    }

    /// Unified patches, index-aligned with [`Diff::deltas`].
    pub fn patches(&self) -> &[String] {
        &self.patches
    }

    /// Lines of the rendered stats block.
    pub fn stats(&self) -> &[String] {
        &self.stats
    }

    /// Whether no delta was extracted.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

impl Git {
    /// Diff a commit against its first parent (or the empty tree).
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit, a tree or the parent is missing
    /// - [`GitError::Internal`] if the tree diff or its stats cannot be computed
    ///
    /// Failures on individual deltas are skipped, not returned.
    pub fn diff_commit(&self, oid: &Oid, options: &DiffOptions) -> Result<Diff, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;
        let tree = commit
            .tree()
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        let parent_tree = if commit.parent_count() > 0 {
            let parent = commit
                .parent(0)
                .map_err(|e| GitError::from_git2(e, oid.as_str()))?;
            let parent_tree = parent
                .tree()
                .map_err(|e| GitError::from_git2(e, &parent.id().to_string()))?;
            Some(parent_tree)
        } else {
            None
        };

        let mut opts = git2::DiffOptions::new();
        opts.context_lines(options.context_lines);

        let mut diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))
            .map_err(GitError::internal)?;

        if options.detect_renames {
            let mut find = git2::DiffFindOptions::new();
            find.renames(true).copies(true);
            diff.find_similar(Some(&mut find))
                .map_err(GitError::internal)?;
        }

        let stats = diff
            .stats()
            .and_then(|s| s.to_buf(git2::DiffStatsFormat::FULL, options.stats_width))
            .map_err(GitError::internal)?;
        let stats = String::from_utf8_lossy(&stats)
            .lines()
            .map(String::from)
            .collect();

        let mut deltas = Vec::new();
        let mut patches = Vec::new();
        for idx in 0..diff.deltas().len() {
            match extract_delta(&diff, idx) {
                Ok(delta) => {
                    patches.push(delta.patch.clone());
                    deltas.push(delta);
                }
                Err(reason) => {
                    debug!(commit = %oid, index = idx, %reason, "skipping diff delta");
                }
            }
        }

        Ok(Diff {
            deltas,
            stats,
            patches,
        })
    }
}

/// Pull one delta and its patch out of a diff.
///
/// The error is only a description for the debug log.
fn extract_delta(diff: &git2::Diff<'_>, idx: usize) -> Result<DiffDelta, String> {
    let patch = git2::Patch::from_diff(diff, idx).map_err(|e| e.message().to_string())?;
    let raw = diff
        .get_delta(idx)
        .ok_or_else(|| "delta index out of range".to_string())?;

    let status = DeltaStatus::from_git2(raw.status());
    let old_file = if status.old_side_absent() {
        DiffFile::absent()
    } else {
        diff_file(&raw.old_file())?
    };
    let new_file = if status.new_side_absent() {
        DiffFile::absent()
    } else {
        diff_file(&raw.new_file())?
    };

    // No patch object is produced for unchanged or binary content.
    let patch = match patch {
        Some(mut patch) => {
            let buf = patch.to_buf().map_err(|e| e.message().to_string())?;
            String::from_utf8_lossy(&buf).into_owned()
        }
        None => String::new(),
    };

    Ok(DiffDelta {
        status,
        old_file,
        new_file,
        patch,
    })
}

fn diff_file(file: &git2::DiffFile<'_>) -> Result<DiffFile, String> {
    let path = file
        .path()
        .map(|p| p.to_string_lossy().into_owned())
        .ok_or_else(|| "delta file has no path".to_string())?;
    let hash = Oid::new(file.id().to_string()).map_err(|e| e.to_string())?;
    Ok(DiffFile { path, hash })
}
