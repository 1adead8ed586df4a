//! Integration tests for the repository model.
//!
//! These tests build real repositories with the git CLI inside a temp
//! directory, then load them through `Repository::open` and check branches,
//! upstream tracking, the commit walk, classification, and diffs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use gitscope::core::types::Oid;
use gitscope::git::{DeltaStatus, GitError};
use gitscope::repo::{CommitType, Repository};

/// Test fixture: a working repository, optionally with a bare `origin`.
///
/// Layout under the temp dir: `work/` and `origin.git/`.
struct TestRepo {
    root: TempDir,
}

impl TestRepo {
    /// Create an empty repository on `main` with no commits.
    fn empty() -> Self {
        let root = TempDir::new().expect("failed to create temp dir");
        let work = root.path().join("work");
        std::fs::create_dir(&work).unwrap();

        run_git(&work, &["init", "-b", "main"]);
        run_git(&work, &["config", "user.email", "test@example.com"]);
        run_git(&work, &["config", "user.name", "Test User"]);
        run_git(&work, &["config", "commit.gpgsign", "false"]);

        Self { root }
    }

    /// Create a repository with a linear history A -> B -> C.
    fn linear() -> Self {
        let repo = Self::empty();
        repo.commit_file("README.md", "# Test Repo\n", "A");
        repo.commit_file("README.md", "# Test Repo\n\nMore.\n", "B");
        repo.commit_file("src.txt", "source\n", "C");
        repo
    }

    /// Create a linear repository whose `main` tracks `origin/main`.
    fn tracked() -> Self {
        let repo = Self::linear();
        let origin = repo.origin_path();
        run_git(
            repo.root.path(),
            &["init", "--bare", "-b", "main", origin.to_str().unwrap()],
        );
        repo.git(&["remote", "add", "origin", origin.to_str().unwrap()]);
        repo.git(&["push", "-u", "origin", "main"]);
        repo
    }

    fn path(&self) -> PathBuf {
        self.root.path().join("work")
    }

    fn origin_path(&self) -> PathBuf {
        self.root.path().join("origin.git")
    }

    fn git(&self, args: &[&str]) {
        run_git(&self.path(), args);
    }

    /// Write a file, commit it, and return the new HEAD hash.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        std::fs::write(self.path().join(path), content).unwrap();
        self.git(&["add", path]);
        self.git(&["commit", "-m", message]);
        self.rev_parse("HEAD")
    }

    fn rev_parse(&self, rev: &str) -> String {
        git_output(&self.path(), &["rev-parse", rev])
    }

    fn open(&self) -> Repository {
        Repository::open(&self.path()).expect("failed to open test repo")
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return its trimmed stdout.
fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn summaries(repo: &Repository) -> Vec<&str> {
    repo.commits().iter().map(|c| c.summary.as_str()).collect()
}

// =============================================================================
// Opening
// =============================================================================

#[test]
fn open_non_repository_fails() {
    let dir = TempDir::new().unwrap();
    let result = Repository::open(dir.path());
    assert!(matches!(result, Err(GitError::NotARepo { .. })));
}

#[test]
fn open_from_subdirectory() {
    let repo = TestRepo::linear();
    let sub = repo.path().join("nested/dir");
    std::fs::create_dir_all(&sub).unwrap();

    let loaded = Repository::open(&sub).unwrap();
    assert_eq!(loaded.commits().len(), 3);
}

#[test]
fn identity_is_stable() {
    let repo = TestRepo::linear();
    let first = repo.open();
    let second = repo.open();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.name(), "work");
    assert_eq!(
        first.abs_path(),
        std::fs::canonicalize(repo.path()).unwrap().as_path()
    );
}

#[test]
fn unborn_repository_loads_empty() {
    let repo = TestRepo::empty();
    let loaded = repo.open();

    assert!(loaded.commits().is_empty());
    assert!(loaded.branches().is_empty());
    assert!(loaded.current_branch().is_none());
    assert!(loaded.remotes().is_empty());
}

// =============================================================================
// Walk and classification without an upstream
// =============================================================================

#[test]
fn linear_history_newest_first_untyped() {
    let repo = TestRepo::linear();
    let loaded = repo.open();

    assert_eq!(summaries(&loaded), vec!["C", "B", "A"]);
    assert!(loaded.commits().iter().all(|c| c.commit_type.is_none()));
    assert_eq!(loaded.commits()[0].hash.as_str(), repo.rev_parse("HEAD"));
}

#[test]
fn commit_metadata_is_materialized() {
    let repo = TestRepo::linear();
    let loaded = repo.open();
    let head = &loaded.commits()[0];

    assert_eq!(head.author.name, "Test User");
    assert_eq!(head.author.email, "test@example.com");
    assert_eq!(head.author.to_string(), "Test User <test@example.com>");
    assert_eq!(head.message.trim_end(), "C");
    assert_eq!(head.to_string(), repo.rev_parse("HEAD"));
}

#[cfg(unix)]
#[test]
fn legacy_encoded_commit_keeps_metadata() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let repo = TestRepo::linear();
    let msg = repo.root.path().join("msg.txt");
    std::fs::write(&msg, b"Caf\xe9 fix\n\nD\xe9tails here.\n").unwrap();
    std::fs::write(repo.path().join("latin.txt"), "l\n").unwrap();
    repo.git(&["add", "latin.txt"]);

    let output = Command::new("git")
        .args(["-c", "i18n.commitEncoding=iso-8859-1", "commit", "-F"])
        .arg(&msg)
        .env("GIT_AUTHOR_NAME", OsStr::from_bytes(b"Ren\xe9"))
        .env("GIT_AUTHOR_EMAIL", "rene@example.com")
        .current_dir(repo.path())
        .output()
        .expect("git command failed");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let loaded = repo.open();
    let head = &loaded.commits()[0];

    assert!(head.summary.starts_with("Caf"));
    assert!(head.summary.ends_with(" fix"));
    assert!(head.message.contains("tails here."));
    assert!(head.author.name.starts_with("Ren"));
    assert_eq!(head.author.email, "rene@example.com");
}

#[test]
fn branch_without_upstream() {
    let repo = TestRepo::linear();
    repo.git(&["branch", "feature"]);
    let loaded = repo.open();

    assert_eq!(loaded.branches().len(), 2);
    for branch in loaded.branches() {
        assert!(!branch.is_remote());
        assert!(branch.upstream().is_none());
        assert!(!branch.is_clean());
        assert!(branch.ahead().is_empty());
        assert!(branch.behind().is_empty());
    }
    assert_eq!(loaded.current_branch().unwrap().name().as_str(), "main");
}

#[test]
fn current_branch_follows_checkout() {
    let repo = TestRepo::linear();
    repo.git(&["checkout", "-b", "feature"]);
    repo.commit_file("feature.txt", "f\n", "D");

    let loaded = repo.open();

    assert_eq!(loaded.current_branch().unwrap().name().as_str(), "feature");
    assert_eq!(summaries(&loaded), vec!["D", "C", "B", "A"]);
}

#[test]
fn detached_head_at_branch_tip_finds_branch() {
    let repo = TestRepo::linear();
    repo.git(&["checkout", "--detach", "HEAD"]);

    let loaded = repo.open();

    assert_eq!(loaded.current_branch().unwrap().name().as_str(), "main");
}

#[test]
fn detached_head_elsewhere_has_no_branch() {
    let repo = TestRepo::linear();
    repo.git(&["checkout", "--detach", "HEAD~1"]);

    let loaded = repo.open();

    assert!(loaded.current_branch().is_none());
    assert_eq!(summaries(&loaded), vec!["B", "A"]);
}

// =============================================================================
// Upstream tracking
// =============================================================================

#[test]
fn tracked_branch_in_sync_is_clean() {
    let repo = TestRepo::tracked();
    let loaded = repo.open();

    let main = loaded.current_branch().unwrap();
    let upstream = main.upstream().expect("main should track origin/main");

    assert_eq!(upstream.name(), "origin/main");
    assert!(upstream.is_remote());
    assert_eq!(&upstream.hash, main.hash());
    assert!(main.is_clean());
    assert!(main.ahead().is_empty());
    assert!(main.behind().is_empty());

    assert_eq!(summaries(&loaded), vec!["C", "B", "A"]);
    assert!(loaded
        .commits()
        .iter()
        .all(|c| c.commit_type == Some(CommitType::Even)));
}

#[test]
fn remote_tracking_branches_never_have_upstream() {
    let repo = TestRepo::tracked();
    let loaded = repo.open();

    let remote = loaded
        .branches()
        .iter()
        .find(|b| b.is_remote())
        .expect("origin/main should be listed");

    assert_eq!(remote.name().as_str(), "origin/main");
    assert_eq!(remote.full_name().as_str(), "refs/remotes/origin/main");
    assert!(remote.upstream().is_none());

    for branch in loaded.branches().iter().filter(|b| !b.is_remote()) {
        if let Some(upstream) = branch.upstream() {
            assert!(upstream.is_remote());
        }
    }
}

#[test]
fn local_commit_is_ahead() {
    let repo = TestRepo::tracked();
    let local = repo.commit_file("local.txt", "l\n", "D");

    let loaded = repo.open();
    let main = loaded.current_branch().unwrap();

    assert_eq!(main.ahead().len(), 1);
    assert_eq!(main.ahead()[0].hash.as_str(), local);
    assert_eq!(main.ahead()[0].commit_type, Some(CommitType::Local));
    assert!(main.behind().is_empty());
    assert!(!main.is_clean());

    // The walk starts at the upstream tip, so D is not in it.
    assert_eq!(summaries(&loaded), vec!["C", "B", "A"]);
    assert!(loaded
        .commits()
        .iter()
        .all(|c| c.commit_type == Some(CommitType::Even)));
}

#[test]
fn upstream_commit_is_behind_and_remote() {
    let repo = TestRepo::tracked();
    let remote_only = repo.commit_file("remote.txt", "r\n", "D");
    repo.git(&["push", "origin", "main"]);
    repo.git(&["reset", "--hard", "HEAD~1"]);

    let loaded = repo.open();
    let main = loaded.current_branch().unwrap();

    assert!(main.ahead().is_empty());
    assert_eq!(main.behind().len(), 1);
    assert_eq!(main.behind()[0].hash.as_str(), remote_only);
    assert_eq!(main.behind()[0].commit_type, Some(CommitType::Remote));
    assert!(!main.is_clean());

    assert_eq!(summaries(&loaded), vec!["D", "C", "B", "A"]);
    let types: Vec<_> = loaded.commits().iter().map(|c| c.commit_type).collect();
    assert_eq!(
        types,
        vec![
            Some(CommitType::Remote),
            Some(CommitType::Even),
            Some(CommitType::Even),
            Some(CommitType::Even),
        ]
    );
}

#[test]
fn local_upstream_is_dropped() {
    let repo = TestRepo::tracked();
    repo.git(&["branch", "--track", "feature", "main"]);

    let loaded = repo.open();

    let feature = loaded
        .branches()
        .iter()
        .find(|b| b.name().as_str() == "feature")
        .expect("feature should be listed");
    assert!(feature.upstream().is_none());
    assert!(!feature.is_clean());
    assert!(feature.ahead().is_empty());
    assert!(feature.behind().is_empty());

    let main = loaded.current_branch().unwrap();
    assert_eq!(main.upstream().unwrap().name(), "origin/main");
    for branch in loaded.branches() {
        if let Some(upstream) = branch.upstream() {
            assert!(upstream.is_remote());
        }
    }
}

#[test]
fn missing_upstream_ref_is_tolerated() {
    let repo = TestRepo::tracked();
    repo.git(&["update-ref", "-d", "refs/remotes/origin/main"]);

    let loaded = repo.open();
    let main = loaded.current_branch().unwrap();

    assert!(main.upstream().is_none());
    assert_eq!(summaries(&loaded), vec!["C", "B", "A"]);
    assert!(loaded.commits().iter().all(|c| c.commit_type.is_none()));
}

// =============================================================================
// Remotes
// =============================================================================

#[test]
fn remotes_are_loaded() {
    let repo = TestRepo::tracked();
    repo.git(&["remote", "add", "mirror", "https://example.com/mirror.git"]);
    repo.git(&[
        "remote",
        "set-url",
        "--push",
        "mirror",
        "git@example.com:mirror.git",
    ]);

    let loaded = repo.open();
    let names: Vec<_> = loaded.remotes().iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"origin"));
    assert!(names.contains(&"mirror"));

    let mirror = loaded.remotes().iter().find(|r| r.name == "mirror").unwrap();
    assert_eq!(
        mirror.urls,
        vec!["https://example.com/mirror.git", "git@example.com:mirror.git"]
    );
}

// =============================================================================
// Diffs
// =============================================================================

#[test]
fn root_commit_diff_has_no_old_side() {
    let repo = TestRepo::empty();
    std::fs::write(repo.path().join("a.txt"), "a\n").unwrap();
    std::fs::write(repo.path().join("b.txt"), "b\n").unwrap();
    repo.git(&["add", "."]);
    repo.git(&["commit", "-m", "root"]);

    let loaded = repo.open();
    let root = &loaded.commits()[0];
    let diff = loaded.diff(&root.commit_ref()).unwrap();

    assert_eq!(diff.deltas().len(), 2);
    for delta in diff.deltas() {
        assert_eq!(delta.status, DeltaStatus::Added);
        assert!(delta.old_file.path.is_empty());
        assert!(delta.old_file.hash.is_zero());
        assert!(!delta.new_file.path.is_empty());
    }
}

#[test]
fn deltas_and_patches_stay_aligned() {
    let repo = TestRepo::linear();
    let loaded = repo.open();

    for commit in loaded.commits() {
        let diff = loaded.diff(&commit.commit_ref()).unwrap();
        assert_eq!(diff.deltas().len(), diff.patches().len());
        for (delta, patch) in diff.deltas().iter().zip(diff.patches()) {
            assert_eq!(&delta.patch, patch);
        }
    }
}

#[test]
fn modification_diff_contents() {
    let repo = TestRepo::linear();
    let loaded = repo.open();
    let b = loaded.commits().iter().find(|c| c.summary == "B").unwrap();

    let diff = loaded.diff(&b.commit_ref()).unwrap();

    assert_eq!(diff.deltas().len(), 1);
    let delta = &diff.deltas()[0];
    assert_eq!(delta.status, DeltaStatus::Modified);
    assert_eq!(delta.path(), "README.md");
    assert!(delta.patch.contains("+More."));
    assert!(delta.patch_string().starts_with("patch: "));

    let shown = delta.to_string();
    assert!(shown.starts_with("3 README.md "));
    assert!(shown.ends_with(&format!(
        "{}..{}",
        &delta.old_file.hash.as_str()[..7],
        &delta.new_file.hash.as_str()[..7]
    )));

    let summary = diff.stats().last().expect("stats should have a summary");
    assert!(summary.contains("1 file changed"));
}

#[test]
fn merge_diff_uses_first_parent_only() {
    let repo = TestRepo::linear();
    repo.git(&["checkout", "-b", "side", "HEAD~1"]);
    repo.commit_file("side.txt", "side\n", "S");
    repo.git(&["checkout", "main"]);
    repo.git(&["merge", "--no-ff", "--no-edit", "-m", "M", "side"]);

    let loaded = repo.open();
    let merge = &loaded.commits()[0];
    assert_eq!(merge.summary, "M");

    let diff = loaded.diff(&merge.commit_ref()).unwrap();

    // Against C only side.txt is new; against S it would be src.txt.
    assert_eq!(diff.deltas().len(), 1);
    let delta = &diff.deltas()[0];
    assert_eq!(delta.status, DeltaStatus::Added);
    assert_eq!(delta.path(), "side.txt");
}

#[test]
fn deletion_diff_has_no_new_side() {
    let repo = TestRepo::linear();
    repo.git(&["rm", "src.txt"]);
    repo.git(&["commit", "-m", "D"]);

    let loaded = repo.open();
    let diff = loaded.diff(&loaded.commits()[0].commit_ref()).unwrap();

    assert_eq!(diff.deltas().len(), 1);
    let delta = &diff.deltas()[0];
    assert_eq!(delta.status, DeltaStatus::Deleted);
    assert!(delta.new_file.path.is_empty());
    assert_eq!(delta.path(), "src.txt");
    assert!(delta.patch.contains("-source"));
}

#[test]
fn diff_from_hash_matches_diff() {
    let repo = TestRepo::linear();
    let loaded = repo.open();

    for commit in loaded.commits() {
        let by_ref = loaded.diff(&commit.commit_ref()).unwrap();
        let by_hash = loaded.diff_from_hash(commit.hash.as_str()).unwrap();
        let by_prefix = loaded.diff_from_hash(commit.hash.short(10)).unwrap();
        assert_eq!(by_ref, by_hash);
        assert_eq!(by_ref, by_prefix);
    }
}

#[test]
fn diff_from_hash_errors() {
    let repo = TestRepo::linear();
    let loaded = repo.open();

    assert!(matches!(
        loaded.diff_from_hash("not-a-hash"),
        Err(GitError::InvalidOid { .. })
    ));

    let missing = Oid::new("0123456789abcdef0123456789abcdef01234567").unwrap();
    assert!(matches!(
        loaded.diff_from_hash(missing.as_str()),
        Err(GitError::ObjectNotFound { .. })
    ));

    let tree = repo.rev_parse("HEAD^{tree}");
    assert!(matches!(
        loaded.diff_from_hash(&tree),
        Err(GitError::NotACommit { .. })
    ));
}

#[test]
fn commit_lookup_by_hash() {
    let repo = TestRepo::linear();
    let loaded = repo.open();
    let head = repo.rev_parse("HEAD");

    let handle = loaded.commit_ref(&head[..8]).unwrap();
    assert_eq!(handle.oid().as_str(), head);

    let commit = loaded.commit(&handle).unwrap();
    assert_eq!(commit.summary, "C");
}

#[test]
fn rename_detection_is_configurable() {
    let repo = TestRepo::linear();
    repo.git(&["mv", "src.txt", "moved.txt"]);
    repo.git(&["commit", "-m", "move"]);

    let plain = repo.open();
    let diff = plain.diff(&plain.commits()[0].commit_ref()).unwrap();
    assert_eq!(diff.deltas().len(), 2);

    let mut options = gitscope::repo::RepoOptions::default();
    options.diff.detect_renames = true;
    let renaming = Repository::open_with(&repo.path(), &options).unwrap();
    let diff = renaming
        .diff(&renaming.commits()[0].commit_ref())
        .unwrap();

    assert_eq!(diff.deltas().len(), 1);
    let delta = &diff.deltas()[0];
    assert_eq!(delta.status, DeltaStatus::Renamed);
    assert_eq!(delta.to_string(), "4 src.txt -> moved.txt");
}

#[test]
fn reverse_walk_is_oldest_first() {
    let repo = TestRepo::linear();
    let options = gitscope::repo::RepoOptions {
        walk_reverse: true,
        ..Default::default()
    };

    let loaded = Repository::open_with(&repo.path(), &options).unwrap();

    assert_eq!(summaries(&loaded), vec!["A", "B", "C"]);
}
