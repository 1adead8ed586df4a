//! gitscope - Branches, commits and diffs of a local Git repository
//!
//! gitscope opens a Git repository and presents it as an in-memory model:
//! branches with their upstreams and ahead/behind state, the walked commit
//! history classified against the upstream, configured remotes, and
//! per-commit diffs with stats and patches.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, renders the model)
//! - [`repo`] - The repository model: loading, classification, diffs
//! - [`git`] - Single interface to the Git object store
//! - [`core`] - Domain types and configuration
//! - [`ui`] - Terminal output and rendering
//!
//! # Invariants
//!
//! 1. Only [`git`] talks to libgit2; every other layer sees owned values
//! 2. Loading is all-or-nothing: a fatal error yields no repository
//! 3. Nothing writes to the repository

pub mod cli;
pub mod core;
pub mod git;
pub mod repo;
pub mod ui;
