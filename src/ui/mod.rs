//! ui
//!
//! Terminal presentation.
//!
//! # Modules
//!
//! - [`output`] - Where text goes, and whether it goes at all
//! - [`render`] - How commits, branches, remotes and diffs look
//!
//! # Design
//!
//! All user-facing output goes through this module. Diagnostics go through
//! `tracing` instead.

pub mod output;
pub mod render;
