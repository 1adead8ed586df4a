//! core
//!
//! Domain types and configuration for gitscope.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid, RefName, RepoId
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and reject unknown keys

pub mod config;
pub mod types;
