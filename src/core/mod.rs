//! Core building blocks shared by every command
//!
//! - **config**: project configuration (`pts.toml`) loading
//! - **error**: error types with contextual help messages
//! - **vcs**: revision metadata from git (`SystemGit`)

pub mod config;
pub mod error;
pub mod vcs;
