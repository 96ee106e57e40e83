//! Version-control access for build metadata
//!
//! The build pipeline only needs two facts from the working copy: how many
//! commits lead to HEAD and a short name for HEAD. [`RevisionSource`] is the
//! seam; [`SystemGit`] is the production implementation.

pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::PtsResult;
use std::path::Path;

/// Revision facts stamped into every binary of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
  /// Number of commits reachable from HEAD
  pub count: String,
  /// Nearest tag, or abbreviated commit hash when no tag exists
  pub commit: String,
}

/// Anything that can describe the revision of a source directory
pub trait RevisionSource {
  /// Query revision metadata for `source_dir`. Failure aborts the whole run.
  fn revision(&self, source_dir: &Path) -> PtsResult<Revision>;
}
