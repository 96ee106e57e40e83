//! Build metadata captured once per pipeline run

use crate::core::error::PtsResult;
use crate::core::vcs::RevisionSource;
use chrono::{DateTime, FixedOffset, Local};
use std::path::Path;

/// Values stamped into every binary of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetadata {
  pub version: String,
  /// RFC 2822 timestamp, e.g. `Tue, 14 Oct 2025 09:30:00 +0200`
  pub build_date: String,
  pub git_rev: String,
  pub git_commit: String,
}

impl BuildMetadata {
  /// Capture metadata for `source_dir`, stamping the current local time.
  ///
  /// A failed revision query is returned as an error; no job may run with
  /// stale or missing metadata.
  pub fn capture(version: &str, source_dir: &Path, vcs: &dyn RevisionSource) -> PtsResult<Self> {
    let now: DateTime<FixedOffset> = Local::now().fixed_offset();
    Self::capture_at(version, source_dir, vcs, now)
  }

  pub fn capture_at(
    version: &str,
    source_dir: &Path,
    vcs: &dyn RevisionSource,
    at: DateTime<FixedOffset>,
  ) -> PtsResult<Self> {
    let revision = vcs.revision(source_dir)?;

    Ok(Self {
      version: version.to_string(),
      build_date: at.to_rfc2822(),
      git_rev: revision.count,
      git_commit: revision.commit,
    })
  }

  /// `-X` definitions for the link step, targeting variables in `package`
  pub fn link_variables(&self, package: &str) -> Vec<String> {
    [
      ("buildVersion", &self.version),
      ("buildDate", &self.build_date),
      ("buildGitRev", &self.git_rev),
      ("buildGitCommit", &self.git_commit),
    ]
    .iter()
    .map(|(name, value)| format!("-X '{}.{}={}'", package, name, value))
    .collect()
  }
}
