//! System git backend
//!
//! Uses git plumbing commands through a subprocess with an isolated environment.

use super::{Revision, RevisionSource};
use crate::core::error::{PtsError, PtsResult, ToolchainError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Directory git is pointed at with `-C`
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open the git working copy containing `path`
  ///
  /// Fails when `path` is not inside a git working copy.
  pub fn open(path: &Path) -> PtsResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .map_err(|e| ToolchainError::Spawn {
        program: "git".to_string(),
        reason: e.to_string(),
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(PtsError::Toolchain(ToolchainError::CommandFailed {
        command: format!("git -C {} rev-parse --show-toplevel", path.display()),
        status: output.status.to_string(),
        stderr: stderr.to_string(),
      }));
    }

    debug!(
      path = %path.display(),
      work_tree = %String::from_utf8_lossy(&output.stdout).trim(),
      "opened git working copy"
    );

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Number of commits reachable from HEAD (`git rev-list HEAD --count`)
  pub fn revision_count(&self) -> PtsResult<String> {
    self.run(&["rev-list", "HEAD", "--count"])
  }

  /// Nearest tag, falling back to the abbreviated commit (`git describe --abbrev=0 --always`)
  pub fn describe(&self) -> PtsResult<String> {
    self.run(&["describe", "--abbrev=0", "--always"])
  }

  /// Run a git command and return trimmed stdout
  fn run(&self, args: &[&str]) -> PtsResult<String> {
    debug!(repo = %self.repo_path.display(), args = ?args, "running git");

    let output = self.git_cmd().args(args).output().map_err(|e| ToolchainError::Spawn {
      program: "git".to_string(),
      reason: e.to_string(),
    })?;

    if !output.status.success() {
      return Err(PtsError::Toolchain(ToolchainError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

impl RevisionSource for SystemGit {
  fn revision(&self, source_dir: &Path) -> PtsResult<Revision> {
    let git = if source_dir == self.repo_path {
      None
    } else {
      Some(SystemGit::open(source_dir)?)
    };
    let git = git.as_ref().unwrap_or(self);

    Ok(Revision {
      count: git.revision_count()?,
      commit: git.describe()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::process::Command;
  use tempfile::TempDir;

  fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git").current_dir(dir).args(args).output().unwrap();
    assert!(status.status.success(), "git {:?} failed", args);
  }

  fn repo_with_commits(n: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "--initial-branch=main"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    for i in 0..n {
      std::fs::write(dir.path().join("file.txt"), format!("rev {}", i)).unwrap();
      git(dir.path(), &["add", "."]);
      git(dir.path(), &["commit", "-m", &format!("commit {}", i)]);
    }
    dir
  }

  #[test]
  fn test_revision_count_and_describe_without_tags() {
    let dir = repo_with_commits(3);
    let git = SystemGit::open(dir.path()).unwrap();
    let rev = git.revision(dir.path()).unwrap();
    assert_eq!(rev.count, "3");
    assert!(rev.commit.len() >= 7);
    assert!(rev.commit.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn test_describe_prefers_tag() {
    let dir = repo_with_commits(2);
    git(dir.path(), &["tag", "-a", "v1.2.0", "-m", "v1.2.0"]);
    let git = SystemGit::open(dir.path()).unwrap();
    assert_eq!(git.describe().unwrap(), "v1.2.0");
  }

  #[test]
  fn test_open_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    assert!(SystemGit::open(dir.path()).is_err());
  }

  #[test]
  fn test_revision_without_commits_fails() {
    let dir = repo_with_commits(0);
    let git = SystemGit::open(dir.path()).unwrap();
    assert!(git.revision(dir.path()).is_err());
  }
}
