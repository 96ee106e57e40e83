//! Argument validation for the publishing commands
//!
//! Every case here fails before any network request is attempted.

use crate::helpers::*;
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_repo_create_repo_requires_subject() -> Result<()> {
  let temp = TempDir::new()?;
  let output = run_pts(temp.path(), &["repo", "create-repo", "--name", "tools"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no --subject provided"));
  assert!(!stdout(&output).contains("Completed!"));
  Ok(())
}

#[test]
fn test_repo_identity_from_environment() -> Result<()> {
  let temp = TempDir::new()?;
  let output = pts_command(temp.path(), &["repo", "create-version", "--repo", "tools"])
    .env("BINTRAY_SUBJECT", "acme")
    .env("BINTRAY_APIKEY", "secret")
    .output()?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no --package provided"));
  Ok(())
}

#[test]
fn test_repo_upload_requires_files() -> Result<()> {
  let temp = TempDir::new()?;
  let output = run_pts(
    temp.path(),
    &[
      "repo",
      "upload",
      "--subject",
      "acme",
      "--apikey",
      "secret",
      "--repo",
      "tools",
      "--package",
      "app",
      "--version",
      "1.0.0",
    ],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no dir or file provided"));
  Ok(())
}

#[test]
fn test_repo_upload_rejects_missing_file() -> Result<()> {
  let temp = TempDir::new()?;
  let output = pts_command(
    temp.path(),
    &["repo", "upload", "--repo", "tools", "--package", "app", "--version", "1.0.0", "missing.zip"],
  )
  .env("BINTRAY_SUBJECT", "acme")
  .env("BINTRAY_APIKEY", "secret")
  .env("BINTRAY_VERSION", "ignored")
  .output()?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("file not exists: missing.zip"));
  Ok(())
}

#[test]
fn test_release_upload_requires_token() -> Result<()> {
  let temp = TempDir::new()?;
  let output = run_pts(
    temp.path(),
    &["release", "upload", "--repo", "acme/tool", "--tag", "v1", "."],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no --token provided"));
  Ok(())
}

#[test]
fn test_release_upload_requires_owner() -> Result<()> {
  let temp = TempDir::new()?;
  let output = pts_command(temp.path(), &["release", "upload", "--tag", "v1", "."])
    .env("GITHUB_TOKEN", "t0ken")
    .env("GITHUB_REPO", "tool")
    .output()?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no --owner provided"));
  Ok(())
}

#[test]
fn test_build_missing_source_dir() -> Result<()> {
  let temp = TempDir::new()?;
  let output = run_pts(temp.path(), &["build", "--version", "1.0.0", "--source-dir", "nope"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("source-dir does not exist"));
  Ok(())
}

#[test]
fn test_unknown_subcommand_is_usage_error() -> Result<()> {
  let temp = TempDir::new()?;
  let output = run_pts(temp.path(), &["deploy"])?;
  assert_eq!(output.status.code(), Some(2));
  Ok(())
}
