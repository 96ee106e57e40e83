//! Tests for the `checksum` command

use crate::helpers::*;
use anyhow::Result;
use tempfile::TempDir;

// sha256("hello world")
const HELLO_DIGEST: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

#[test]
fn test_checksum_file_and_directory() -> Result<()> {
  let temp = TempDir::new()?;
  let dist = temp.path().join("dist");
  std::fs::create_dir_all(dist.join("nested"))?;
  std::fs::write(dist.join("app.zip"), "hello world")?;
  std::fs::write(dist.join("nested/skip.zip"), "nested")?;
  std::fs::write(temp.path().join("notes.txt"), "hello world")?;

  let output = run_pts_ok(temp.path(), &["checksum", "dist", "notes.txt"])?;
  assert!(stdout(&output).trim_end().ends_with("Completed!"));

  assert_eq!(std::fs::read_to_string(dist.join("app.zip.sha256"))?, HELLO_DIGEST);
  assert_eq!(std::fs::read_to_string(temp.path().join("notes.txt.sha256"))?, HELLO_DIGEST);
  // Only direct children of a directory are hashed
  assert!(!dist.join("nested/skip.zip.sha256").exists());
  Ok(())
}

#[test]
fn test_checksum_rerun_is_stable_and_skips_sidecars() -> Result<()> {
  let temp = TempDir::new()?;
  std::fs::write(temp.path().join("app.tar.gz"), "hello world")?;

  run_pts_ok(temp.path(), &["checksum", "."])?;
  let first = std::fs::read(temp.path().join("app.tar.gz.sha256"))?;

  // Second run sees the sidecar in the directory but must not hash it
  run_pts_ok(temp.path(), &["checksum", "."])?;
  let second = std::fs::read(temp.path().join("app.tar.gz.sha256"))?;

  assert_eq!(first, second);
  assert!(!temp.path().join("app.tar.gz.sha256.sha256").exists());
  Ok(())
}

#[test]
fn test_checksum_missing_path_fails() -> Result<()> {
  let temp = TempDir::new()?;
  std::fs::write(temp.path().join("a.zip"), "a")?;

  let output = run_pts(temp.path(), &["checksum", "ghost.zip", "a.zip"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("file not exists: ghost.zip"));
  // Arguments are all resolved before anything is written
  assert!(!temp.path().join("a.zip.sha256").exists());
  Ok(())
}
