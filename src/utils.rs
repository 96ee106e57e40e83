//! Path helpers shared by the file-consuming commands

use crate::core::error::{ConfigError, PtsError, PtsResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Expand command-line paths into the files they name.
///
/// Files are kept as given. Directories expand to their direct regular-file
/// children, sorted by name; subdirectories are not descended into. Anything
/// else is an error.
pub fn collect_files(paths: &[PathBuf]) -> PtsResult<Vec<PathBuf>> {
  let mut files = Vec::new();
  for path in paths {
    if path.is_file() {
      files.push(path.clone());
    } else if path.is_dir() {
      files.extend(dir_files(path)?);
    } else {
      return Err(ConfigError::PathNotFound { path: path.clone() }.into());
    }
  }
  Ok(files)
}

fn dir_files(dir: &Path) -> PtsResult<Vec<PathBuf>> {
  let entries = fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

  let mut files = Vec::new();
  for entry in entries {
    let path = entry?.path();
    if path.is_file() {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}

/// Final path component as a string, for remote file and asset names
pub fn base_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Trimmed non-empty value, or a "no --field provided" error
pub fn required(value: &Option<String>, field: &str) -> PtsResult<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
    .ok_or_else(|| PtsError::missing(field))
}
