//! `.sha256` sidecar files

use crate::core::error::{PtsResult, ResultExt};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of checksum files; inputs carrying it are skipped
pub const CHECKSUM_SUFFIX: &str = ".sha256";

/// Lowercase hex SHA-256 of the file's full content
pub fn sha256_hex(path: &Path) -> PtsResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(format!("{:x}", hasher.finalize()))
}

/// Write `<path>.sha256` holding the bare hex digest.
///
/// Returns the checksum path, or `None` when `path` is itself a checksum file
/// or not an existing regular file. Those cases are not errors.
pub fn write_checksum(path: &Path) -> PtsResult<Option<PathBuf>> {
  if path.to_string_lossy().ends_with(CHECKSUM_SUFFIX) || !path.is_file() {
    return Ok(None);
  }

  let digest = sha256_hex(path)?;
  let mut target = path.as_os_str().to_owned();
  target.push(CHECKSUM_SUFFIX);
  let target = PathBuf::from(target);

  fs::write(&target, digest).with_context(|| format!("Failed to write {}", target.display()))?;
  Ok(Some(target))
}
