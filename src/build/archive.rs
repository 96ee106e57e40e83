//! Single-entry release archives (zip, tar.gz)

use crate::core::error::{ConfigError, PtsError, PtsResult, ResultExt};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
  Zip,
  TarGz,
}

impl ArchiveFormat {
  /// File extension, without the leading dot
  pub fn extension(self) -> &'static str {
    match self {
      ArchiveFormat::Zip => "zip",
      ArchiveFormat::TarGz => "tar.gz",
    }
  }
}

impl FromStr for ArchiveFormat {
  type Err = PtsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "zip" => Ok(ArchiveFormat::Zip),
      "tar.gz" | "tgz" => Ok(ArchiveFormat::TarGz),
      _ => Err(
        ConfigError::InvalidArchiveFormat {
          value: s.to_string(),
        }
        .into(),
      ),
    }
  }
}

impl fmt::Display for ArchiveFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}

/// Archive path for a raw binary: `.exe` stripped, format extension added
pub fn archive_path(binary: &Path, format: ArchiveFormat) -> PathBuf {
  let file_name = binary.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
  let stem = file_name.strip_suffix(".exe").unwrap_or(&file_name);
  binary.with_file_name(format!("{}.{}", stem, format.extension()))
}

/// Name of the single entry inside the archive
pub fn entry_name(binary_name: &str, windows: bool) -> String {
  if windows {
    format!("{}.exe", binary_name)
  } else {
    binary_name.to_string()
  }
}

/// Write `source` into a new archive at `dest` as `entry`
pub fn write_archive(format: ArchiveFormat, source: &Path, dest: &Path, entry: &str) -> PtsResult<()> {
  let written = match format {
    ArchiveFormat::Zip => write_zip(source, dest, entry),
    ArchiveFormat::TarGz => write_tar_gz(source, dest, entry),
  };
  written.with_context(|| format!("Failed to create archive {}", dest.display()))
}

fn write_zip(source: &Path, dest: &Path, entry: &str) -> PtsResult<()> {
  let mut input = File::open(source)?;
  let output = File::create(dest)?;

  let options = SimpleFileOptions::default()
    .compression_method(zip::CompressionMethod::Deflated)
    .unix_permissions(unix_mode(source));

  let mut zip = zip::ZipWriter::new(output);
  zip.start_file(entry, options)?;
  io::copy(&mut input, &mut zip)?;
  zip.finish()?;
  Ok(())
}

fn write_tar_gz(source: &Path, dest: &Path, entry: &str) -> PtsResult<()> {
  let output = File::create(dest)?;
  let encoder = GzEncoder::new(output, Compression::default());

  let mut tar = tar::Builder::new(encoder);
  tar.append_path_with_name(source, entry)?;
  tar.into_inner()?.finish()?;
  Ok(())
}

#[cfg(unix)]
fn unix_mode(path: &Path) -> u32 {
  use std::os::unix::fs::PermissionsExt;
  fs::metadata(path).map(|m| m.permissions().mode() & 0o777).unwrap_or(0o755)
}

#[cfg(not(unix))]
fn unix_mode(_path: &Path) -> u32 {
  0o755
}
