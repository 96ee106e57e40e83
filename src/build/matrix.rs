//! Build matrix expansion: binaries x platforms -> ordered build jobs

use crate::core::config::BinaryConfig;
use crate::core::error::{ConfigError, PtsResult};
use std::fmt;

/// A compilation target as the toolchain names it (`GOOS`/`GOARCH` style)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
  pub os: String,
  pub arch: String,
}

impl Platform {
  /// Parse an `os/arch` string; surrounding whitespace is ignored
  pub fn parse(value: &str) -> PtsResult<Self> {
    let invalid = || ConfigError::InvalidPlatform {
      value: value.to_string(),
    };

    let (os, arch) = value.trim().split_once('/').ok_or_else(invalid)?;
    let (os, arch) = (os.trim(), arch.trim());
    if os.is_empty() || arch.is_empty() || arch.contains('/') {
      return Err(invalid().into());
    }

    Ok(Self {
      os: os.to_string(),
      arch: arch.to_string(),
    })
  }

  /// The platform pts itself is running on, in toolchain naming
  pub fn host() -> Self {
    let os = match std::env::consts::OS {
      "macos" => "darwin",
      other => other,
    };
    let arch = match std::env::consts::ARCH {
      "x86_64" => "amd64",
      "aarch64" => "arm64",
      "x86" => "386",
      "powerpc64" => "ppc64",
      "s390x" => "s390x",
      other => other,
    };

    Self {
      os: os.to_string(),
      arch: arch.to_string(),
    }
  }

  pub fn is_windows(&self) -> bool {
    self.os == "windows"
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}

/// One (binary, platform) compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
  pub binary_name: String,
  /// Package path handed to the compiler, relative to the source directory
  pub source_path: String,
  pub platform: Platform,
}

/// Expand binaries x platforms into build jobs, row-major.
///
/// An empty binary list means a single binary named `project_name` at `.`;
/// an empty platform list means the host platform. Duplicates are kept.
pub fn expand(project_name: &str, binaries: &[BinaryConfig], platforms: &[String]) -> PtsResult<Vec<BuildJob>> {
  let platforms = if platforms.is_empty() {
    vec![Platform::host()]
  } else {
    platforms.iter().map(|p| Platform::parse(p)).collect::<PtsResult<Vec<_>>>()?
  };

  let default_binary;
  let binaries = if binaries.is_empty() {
    default_binary = [BinaryConfig {
      name: project_name.to_string(),
      path: ".".to_string(),
    }];
    &default_binary[..]
  } else {
    binaries
  };

  let mut jobs = Vec::with_capacity(binaries.len() * platforms.len());
  for binary in binaries {
    for platform in &platforms {
      jobs.push(BuildJob {
        binary_name: binary.name.clone(),
        source_path: binary.path.clone(),
        platform: platform.clone(),
      });
    }
  }

  Ok(jobs)
}
