use crate::core::error::{PtsResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project configuration for pts
/// Searched in order: pts.toml, .pts.toml, .config/pts.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PtsConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub build: BuildConfig,
}

/// `[project]` table: the `{name, version, module}` triple
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Project name (default: source directory name)
  #[serde(default)]
  pub name: Option<String>,

  /// Release version (default: contents of VERSION or VERSION.txt)
  #[serde(default)]
  pub version: Option<String>,

  /// Module import path, informational
  #[serde(default)]
  pub module: Option<String>,
}

/// `[build]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Binaries to build; empty means one binary named after the project at `.`
  #[serde(default)]
  pub binaries: Vec<BinaryConfig>,

  /// Target platforms as `os/arch`; empty means the host platform
  #[serde(default)]
  pub platforms: Vec<String>,

  /// Extra `KEY=VALUE` environment entries for the compiler
  #[serde(default)]
  pub env: Vec<String>,

  /// Extra compiler flags, whitespace separated
  #[serde(default)]
  pub flags: Option<String>,

  /// Extra link flags appended after the version stamps
  #[serde(default)]
  pub ldflags: Option<String>,

  /// Archive format: `zip` or `tar.gz`
  #[serde(default)]
  pub archive: Option<String>,

  /// Output directory (default: `_releases`)
  #[serde(default)]
  pub output_dir: Option<PathBuf>,

  /// Write `.sha256` files next to artifacts (default: true)
  #[serde(default)]
  pub checksum: Option<bool>,

  /// Package receiving the `-X` version stamps (default: `main`)
  #[serde(default)]
  pub stamp_package: Option<String>,
}

/// One `[[build.binaries]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfig {
  pub name: String,
  #[serde(default = "default_binary_path")]
  pub path: String,
}

fn default_binary_path() -> String {
  ".".to_string()
}

impl PtsConfig {
  /// Find config file in search order: pts.toml, .pts.toml, .config/pts.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("pts.toml"),
      path.join(".pts.toml"),
      path.join(".config").join("pts.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load config from `path`, or defaults when no config file exists
  pub fn load(path: &Path) -> PtsResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: PtsConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(config)
  }

  /// Project name: configured value, else the source directory's name
  pub fn project_name(&self, source_dir: &Path) -> Option<String> {
    if let Some(name) = self.project.name.as_ref().filter(|n| !n.trim().is_empty()) {
      return Some(name.trim().to_string());
    }

    let absolute = fs::canonicalize(source_dir).unwrap_or_else(|_| source_dir.to_path_buf());
    absolute.file_name().map(|n| n.to_string_lossy().to_string())
  }

  /// Project version: configured value, else the first VERSION file found
  pub fn project_version(&self, source_dir: &Path) -> PtsResult<Option<String>> {
    if let Some(version) = self.project.version.as_ref().filter(|v| !v.trim().is_empty()) {
      return Ok(Some(version.trim().to_string()));
    }

    for candidate in ["VERSION", "VERSION.txt"] {
      let path = source_dir.join(candidate);
      if path.is_file() {
        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let version = content.trim();
        if !version.is_empty() {
          return Ok(Some(version.to_string()));
        }
      }
    }

    Ok(None)
  }
}
