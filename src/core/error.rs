//! Error types for pts with contextual messages
//!
//! Every fallible operation returns a [`PtsResult`]. Nothing below `main` decides
//! whether to keep going: the first error bubbles up, gets printed once by
//! [`print_error`], and the process exits non-zero.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for pts
#[derive(Debug)]
pub enum PtsError {
  /// Configuration errors (missing flags, bad config values)
  Config(ConfigError),

  /// Compiler or version-control subprocess errors
  Toolchain(ToolchainError),

  /// Remote API errors
  Remote(RemoteError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PtsError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PtsError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PtsError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Shorthand for a missing required flag or config value
  pub fn missing(field: impl Into<String>) -> Self {
    PtsError::Config(ConfigError::MissingField { field: field.into() })
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PtsError::Message { message, context, help } => PtsError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PtsError::Io(err) => PtsError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      other => PtsError::Message {
        message: ctx_str,
        context: Some(other.to_string()),
        help: other.help_message(),
      },
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PtsError::Config(e) => e.help_message(),
      PtsError::Toolchain(e) => e.help_message(),
      PtsError::Remote(e) => e.help_message(),
      PtsError::Message { help, .. } => help.clone(),
      PtsError::Io(_) => None,
    }
  }
}

impl fmt::Display for PtsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PtsError::Config(e) => write!(f, "{}", e),
      PtsError::Toolchain(e) => write!(f, "{}", e),
      PtsError::Remote(e) => write!(f, "{}", e),
      PtsError::Io(e) => write!(f, "I/O error: {}", e),
      PtsError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PtsError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PtsError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PtsError {
  fn from(err: io::Error) -> Self {
    PtsError::Io(err)
  }
}

impl From<String> for PtsError {
  fn from(msg: String) -> Self {
    PtsError::message(msg)
  }
}

impl From<&str> for PtsError {
  fn from(msg: &str) -> Self {
    PtsError::message(msg)
  }
}

impl From<ConfigError> for PtsError {
  fn from(err: ConfigError) -> Self {
    PtsError::Config(err)
  }
}

impl From<ToolchainError> for PtsError {
  fn from(err: ToolchainError) -> Self {
    PtsError::Toolchain(err)
  }
}

impl From<RemoteError> for PtsError {
  fn from(err: RemoteError) -> Self {
    PtsError::Remote(err)
  }
}

impl From<toml_edit::de::Error> for PtsError {
  fn from(err: toml_edit::de::Error) -> Self {
    PtsError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for PtsError {
  fn from(err: serde_json::Error) -> Self {
    PtsError::message(format!("JSON error: {}", err))
  }
}

impl From<zip::result::ZipError> for PtsError {
  fn from(err: zip::result::ZipError) -> Self {
    PtsError::message(format!("Zip archive error: {}", err))
  }
}

/// Configuration-related errors, all detected before any side effect
#[derive(Debug)]
pub enum ConfigError {
  /// Required flag / env var / config value not provided
  MissingField { field: String },

  /// Source directory does not exist or is not a directory
  SourceDirNotFound { path: PathBuf },

  /// Platform string is not `os/arch`
  InvalidPlatform { value: String },

  /// Archive format is not `zip` or `tar.gz`
  InvalidArchiveFormat { value: String },

  /// Positional path is neither a file nor a directory
  PathNotFound { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!(
        "Pass --{} or set the matching environment variable.",
        field.trim_start_matches("--")
      )),
      ConfigError::InvalidPlatform { .. } => {
        Some("Platforms are written as os/arch, e.g. linux/amd64 or windows/arm64.".to_string())
      }
      ConfigError::InvalidArchiveFormat { .. } => Some("Supported archive formats: zip, tar.gz".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field } => write!(f, "no --{} provided", field.trim_start_matches("--")),
      ConfigError::SourceDirNotFound { path } => {
        write!(f, "source-dir does not exist: {}", path.display())
      }
      ConfigError::InvalidPlatform { value } => write!(f, "invalid platform '{}'", value),
      ConfigError::InvalidArchiveFormat { value } => write!(f, "unsupported archive format '{}'", value),
      ConfigError::PathNotFound { path } => write!(f, "file not exists: {}", path.display()),
    }
  }
}

/// Subprocess errors from the compiler or version control
#[derive(Debug)]
pub enum ToolchainError {
  /// Executable could not be spawned at all
  Spawn { program: String, reason: String },

  /// Process ran and exited unsuccessfully
  CommandFailed { command: String, status: String, stderr: String },
}

impl ToolchainError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolchainError::Spawn { program, .. } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      ToolchainError::CommandFailed { command, .. } if command.starts_with("git") => {
        Some("Build metadata is read from git; run pts inside a git working copy with at least one commit.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ToolchainError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolchainError::Spawn { program, reason } => write!(f, "Failed to execute {}: {}", program, reason),
      ToolchainError::CommandFailed { command, status, stderr } => {
        write!(f, "Command failed ({}): {}", status, command)?;
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Remote API errors
#[derive(Debug)]
pub enum RemoteError {
  /// Request never produced a response (DNS, TLS, connection reset...)
  Transport { url: String, reason: String },

  /// Non-2xx response; `message` is the remote's own error text when available
  Status { status: u16, message: String },

  /// 2xx response whose body could not be decoded
  InvalidBody { url: String, reason: String },

  /// Release already has an asset with this name and override is off
  AssetExists { name: String },
}

impl RemoteError {
  /// HTTP status carried by this error, if any
  pub fn status(&self) -> Option<u16> {
    match self {
      RemoteError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  fn help_message(&self) -> Option<String> {
    if let RemoteError::AssetExists { .. } = self {
      return Some("Re-run with --override to replace the existing asset.".to_string());
    }
    match self.status()? {
      401 | 403 => Some("Check the credentials (apikey / token) and their permissions.".to_string()),
      409 => Some("The entity already exists. Re-run with --force to tolerate it.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for RemoteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RemoteError::Transport { url, reason } => write!(f, "Request to {} failed: {}", url, reason),
      RemoteError::Status { message, .. } => write!(f, "{}", message),
      RemoteError::InvalidBody { url, reason } => write!(f, "Unexpected response from {}: {}", url, reason),
      RemoteError::AssetExists { name } => write!(f, "asset already exists: {}", name),
    }
  }
}

/// Result type alias for pts
pub type PtsResult<T> = Result<T, PtsError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PtsResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PtsResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PtsError>,
{
  fn context(self, ctx: impl Into<String>) -> PtsResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PtsResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PtsError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
