//! Compiler invocation
//!
//! The pipeline describes each compilation as a [`CompileRequest`] and hands it
//! to a [`Compiler`]. [`GoToolchain`] shells out to `go build`; tests plug in
//! fakes that write placeholder binaries.

use crate::core::error::{PtsResult, ToolchainError};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Everything needed for one compiler run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
  /// Working directory of the compiler process
  pub source_dir: PathBuf,
  /// Package path argument, relative to `source_dir`
  pub package: String,
  pub target_os: String,
  pub target_arch: String,
  /// Absolute path of the binary to produce
  pub output: PathBuf,
  /// Complete link-flag set: version stamps followed by user flags
  pub ldflags: Vec<String>,
  /// Extra compiler flags, passed before the package argument
  pub flags: Vec<String>,
  /// Extra environment entries
  pub env: Vec<(String, String)>,
}

/// A toolchain able to compile one request
pub trait Compiler {
  /// Compile `request`. A non-zero exit must be reported as an error.
  fn compile(&self, request: &CompileRequest) -> PtsResult<()>;
}

/// `go build` with `GOOS`/`GOARCH` overrides
pub struct GoToolchain {
  program: String,
}

impl GoToolchain {
  pub fn new() -> Self {
    Self {
      program: "go".to_string(),
    }
  }

  /// Arguments after the program name
  pub fn args(request: &CompileRequest) -> Vec<String> {
    let mut args = vec![
      "build".to_string(),
      "-ldflags".to_string(),
      request.ldflags.join(" "),
      "-o".to_string(),
      request.output.to_string_lossy().to_string(),
    ];
    args.extend(request.flags.iter().cloned());
    args.push(request.package.clone());
    args
  }
}

impl Default for GoToolchain {
  fn default() -> Self {
    Self::new()
  }
}

impl Compiler for GoToolchain {
  fn compile(&self, request: &CompileRequest) -> PtsResult<()> {
    let args = Self::args(request);
    debug!(program = %self.program, dir = %request.source_dir.display(), args = ?args, "running compiler");

    // Compiler output streams straight to the console
    let status = Command::new(&self.program)
      .args(&args)
      .current_dir(&request.source_dir)
      .env("PWD", &request.source_dir)
      .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
      .env("GOOS", &request.target_os)
      .env("GOARCH", &request.target_arch)
      .status()
      .map_err(|e| ToolchainError::Spawn {
        program: self.program.clone(),
        reason: e.to_string(),
      })?;

    if !status.success() {
      return Err(
        ToolchainError::CommandFailed {
          command: format!(
            "cd {} && GOOS={} GOARCH={} {} {}",
            request.source_dir.display(),
            request.target_os,
            request.target_arch,
            self.program,
            args.join(" ")
          ),
          status: status.to_string(),
          stderr: String::new(),
        }
        .into(),
      );
    }

    Ok(())
  }
}

/// Split `KEY=VALUE` entries; entries without `=` get an empty value
pub fn parse_env(entries: &[String]) -> Vec<(String, String)> {
  entries
    .iter()
    .filter(|e| !e.trim().is_empty())
    .map(|entry| match entry.split_once('=') {
      Some((k, v)) => (k.trim().to_string(), v.to_string()),
      None => (entry.trim().to_string(), String::new()),
    })
    .collect()
}

/// Split a whitespace-separated flag string (newlines included)
pub fn split_flags(flags: Option<&str>) -> Vec<String> {
  flags
    .map(|f| f.split_whitespace().map(str::to_string).collect())
    .unwrap_or_default()
}
