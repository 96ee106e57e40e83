//! The build pipeline: expand -> compile -> archive -> checksum
//!
//! Strictly sequential, in matrix order. The first failure stops the run;
//! artifacts finished before it are left in place.

use super::archive::{self, ArchiveFormat};
use super::checksum;
use super::matrix::{self, BuildJob};
use super::metadata::BuildMetadata;
use super::toolchain::{CompileRequest, Compiler};
use crate::core::config::BinaryConfig;
use crate::core::error::{PtsResult, ResultExt};
use crate::core::vcs::RevisionSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fully resolved inputs for one build run
#[derive(Debug, Clone)]
pub struct BuildOptions {
  pub project_name: String,
  pub version: String,
  pub source_dir: PathBuf,
  pub output_dir: PathBuf,
  pub binaries: Vec<BinaryConfig>,
  pub platforms: Vec<String>,
  pub archive: Option<ArchiveFormat>,
  pub checksum: bool,
  /// Package receiving the `-X` stamps
  pub stamp_package: String,
  /// User link flags, appended after the stamps
  pub ldflags: Vec<String>,
  pub flags: Vec<String>,
  pub env: Vec<(String, String)>,
}

/// A compiled (and possibly archived) output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub path: PathBuf,
  pub binary_name: String,
  pub target_os: String,
  pub target_arch: String,
  pub archived: bool,
  pub checksum: Option<PathBuf>,
}

/// Drives a build run against injected toolchain capabilities
pub struct Pipeline<'a> {
  compiler: &'a dyn Compiler,
  vcs: &'a dyn RevisionSource,
}

impl<'a> Pipeline<'a> {
  pub fn new(compiler: &'a dyn Compiler, vcs: &'a dyn RevisionSource) -> Self {
    Self { compiler, vcs }
  }

  /// Run every job of the matrix and return the artifacts in matrix order
  pub fn run(&self, options: &BuildOptions) -> PtsResult<Vec<Artifact>> {
    // Matrix errors are configuration errors: report them before touching disk
    let jobs = matrix::expand(&options.project_name, &options.binaries, &options.platforms)?;

    let metadata = BuildMetadata::capture(&options.version, &options.source_dir, self.vcs)?;
    info!(
      version = %metadata.version,
      git_rev = %metadata.git_rev,
      git_commit = %metadata.git_commit,
      jobs = jobs.len(),
      "starting build matrix"
    );

    fs::create_dir_all(&options.output_dir)
      .with_context(|| format!("Failed to create output directory {}", options.output_dir.display()))?;
    // The compiler runs inside the source dir, so hand it an absolute output path
    let output_dir = fs::canonicalize(&options.output_dir)
      .with_context(|| format!("Failed to resolve output directory {}", options.output_dir.display()))?;

    let mut ldflags = vec!["-s".to_string(), "-w".to_string()];
    ldflags.extend(metadata.link_variables(&options.stamp_package));
    ldflags.extend(options.ldflags.iter().cloned());

    let mut artifacts = Vec::with_capacity(jobs.len());
    for job in &jobs {
      let mut artifact = self.compile(job, options, &output_dir, &ldflags)?;

      if let Some(format) = options.archive {
        archive_artifact(&mut artifact, format)?;
      }

      if options.checksum {
        artifact.checksum = checksum::write_checksum(&artifact.path)?;
        if let Some(sum) = &artifact.checksum {
          println!("🔒 Checksum {}", sum.display());
        }
      }

      artifacts.push(artifact);
    }

    Ok(artifacts)
  }

  fn compile(
    &self,
    job: &BuildJob,
    options: &BuildOptions,
    output_dir: &Path,
    ldflags: &[String],
  ) -> PtsResult<Artifact> {
    let output = output_dir.join(binary_file_name(job, &options.version));
    println!("🔨 Building {} ({})", output.display(), job.platform);

    let request = CompileRequest {
      source_dir: options.source_dir.clone(),
      package: job.source_path.clone(),
      target_os: job.platform.os.clone(),
      target_arch: job.platform.arch.clone(),
      output: output.clone(),
      ldflags: ldflags.to_vec(),
      flags: options.flags.clone(),
      env: options.env.clone(),
    };
    self
      .compiler
      .compile(&request)
      .with_context(|| format!("Build failed for {} ({})", job.binary_name, job.platform))?;

    Ok(Artifact {
      path: output,
      binary_name: job.binary_name.clone(),
      target_os: job.platform.os.clone(),
      target_arch: job.platform.arch.clone(),
      archived: false,
      checksum: None,
    })
  }
}

/// `<binary>-<version>-<os>-<arch>[.exe]`
pub fn binary_file_name(job: &BuildJob, version: &str) -> String {
  let mut name = format!(
    "{}-{}-{}-{}",
    job.binary_name, version, job.platform.os, job.platform.arch
  );
  if job.platform.is_windows() {
    name.push_str(".exe");
  }
  name
}

/// Replace the raw binary with a single-entry archive
pub fn archive_artifact(artifact: &mut Artifact, format: ArchiveFormat) -> PtsResult<()> {
  let dest = archive::archive_path(&artifact.path, format);
  let entry = archive::entry_name(&artifact.binary_name, artifact.target_os == "windows");
  println!("📦 Archiving {}", dest.display());

  archive::write_archive(format, &artifact.path, &dest, &entry)?;
  fs::remove_file(&artifact.path).with_context(|| format!("Failed to remove {}", artifact.path.display()))?;

  artifact.path = dest;
  artifact.archived = true;
  Ok(())
}
