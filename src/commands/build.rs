//! `pts build`: cross-compile, archive and checksum a Go project

use crate::build::matrix::Platform;
use crate::build::toolchain::{parse_env, split_flags};
use crate::build::{ArchiveFormat, BuildOptions, GoToolchain, Pipeline};
use crate::core::config::{BinaryConfig, PtsConfig};
use crate::core::error::{ConfigError, PtsError, PtsResult};
use crate::core::vcs::SystemGit;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_OUTPUT_DIR: &str = "_releases";
const DEFAULT_STAMP_PACKAGE: &str = "main";

#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
  /// Project name (default: [project].name, then the source directory name)
  #[arg(long)]
  pub name: Option<String>,

  /// Release version (default: [project].version, then VERSION / VERSION.txt)
  #[arg(long)]
  pub version: Option<String>,

  /// Directory holding the Go sources
  #[arg(short, long, default_value = ".")]
  pub source_dir: PathBuf,

  /// Directory receiving the artifacts (default: _releases)
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Binary to build as NAME or NAME=PATH (repeatable)
  #[arg(long = "binary", value_name = "NAME[=PATH]")]
  pub binaries: Vec<String>,

  /// Target platform as os/arch (repeatable or comma separated)
  #[arg(short, long = "platform", value_name = "OS/ARCH", value_delimiter = ',')]
  pub platforms: Vec<String>,

  /// Target operating systems, crossed with --goarch
  #[arg(long, value_delimiter = ',', conflicts_with = "platforms")]
  pub goos: Vec<String>,

  /// Target architectures, crossed with --goos
  #[arg(long, value_delimiter = ',', conflicts_with = "platforms")]
  pub goarch: Vec<String>,

  /// Archive format: zip or tar.gz (default: leave raw binaries)
  #[arg(short, long)]
  pub archive: Option<String>,

  /// Extra KEY=VALUE environment for the compiler (repeatable)
  #[arg(short, long, value_name = "KEY=VALUE")]
  pub env: Vec<String>,

  /// Extra compiler flags
  #[arg(long, allow_hyphen_values = true)]
  pub flags: Option<String>,

  /// Extra link flags, appended after the version stamps
  #[arg(long, allow_hyphen_values = true)]
  pub ldflags: Option<String>,

  /// Package receiving the version stamps (default: main)
  #[arg(long)]
  pub stamp_package: Option<String>,

  /// Do not write .sha256 files
  #[arg(long)]
  pub no_checksum: bool,
}

/// Run the build command
pub fn run_build(args: BuildArgs) -> PtsResult<()> {
  let options = resolve_options(args)?;

  let git = SystemGit::open(&options.source_dir)?;
  let compiler = GoToolchain::new();
  let artifacts = Pipeline::new(&compiler, &git).run(&options)?;

  println!();
  println!("✅ Built {} artifact(s) in {}", artifacts.len(), options.output_dir.display());
  for artifact in &artifacts {
    let kind = if artifact.archived { "archive" } else { "binary" };
    let checksum = if artifact.checksum.is_some() { " +sha256" } else { "" };
    println!(
      "   {}/{} {} {}{}",
      artifact.target_os,
      artifact.target_arch,
      kind,
      artifact.path.display(),
      checksum
    );
  }
  println!("Completed!");
  Ok(())
}

/// Merge CLI flags over `pts.toml` into one validated [`BuildOptions`]
pub fn resolve_options(args: BuildArgs) -> PtsResult<BuildOptions> {
  if !args.source_dir.is_dir() {
    return Err(ConfigError::SourceDirNotFound { path: args.source_dir }.into());
  }

  let config = PtsConfig::load(&args.source_dir)?;
  let build = config.build.clone();

  let project_name = match args.name.filter(|n| !n.trim().is_empty()) {
    Some(name) => name,
    None => config.project_name(&args.source_dir).ok_or_else(|| PtsError::missing("name"))?,
  };
  let version = match args.version.filter(|v| !v.trim().is_empty()) {
    Some(version) => version,
    None => config
      .project_version(&args.source_dir)?
      .ok_or_else(|| PtsError::missing("version"))?,
  };

  let binaries = if args.binaries.is_empty() {
    build.binaries
  } else {
    args.binaries.iter().map(|b| parse_binary(b)).collect()
  };

  let platforms = if !args.platforms.is_empty() {
    args.platforms
  } else if !args.goos.is_empty() || !args.goarch.is_empty() {
    cross_platforms(&args.goos, &args.goarch)
  } else {
    build.platforms
  };

  let archive = match args.archive.or(build.archive).filter(|a| !a.trim().is_empty()) {
    Some(format) => Some(format.parse::<ArchiveFormat>()?),
    None => None,
  };

  info!(
    project = %project_name,
    version = %version,
    module = config.project.module.as_deref().unwrap_or("-"),
    "resolved project"
  );

  let mut env = build.env;
  env.extend(args.env);

  let flags = args.flags.or(build.flags);
  let ldflags = args.ldflags.or(build.ldflags);

  let output_dir = args
    .output_dir
    .or(build.output_dir)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

  Ok(BuildOptions {
    project_name,
    version,
    source_dir: args.source_dir,
    output_dir,
    binaries,
    platforms,
    archive,
    checksum: !args.no_checksum && build.checksum.unwrap_or(true),
    stamp_package: args
      .stamp_package
      .or(build.stamp_package)
      .unwrap_or_else(|| DEFAULT_STAMP_PACKAGE.to_string()),
    ldflags: split_flags(ldflags.as_deref()),
    flags: split_flags(flags.as_deref()),
    env: parse_env(&env),
  })
}

/// `NAME` or `NAME=PATH`
fn parse_binary(value: &str) -> BinaryConfig {
  match value.split_once('=') {
    Some((name, path)) if !path.trim().is_empty() => BinaryConfig {
      name: name.trim().to_string(),
      path: path.trim().to_string(),
    },
    Some((name, _)) => BinaryConfig {
      name: name.trim().to_string(),
      path: ".".to_string(),
    },
    None => BinaryConfig {
      name: value.trim().to_string(),
      path: ".".to_string(),
    },
  }
}

/// Cross product of `--goos` and `--goarch`; a missing side is the host's
fn cross_platforms(goos: &[String], goarch: &[String]) -> Vec<String> {
  let host = Platform::host();
  let oses = if goos.is_empty() { vec![host.os.clone()] } else { goos.to_vec() };
  let arches = if goarch.is_empty() { vec![host.arch] } else { goarch.to_vec() };

  oses
    .iter()
    .flat_map(|os| arches.iter().map(move |arch| format!("{}/{}", os.trim(), arch.trim())))
    .collect()
}
