mod build;
mod commands;
mod core;
mod remote;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use commands::build::BuildArgs;
use commands::release::ReleaseUploadArgs;
use commands::repository::{CreatePackageArgs, CreateRepoArgs, CreateVersionArgs, RepoAuthArgs, UploadArgs};
use core::error::{PtsError, print_error};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PTS_LOG";

/// Cross-build, archive, checksum and publish release artifacts
#[derive(Parser)]
#[command(name = "pts")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Verbose diagnostics on stderr (same as PTS_LOG=debug)
  #[arg(short, long, global = true, action = ArgAction::SetTrue)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build binaries for every platform, then archive and checksum them
  Build(BuildArgs),

  /// Write .sha256 files for files and directories
  Checksum {
    /// Files or directories (direct children only)
    #[arg(required = true)]
    paths: Vec<std::path::PathBuf>,
  },

  /// Package repository operations
  #[command(subcommand_required = true)]
  Repo {
    #[command(flatten)]
    auth: RepoAuthArgs,

    #[command(subcommand)]
    command: RepoCommands,
  },

  /// Release asset operations
  #[command(subcommand)]
  Release(ReleaseCommands),
}

#[derive(Subcommand)]
enum RepoCommands {
  /// Create a repository
  CreateRepo(CreateRepoArgs),
  /// Create a package in a repository
  CreatePackage(CreatePackageArgs),
  /// Create a version of a package
  CreateVersion(CreateVersionArgs),
  /// Upload files into a package version
  Upload(UploadArgs),
}

#[derive(Subcommand)]
enum ReleaseCommands {
  /// Upload files as assets of an existing release
  Upload(ReleaseUploadArgs),
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Build(args) => commands::run_build(args),
    Commands::Checksum { paths } => commands::run_checksum(paths),
    Commands::Repo { auth, command } => match command {
      RepoCommands::CreateRepo(args) => commands::run_create_repo(auth, args),
      RepoCommands::CreatePackage(args) => commands::run_create_package(auth, args),
      RepoCommands::CreateVersion(args) => commands::run_create_version(auth, args),
      RepoCommands::Upload(args) => commands::run_upload(auth, args),
    },
    Commands::Release(release_cmd) => match release_cmd {
      ReleaseCommands::Upload(args) => commands::run_release_upload(args),
    },
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: PtsError) -> ! {
  print_error(&err);
  std::process::exit(1);
}
