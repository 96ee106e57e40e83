//! `pts repo ...`: manage a Bintray-style package repository

use crate::core::error::{PtsError, PtsResult};
use crate::remote::repository::{
  self, DEFAULT_API_URL, PackageDescriptor, RepoDescriptor, UploadDirectives, VersionCoordinates, VersionDescriptor,
};
use crate::remote::{RepositoryClient, Transport, UreqTransport};
use crate::utils;
use clap::{ArgAction, Args};
use std::fs;
use std::path::PathBuf;

/// Identity and behaviour shared by every `repo` subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct RepoAuthArgs {
  /// Repository owner (user or organization)
  #[arg(long, env = "BINTRAY_SUBJECT", global = true)]
  pub subject: Option<String>,

  /// API key for the subject
  #[arg(long, env = "BINTRAY_APIKEY", global = true, hide_env_values = true)]
  pub apikey: Option<String>,

  /// Treat "already exists" as success on create; override files on upload
  #[arg(long, global = true)]
  pub force: bool,

  /// API base URL
  #[arg(long, default_value = DEFAULT_API_URL, global = true)]
  pub api_url: String,
}

impl RepoAuthArgs {
  fn client<'a>(&self, transport: &'a dyn Transport) -> PtsResult<RepositoryClient<'a>> {
    let subject = utils::required(&self.subject, "subject")?;
    let apikey = utils::required(&self.apikey, "apikey")?;
    Ok(RepositoryClient::new(transport, &self.api_url, &subject, &apikey))
  }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CreateRepoArgs {
  /// Repository name
  #[arg(long, env = "BINTRAY_REPO")]
  pub name: Option<String>,

  /// Repository type
  #[arg(long = "type", default_value = "generic")]
  pub repo_type: String,

  /// Create a private repository
  #[arg(long)]
  pub private: bool,

  /// Description
  #[arg(long, default_value = "")]
  pub desc: String,

  /// Labels (repeatable or comma separated)
  #[arg(long = "label", value_delimiter = ',')]
  pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CreatePackageArgs {
  /// Repository name
  #[arg(long, env = "BINTRAY_REPO")]
  pub repo: Option<String>,

  /// Package name
  #[arg(long, env = "BINTRAY_PACKAGE")]
  pub name: Option<String>,

  /// Licenses (repeatable or comma separated)
  #[arg(long = "license", value_delimiter = ',', default_value = "Apache-2.0")]
  pub licenses: Vec<String>,

  /// GitHub `owner/repo`, used for the VCS and issue tracker URLs
  #[arg(long)]
  pub github_repo: Option<String>,

  /// Project website
  #[arg(long, default_value = "")]
  pub website_url: String,

  /// Description
  #[arg(long, default_value = "")]
  pub desc: String,

  /// Labels (repeatable or comma separated)
  #[arg(long = "label", value_delimiter = ',')]
  pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CreateVersionArgs {
  /// Repository name
  #[arg(long, env = "BINTRAY_REPO")]
  pub repo: Option<String>,

  /// Package name
  #[arg(long, env = "BINTRAY_PACKAGE")]
  pub package: Option<String>,

  /// Version name
  #[arg(long, env = "BINTRAY_VERSION")]
  pub version: Option<String>,

  /// Description
  #[arg(long, default_value = "")]
  pub desc: String,

  /// VCS tag of the version (default: the version name)
  #[arg(long)]
  pub vcs_tag: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct UploadArgs {
  /// Repository name
  #[arg(long, env = "BINTRAY_REPO")]
  pub repo: Option<String>,

  /// Package name
  #[arg(long, env = "BINTRAY_PACKAGE")]
  pub package: Option<String>,

  /// Version name
  #[arg(long, env = "BINTRAY_VERSION")]
  pub version: Option<String>,

  /// Remote directory prefix for the uploaded files
  #[arg(long)]
  pub path: Option<String>,

  /// Publish the files right after upload
  #[arg(long, action = ArgAction::Set, default_value_t = true, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
  pub publish: bool,

  /// Ask the server to unpack uploaded archives
  #[arg(long, action = ArgAction::Set, default_value_t = false, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
  pub explode: bool,

  /// Files or directories to upload
  pub files: Vec<PathBuf>,
}

pub fn run_create_repo(auth: RepoAuthArgs, args: CreateRepoArgs) -> PtsResult<()> {
  let transport = UreqTransport::new();
  create_repo(&transport, &auth, args)?;
  println!("Completed!");
  Ok(())
}

pub fn run_create_package(auth: RepoAuthArgs, args: CreatePackageArgs) -> PtsResult<()> {
  let transport = UreqTransport::new();
  create_package(&transport, &auth, args)?;
  println!("Completed!");
  Ok(())
}

pub fn run_create_version(auth: RepoAuthArgs, args: CreateVersionArgs) -> PtsResult<()> {
  let transport = UreqTransport::new();
  create_version(&transport, &auth, args)?;
  println!("Completed!");
  Ok(())
}

pub fn run_upload(auth: RepoAuthArgs, args: UploadArgs) -> PtsResult<()> {
  let transport = UreqTransport::new();
  upload(&transport, &auth, args)?;
  println!("Completed!");
  Ok(())
}

fn create_repo(transport: &dyn Transport, auth: &RepoAuthArgs, args: CreateRepoArgs) -> PtsResult<()> {
  let client = auth.client(transport)?;
  let name = utils::required(&args.name, "name")?;

  let descriptor = RepoDescriptor {
    repo_type: args.repo_type,
    private: args.private,
    desc: args.desc,
    labels: args.labels,
    ..RepoDescriptor::new(name)
  };
  println!("📁 Creating repository {}", descriptor.name);
  client.create_repo(&descriptor, auth.force)
}

fn create_package(transport: &dyn Transport, auth: &RepoAuthArgs, args: CreatePackageArgs) -> PtsResult<()> {
  let client = auth.client(transport)?;
  let repo = utils::required(&args.repo, "repo")?;
  let name = utils::required(&args.name, "name")?;

  let mut descriptor = PackageDescriptor {
    desc: args.desc,
    labels: args.labels,
    licenses: args.licenses,
    website_url: args.website_url,
    ..PackageDescriptor::new(name)
  };
  if let Some(slug) = &args.github_repo {
    descriptor = descriptor.with_github_repo(slug);
  }

  println!("📦 Creating package {}/{}", repo, descriptor.name);
  client.create_package(&repo, &descriptor, auth.force)
}

fn create_version(transport: &dyn Transport, auth: &RepoAuthArgs, args: CreateVersionArgs) -> PtsResult<()> {
  let client = auth.client(transport)?;
  let repo = utils::required(&args.repo, "repo")?;
  let package = utils::required(&args.package, "package")?;
  let version = utils::required(&args.version, "version")?;

  let descriptor = VersionDescriptor {
    vcs_tag: args.vcs_tag.unwrap_or_else(|| version.clone()),
    name: version,
    desc: args.desc,
  };
  println!("🏷️  Creating version {}/{}/{}", repo, package, descriptor.name);
  client.create_version(&repo, &package, &descriptor, auth.force)
}

fn upload(transport: &dyn Transport, auth: &RepoAuthArgs, args: UploadArgs) -> PtsResult<()> {
  let client = auth.client(transport)?;
  let target = VersionCoordinates {
    repo: utils::required(&args.repo, "repo")?,
    package: utils::required(&args.package, "package")?,
    version: utils::required(&args.version, "version")?,
  };
  if args.files.is_empty() {
    return Err(PtsError::with_help(
      "no dir or file provided",
      "Pass one or more files or directories to upload.",
    ));
  }

  // Resolve every argument before the first request
  let files = utils::collect_files(&args.files)?;
  let directives = UploadDirectives {
    publish: args.publish,
    override_existing: auth.force,
    explode: args.explode,
  };

  for file in &files {
    let remote_path = repository::remote_path(args.path.as_deref(), &utils::base_name(file));
    println!("⬆️  Uploading {} -> {}", file.display(), remote_path);
    let content = fs::read(file)?;
    client.upload_content(&target, &remote_path, content, directives)?;
  }
  Ok(())
}
