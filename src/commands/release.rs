//! `pts release upload`: attach files to an existing GitHub release

use crate::core::error::{PtsError, PtsResult};
use crate::remote::release::DEFAULT_API_URL;
use crate::remote::{ReleasePublisher, Transport, UreqTransport};
use crate::utils;
use clap::{ArgAction, Args};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct ReleaseUploadArgs {
  /// Access token
  #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Repository owner
  #[arg(short = 'u', long, visible_alias = "user", env = "GITHUB_OWNER")]
  pub owner: Option<String>,

  /// Repository name, or `owner/repo`
  #[arg(short, long, env = "GITHUB_REPO")]
  pub repo: Option<String>,

  /// Release tag
  #[arg(short, long)]
  pub tag: Option<String>,

  /// Replace assets that already exist on the release
  #[arg(long = "override", action = ArgAction::Set, default_value_t = false, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
  pub override_existing: bool,

  /// API base URL
  #[arg(long, default_value = DEFAULT_API_URL)]
  pub api_url: String,

  /// Files or directories to upload
  pub files: Vec<PathBuf>,
}

/// Run the release upload command
pub fn run_release_upload(args: ReleaseUploadArgs) -> PtsResult<()> {
  let transport = UreqTransport::new();
  release_upload(&transport, args)?;
  println!("Completed!");
  Ok(())
}

fn release_upload(transport: &dyn Transport, args: ReleaseUploadArgs) -> PtsResult<()> {
  let token = utils::required(&args.token, "token")?;
  let (owner, repo) = owner_and_repo(args.owner.as_deref(), args.repo.as_deref())?;
  let tag = utils::required(&args.tag, "tag")?;
  if args.files.is_empty() {
    return Err(PtsError::with_help(
      "no dir or file provided",
      "Pass one or more files or directories to upload.",
    ));
  }
  let files = utils::collect_files(&args.files)?;

  let publisher = ReleasePublisher::new(transport, &args.api_url, &owner, &repo, &token);
  let mut release = publisher.get_release(&tag)?;

  for file in &files {
    let name = utils::base_name(file);
    println!("⬆️  Uploading {} to {}/{}@{}", name, owner, repo, tag);
    let content = fs::read(file)?;
    let asset = publisher.publish_asset(&mut release, &name, content, args.override_existing)?;
    if asset.browser_download_url.is_empty() {
      println!("   {} ({} bytes)", asset.name, asset.size);
    } else {
      println!("   {} ({} bytes)", asset.browser_download_url, asset.size);
    }
  }
  Ok(())
}

/// Resolve owner and repository; `repo` may carry both as `owner/repo`
fn owner_and_repo(owner: Option<&str>, repo: Option<&str>) -> PtsResult<(String, String)> {
  let repo = repo.map(str::trim).filter(|r| !r.is_empty());
  let owner = owner.map(str::trim).filter(|o| !o.is_empty());

  if let Some((slug_owner, slug_repo)) = repo.and_then(|r| r.split_once('/')) {
    let slug_owner = owner.unwrap_or(slug_owner);
    if slug_owner.is_empty() {
      return Err(PtsError::missing("owner"));
    }
    if slug_repo.is_empty() {
      return Err(PtsError::missing("repo"));
    }
    return Ok((slug_owner.to_string(), slug_repo.to_string()));
  }

  let owner = owner.ok_or_else(|| PtsError::missing("owner"))?;
  let repo = repo.ok_or_else(|| PtsError::missing("repo"))?;
  Ok((owner.to_string(), repo.to_string()))
}
