//! Publishing files as assets of an existing GitHub-style release

use crate::core::error::{PtsResult, RemoteError, ResultExt};
use crate::remote::http::{HttpRequest, HttpResponse, Method, Transport, segment};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
  pub id: u64,
  pub tag_name: String,
  #[serde(default)]
  pub upload_url: Option<String>,
  #[serde(default)]
  pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub size: u64,
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub browser_download_url: String,
}

impl Release {
  pub fn asset(&self, name: &str) -> Option<&ReleaseAsset> {
    self.assets.iter().find(|a| a.name == name)
  }
}

pub struct ReleasePublisher<'a> {
  transport: &'a dyn Transport,
  api_url: String,
  owner: String,
  repo: String,
  authorization: String,
}

impl<'a> ReleasePublisher<'a> {
  pub fn new(transport: &'a dyn Transport, api_url: &str, owner: &str, repo: &str, token: &str) -> Self {
    Self {
      transport,
      api_url: api_url.trim_end_matches('/').to_string(),
      owner: owner.to_string(),
      repo: repo.to_string(),
      authorization: format!("Bearer {}", token),
    }
  }

  fn request(&self, method: Method, url: impl Into<String>) -> HttpRequest {
    HttpRequest::new(method, url)
      .header("Authorization", self.authorization.as_str())
      .header("Accept", "application/vnd.github+json")
  }

  /// Look up the release for `tag`, including its current assets
  pub fn get_release(&self, tag: &str) -> PtsResult<Release> {
    let url = format!(
      "{}/repos/{}/{}/releases/tags/{}",
      self.api_url,
      segment(&self.owner),
      segment(&self.repo),
      segment(tag)
    );
    let response = self
      .transport
      .send(&self.request(Method::Get, url.as_str()))
      .and_then(HttpResponse::error_for_status)
      .with_context(|| format!("Failed to get release for tag '{}' in {}/{}", tag, self.owner, self.repo))?;

    let release: Release = response.json(&url)?;
    debug!(id = release.id, tag = %release.tag_name, assets = release.assets.len(), "resolved release");
    Ok(release)
  }

  /// Upload `content` as asset `name`, replacing an existing asset only when
  /// `override_existing` is set. `release` is kept in sync with what was sent.
  pub fn publish_asset(
    &self,
    release: &mut Release,
    name: &str,
    content: Vec<u8>,
    override_existing: bool,
  ) -> PtsResult<ReleaseAsset> {
    if let Some(existing) = release.asset(name).cloned() {
      if !override_existing {
        return Err(RemoteError::AssetExists { name: name.to_string() }.into());
      }
      self.delete_asset(&existing)?;
      release.assets.retain(|a| a.id != existing.id);
    }

    let url = format!("{}?name={}", self.upload_endpoint(release), segment(name));
    let request = self
      .request(Method::Post, url.as_str())
      .header("Content-Type", "application/octet-stream")
      .body(content);
    let response = self
      .transport
      .send(&request)
      .and_then(HttpResponse::error_for_status)
      .with_context(|| format!("Failed to upload asset {}", name))?;

    let asset: ReleaseAsset = response.json(&url)?;
    info!(name, id = asset.id, "asset uploaded");
    release.assets.push(asset.clone());
    Ok(asset)
  }

  fn delete_asset(&self, asset: &ReleaseAsset) -> PtsResult<()> {
    let url = if asset.url.is_empty() {
      format!(
        "{}/repos/{}/{}/releases/assets/{}",
        self.api_url,
        segment(&self.owner),
        segment(&self.repo),
        asset.id
      )
    } else {
      asset.url.clone()
    };

    self
      .transport
      .send(&self.request(Method::Delete, url))
      .and_then(HttpResponse::error_for_status)
      .with_context(|| format!("Failed to delete existing asset {}", asset.name))?;
    info!(name = %asset.name, id = asset.id, "asset deleted");
    Ok(())
  }

  /// Asset upload endpoint without query string
  fn upload_endpoint(&self, release: &Release) -> String {
    if let Some(template) = release.upload_url.as_deref().filter(|u| !u.is_empty()) {
      let base = template.split('{').next().unwrap_or(template);
      return base.to_string();
    }
    format!(
      "{}/repos/{}/{}/releases/{}/assets",
      uploads_base(&self.api_url),
      segment(&self.owner),
      segment(&self.repo),
      release.id
    )
  }
}

/// Upload host for an API base: `https://api.host` becomes `https://uploads.host`
fn uploads_base(api_url: &str) -> String {
  match api_url.split_once("://") {
    Some((scheme, rest)) if rest.starts_with("api.") => format!("{}://uploads.{}", scheme, &rest[4..]),
    _ => api_url.to_string(),
  }
}
