//! Client for a Bintray-style package repository
//!
//! Repositories contain packages, packages contain versions, versions contain
//! files. Each create call is made idempotent by treating `409 Conflict` as
//! success when `force` is set.

use crate::core::error::{PtsResult, ResultExt};
use crate::remote::http::{HttpRequest, HttpResponse, Method, Transport, basic_auth, encode_path, segment};
use serde::Serialize;
use tracing::info;

pub const DEFAULT_API_URL: &str = "https://api.bintray.com";

/// Body of `POST /repos/{subject}/{repo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoDescriptor {
  pub name: String,
  #[serde(rename = "type")]
  pub repo_type: String,
  pub private: bool,
  pub desc: String,
  pub labels: Vec<String>,
}

impl RepoDescriptor {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      repo_type: "generic".to_string(),
      private: false,
      desc: String::new(),
      labels: Vec::new(),
    }
  }
}

/// Body of `POST /packages/{subject}/{repo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
  pub name: String,
  pub desc: String,
  pub labels: Vec<String>,
  pub licenses: Vec<String>,
  pub vcs_url: String,
  pub website_url: String,
  pub issue_tracker_url: String,
  pub public_download_numbers: bool,
}

impl PackageDescriptor {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      desc: String::new(),
      labels: Vec::new(),
      licenses: vec!["Apache-2.0".to_string()],
      vcs_url: String::new(),
      website_url: String::new(),
      issue_tracker_url: String::new(),
      public_download_numbers: true,
    }
  }

  /// Fill `vcs_url` and `issue_tracker_url` from a GitHub `owner/repo` slug
  pub fn with_github_repo(mut self, slug: &str) -> Self {
    let slug = slug.trim().trim_matches('/');
    if slug.is_empty() {
      return self;
    }
    self.vcs_url = format!("https://github.com/{}.git", slug);
    self.issue_tracker_url = format!("https://github.com/{}/issues", slug);
    self
  }
}

/// Body of `POST /packages/{subject}/{repo}/{package}/versions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDescriptor {
  pub name: String,
  pub desc: String,
  pub vcs_tag: String,
}

/// Server-side handling of uploaded content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadDirectives {
  pub publish: bool,
  pub override_existing: bool,
  pub explode: bool,
}

impl UploadDirectives {
  fn headers(&self) -> [(&'static str, &'static str); 3] {
    let flag = |on: bool| if on { "1" } else { "0" };
    [
      ("X-Bintray-Publish", flag(self.publish)),
      ("X-Bintray-Override", flag(self.override_existing)),
      ("X-Bintray-Explode", flag(self.explode)),
    ]
  }
}

/// Coordinates of one package version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCoordinates {
  pub repo: String,
  pub package: String,
  pub version: String,
}

pub struct RepositoryClient<'a> {
  transport: &'a dyn Transport,
  base_url: String,
  subject: String,
  authorization: String,
}

impl<'a> RepositoryClient<'a> {
  pub fn new(transport: &'a dyn Transport, base_url: &str, subject: &str, apikey: &str) -> Self {
    Self {
      transport,
      base_url: base_url.trim_end_matches('/').to_string(),
      subject: subject.to_string(),
      authorization: basic_auth(subject, apikey),
    }
  }

  pub fn create_repo(&self, repo: &RepoDescriptor, force: bool) -> PtsResult<()> {
    let url = format!("{}/repos/{}/{}", self.base_url, segment(&self.subject), segment(&repo.name));
    self
      .create(&url, repo, force)
      .with_context(|| format!("Failed to create repository '{}'", repo.name))?;
    info!(repo = %repo.name, "repository ready");
    Ok(())
  }

  pub fn create_package(&self, repo: &str, package: &PackageDescriptor, force: bool) -> PtsResult<()> {
    let url = format!("{}/packages/{}/{}", self.base_url, segment(&self.subject), segment(repo));
    self
      .create(&url, package, force)
      .with_context(|| format!("Failed to create package '{}' in {}", package.name, repo))?;
    info!(repo, package = %package.name, "package ready");
    Ok(())
  }

  pub fn create_version(&self, repo: &str, package: &str, version: &VersionDescriptor, force: bool) -> PtsResult<()> {
    let url = format!(
      "{}/packages/{}/{}/{}/versions",
      self.base_url,
      segment(&self.subject),
      segment(repo),
      segment(package)
    );
    self
      .create(&url, version, force)
      .with_context(|| format!("Failed to create version '{}' of {}", version.name, package))?;
    info!(repo, package, version = %version.name, "version ready");
    Ok(())
  }

  /// Upload one file under `remote_path` of the given version.
  ///
  /// Any non-2xx fails, including 409: overwriting is the server's decision via
  /// `X-Bintray-Override`.
  pub fn upload_content(
    &self,
    target: &VersionCoordinates,
    remote_path: &str,
    content: Vec<u8>,
    directives: UploadDirectives,
  ) -> PtsResult<()> {
    let url = format!(
      "{}/content/{}/{}/{}/{}/{}",
      self.base_url,
      segment(&self.subject),
      segment(&target.repo),
      segment(&target.package),
      segment(&target.version),
      encode_path(remote_path.trim_start_matches('/'))
    );

    let mut request = HttpRequest::new(Method::Put, url)
      .header("Authorization", self.authorization.as_str())
      .header("Content-Type", "application/octet-stream")
      .body(content);
    for (name, value) in directives.headers() {
      request = request.header(name, value);
    }

    self
      .transport
      .send(&request)
      .and_then(HttpResponse::error_for_status)
      .with_context(|| format!("Failed to upload {}", remote_path))?;
    Ok(())
  }

  fn create<T: Serialize>(&self, url: &str, body: &T, force: bool) -> PtsResult<()> {
    let request = HttpRequest::new(Method::Post, url)
      .header("Authorization", self.authorization.as_str())
      .json(body)?;

    let response = self.transport.send(&request)?;
    if response.is_success() || (force && response.status == 409) {
      return Ok(());
    }
    Err(response.into_error().into())
  }
}

/// Remote file path for an upload: `{prefix}/{basename}`, or just the basename
pub fn remote_path(prefix: Option<&str>, basename: &str) -> String {
  match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
    Some(prefix) => format!("{}/{}", prefix, basename),
    None => basename.to_string(),
  }
}
