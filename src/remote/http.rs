//! Minimal HTTP seam shared by the remote clients
//!
//! Clients build [`HttpRequest`] values and hand them to a [`Transport`]. The
//! production transport is [`UreqTransport`]; tests script responses instead.

use crate::core::error::{PtsResult, RemoteError};
use base64::Engine;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("pts/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete,
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Put => "PUT",
      Method::Delete => "DELETE",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
  pub method: Method,
  pub url: String,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

impl HttpRequest {
  pub fn new(method: Method, url: impl Into<String>) -> Self {
    Self {
      method,
      url: url.into(),
      headers: vec![("User-Agent".to_string(), USER_AGENT.to_string())],
      body: Vec::new(),
    }
  }

  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  /// Raw body
  pub fn body(mut self, body: Vec<u8>) -> Self {
    self.body = body;
    self
  }

  /// JSON body with matching content type
  pub fn json<T: Serialize>(self, value: &T) -> PtsResult<Self> {
    let body = serde_json::to_vec(value)?;
    Ok(self.header("Content-Type", "application/json").body(body))
  }

  /// Value of the first header named `name` (case-insensitive)
  pub fn header_value(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  /// Status line text, e.g. `409 Conflict`
  pub reason: String,
  pub body: Vec<u8>,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// Remote error text: JSON `message` field if present, else the status reason
  pub fn error_message(&self) -> String {
    serde_json::from_slice::<serde_json::Value>(&self.body)
      .ok()
      .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
      .unwrap_or_else(|| self.reason.clone())
  }

  /// Convert a non-2xx response into an error
  pub fn into_error(self) -> RemoteError {
    RemoteError::Status {
      status: self.status,
      message: self.error_message(),
    }
  }

  /// Fail on non-2xx, pass 2xx through
  pub fn error_for_status(self) -> Result<Self, RemoteError> {
    if self.is_success() { Ok(self) } else { Err(self.into_error()) }
  }

  /// Decode a 2xx JSON body
  pub fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
    serde_json::from_slice(&self.body).map_err(|e| RemoteError::InvalidBody {
      url: url.to_string(),
      reason: e.to_string(),
    })
  }
}

/// Sends one request and returns the response, whatever its status.
///
/// `Err` means no response was received at all.
pub trait Transport {
  fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError>;
}

/// `Authorization` value for HTTP basic auth
pub fn basic_auth(user: &str, password: &str) -> String {
  let token = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
  format!("Basic {}", token)
}

/// Percent-encode one URL path segment
pub fn segment(value: &str) -> Cow<'_, str> {
  urlencoding::encode(value)
}

/// Percent-encode each `/`-separated segment of a path, keeping the separators
pub fn encode_path(path: &str) -> String {
  path.split('/').map(segment).collect::<Vec<_>>().join("/")
}

/// Blocking transport backed by a shared `ureq` agent
pub struct UreqTransport {
  agent: ureq::Agent,
}

impl UreqTransport {
  pub fn new() -> Self {
    // Status handling belongs to the callers; 4xx/5xx are regular responses here
    let config = ureq::Agent::config_builder().http_status_as_error(false).build();
    Self {
      agent: ureq::Agent::new_with_config(config),
    }
  }

  fn dispatch(&self, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let url = request.url.as_str();
    match request.method {
      Method::Get => with_headers(self.agent.get(url), &request.headers).call(),
      Method::Delete => with_headers(self.agent.delete(url), &request.headers).call(),
      Method::Post => with_headers(self.agent.post(url), &request.headers).send(&request.body[..]),
      Method::Put => with_headers(self.agent.put(url), &request.headers).send(&request.body[..]),
    }
  }
}

impl Default for UreqTransport {
  fn default() -> Self {
    Self::new()
  }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
  for (name, value) in headers {
    builder = builder.header(name.as_str(), value.as_str());
  }
  builder
}

impl Transport for UreqTransport {
  fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError> {
    debug!(
      method = %request.method,
      url = %request.url,
      content_type = request.header_value("Content-Type").unwrap_or("-"),
      bytes = request.body.len(),
      "sending request"
    );

    let transport_error = |e: ureq::Error| RemoteError::Transport {
      url: request.url.clone(),
      reason: e.to_string(),
    };

    let mut response = self.dispatch(request).map_err(transport_error)?;
    let status = response.status();
    let body = response.body_mut().read_to_vec().map_err(transport_error)?;

    debug!(url = %request.url, status = status.as_u16(), "received response");

    Ok(HttpResponse {
      status: status.as_u16(),
      reason: format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("")).trim_end().to_string(),
      body,
    })
  }
}
