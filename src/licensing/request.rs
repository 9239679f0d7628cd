//! Construction of outgoing licensing API requests.
//!
//! Every request is bound to the configured HTTP client, carries a bearer
//! token taken from the caller's [`RequestContext`] and decodes error bodies
//! with a per-request [`ErrorSummary`].

use crate::licensing::error::{LicensingError, LicensingResult};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest error summary built from a raw response body
const MAX_SUMMARY_CHARS: usize = 512;

/// Turns a non-2xx response body into a human readable message
pub type ErrorSummary = fn(&[u8]) -> String;

/// Per-call state threaded through every request.
///
/// The auth token lives here rather than on the client so concurrent callers
/// never observe each other's credentials.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    auth_token: Option<String>,
    timeout: Option<Duration>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context carrying `token`
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(token.into()),
            ..self.clone()
        }
    }

    /// Derive a context whose requests give up after `timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self.clone()
        }
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Generic summary: the trimmed body text, truncated
pub fn default_error_summary(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }

    if text.chars().count() > MAX_SUMMARY_CHARS {
        let truncated: String = text.chars().take(MAX_SUMMARY_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// Summary from a JSON `message` field, falling back to [`default_error_summary`]
pub fn message_error_summary(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct BodyError {
        message: Option<String>,
    }

    match serde_json::from_slice::<BodyError>(body) {
        Ok(BodyError {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ => default_error_summary(body),
    }
}

/// HTTP client plus base URI shared by every request
#[derive(Clone, Debug)]
pub struct ApiTransport {
    client: reqwest::Client,
    base_uri: Url,
}

impl ApiTransport {
    pub fn new(client: reqwest::Client, base_uri: Url) -> Self {
        Self { client, base_uri }
    }

    /// Resolve `path` under the base URI path prefix
    pub fn url(&self, path: &str) -> Url {
        let mut url = self.base_uri.clone();
        let prefix = self.base_uri.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, path));
        url
    }

    /// Authenticated request: sets `Authorization: Bearer <token>` from `ctx`.
    ///
    /// A context without a token yields an empty bearer value; the server is
    /// left to reject it.
    pub fn request(&self, ctx: &RequestContext, method: Method, path: &str) -> ApiRequest {
        let token = ctx.auth_token().unwrap_or_default();
        let request = self.request_no_auth(ctx, method, path);
        ApiRequest {
            builder: request.builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            ..request
        }
    }

    /// Same wiring as [`ApiTransport::request`] without the Authorization header
    pub fn request_no_auth(&self, ctx: &RequestContext, method: Method, path: &str) -> ApiRequest {
        let url = self.url(path);
        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(timeout) = ctx.timeout() {
            builder = builder.timeout(timeout);
        }

        ApiRequest {
            builder,
            method,
            url,
            error_summary: message_error_summary,
        }
    }
}

/// A request ready to send
pub struct ApiRequest {
    builder: reqwest::RequestBuilder,
    method: Method,
    url: Url,
    error_summary: ErrorSummary,
}

impl ApiRequest {
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Self {
        Self {
            builder: self.builder.json(body),
            ..self
        }
    }

    pub fn query<T: Serialize + ?Sized>(self, query: &T) -> Self {
        Self {
            builder: self.builder.query(query),
            ..self
        }
    }

    /// Replace the interpreter used for non-2xx response bodies
    pub fn error_summary(self, error_summary: ErrorSummary) -> Self {
        Self {
            error_summary,
            ..self
        }
    }

    /// Build the underlying request without sending it
    pub fn build(self) -> LicensingResult<reqwest::Request> {
        self.builder.build().map_err(LicensingError::Transport)
    }

    /// Send the request, mapping non-2xx responses to `LicensingError::Http`
    pub async fn send(self) -> LicensingResult<reqwest::Response> {
        tracing::debug!(method = %self.method, url = %self.url, "sending licensing request");

        let (client, request) = self.builder.build_split();
        let response = client.execute(request?).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let message = (self.error_summary)(&body);
        tracing::warn!(
            method = %self.method,
            url = %self.url,
            status = status.as_u16(),
            message = %message,
            "licensing request failed"
        );

        Err(LicensingError::Http { status, message })
    }

    /// Send the request and decode a JSON response body
    pub async fn send_json<T: DeserializeOwned>(self) -> LicensingResult<T> {
        let url = self.url.clone();
        let body = self.send().await?.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| LicensingError::decode(format!("failed to decode response from {}", url), e))
    }
}
