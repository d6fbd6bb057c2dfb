//! HTTP client for the backend API
//!
//! One explicit client object per session: it owns the reqwest client, the
//! base URL, and the bearer token set at login. There is no process-wide
//! state; components that issue requests hold a reference to this object.

mod auth;
mod posts;
mod users;

pub use auth::AuthSession;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Operation, Result};
use crate::images::UploadImage;

/// Client for the backend API, holding the session's bearer token
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    /// Create a new client with no session token
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base, Duration::from_secs(config.timeout_secs))
    }

    /// Build API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Install the bearer token obtained at login
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the session token
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Whether a bearer token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Start an authorized request; refuses without a token before any
    /// network traffic happens
    fn authorized(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(Error::AuthRequired)?;
        Ok(self
            .http
            .request(method, self.api_url(endpoint))
            .bearer_auth(token))
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the data payload, treating absence as a server-side failure
    pub(crate) fn data(self) -> Result<T> {
        self.data
            .ok_or_else(|| Error::Api("Response data is missing".to_string()))
    }
}

/// Map a response through the shared error taxonomy and parse the envelope
pub(crate) async fn decode<T: DeserializeOwned>(
    op: Operation,
    response: Response,
) -> Result<Envelope<T>> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(?op, %status, "request rejected: {body}");
        return Err(Error::rejected(op, status, body));
    }

    let envelope: Envelope<T> = response.json().await?;

    if !envelope.success {
        return Err(Error::Api(envelope.message));
    }

    Ok(envelope)
}

/// Build the multipart part for an upload image
pub(crate) fn image_part(image: UploadImage) -> Result<reqwest::multipart::Part> {
    let part = reqwest::multipart::Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(image.mime)?;
    Ok(part)
}
