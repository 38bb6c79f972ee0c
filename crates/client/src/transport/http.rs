use super::Transport;
use crate::cancel::CancelableRequest;
use crate::error::{ApiError, Result};
use crate::request::{build_url, RequestDescriptor, MEDIA_TYPE_JSON};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection settings for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Server root, e.g. `https://files.example.com`. May carry a path prefix.
    pub base_url: String,
    /// Sent verbatim in the `Authorization` header
    pub token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: concat!("keyward/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`Transport`] over HTTP(S) using reqwest
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{}: expected an http or https URL",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        info!(
            "HTTP transport ready for {} (timeout: {}s, authenticated: {})",
            base_url,
            config.timeout.as_secs(),
            config.token.is_some()
        );

        Ok(Self {
            client,
            base_url,
            token: config.token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a descriptor, with every path value percent-encoded
    ///
    /// Empty and dot-segment values are rejected: URL parsing would collapse
    /// them and send the call to a different endpoint.
    pub fn endpoint(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        if let Some((name, value)) = descriptor.path.iter().find(|(name, value)| {
            is_unsafe_segment(value) && descriptor.url.contains(&format!("{{{name}}}"))
        }) {
            return Err(ApiError::InvalidParameter {
                name: (*name).to_string(),
                value: value.clone(),
            });
        }

        let encoded: BTreeMap<&str, Cow<'_, str>> = descriptor
            .path
            .iter()
            .map(|(name, value)| (*name, encode_segment(value)))
            .collect();
        let path = build_url(descriptor.url, &encoded)?;

        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ApiError::InvalidBaseUrl(format!("{joined}: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let url = self.endpoint(&descriptor)?;
        debug!(method = %descriptor.method, %url, "Sending request");

        let mut request = self
            .client
            .request(descriptor.method.clone(), url.clone())
            .header(ACCEPT, MEDIA_TYPE_JSON);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token);
        }

        if let Some(body) = &descriptor.body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::Serialize)?;
            request = request
                .header(CONTENT_TYPE, descriptor.media_type.unwrap_or(MEDIA_TYPE_JSON))
                .body(bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = descriptor.error_for_status(status.as_u16(), text);
            warn!(
                method = %descriptor.method,
                %url,
                status = status.as_u16(),
                declared = error.is_declared(),
                "Request failed: {}",
                error
            );
            return Err(error);
        }

        debug!(method = %descriptor.method, %url, status = status.as_u16(), "Request succeeded");
        serde_json::from_str(&text).map_err(ApiError::Decode)
    }
}

fn is_unsafe_segment(value: &str) -> bool {
    matches!(value, "" | "." | "..")
}

/// Percent-encode one path segment. `@` and `:` are valid inside a segment
/// and stay readable, so the `@me` alias reaches the server as-is.
fn encode_segment(value: &str) -> Cow<'_, str> {
    let encoded = urlencoding::encode(value);
    if encoded.contains("%40") || encoded.contains("%3A") {
        Cow::Owned(encoded.replace("%40", "@").replace("%3A", ":"))
    } else {
        encoded
    }
}

impl Transport for HttpTransport {
    fn execute<T>(&self, descriptor: RequestDescriptor) -> CancelableRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let transport = self.clone();
        CancelableRequest::new(async move { transport.send(descriptor).await })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
