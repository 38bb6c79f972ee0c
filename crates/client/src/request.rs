use crate::error::{ApiError, Result};
use reqwest::Method;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Media type of every request body this API accepts
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Structured description of one HTTP call
///
/// Built by [`crate::ApplicationClient`], executed by a [`crate::Transport`].
/// The URL stays a template (`/api/application/{application_id}`); the
/// transport resolves it with [`build_url`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// URL template with `{name}` placeholders
    pub url: &'static str,
    /// Placeholder name to literal value
    pub path: BTreeMap<&'static str, String>,
    /// Already-serialized request body
    pub body: Option<serde_json::Value>,
    /// Media type of `body`, set whenever a body is present
    pub media_type: Option<&'static str>,
    /// Known failure statuses and their meaning
    pub errors: BTreeMap<u16, &'static str>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, url: &'static str) -> Self {
        Self {
            method,
            url,
            path: BTreeMap::new(),
            body: None,
            media_type: None,
            errors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path.insert(name, value.into());
        self
    }

    /// Attach a JSON body
    pub fn json_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Serialize)?);
        self.media_type = Some(MEDIA_TYPE_JSON);
        Ok(self)
    }

    /// Declare the meaning of a failure status
    #[must_use]
    pub fn error(mut self, status: u16, description: &'static str) -> Self {
        self.errors.insert(status, description);
        self
    }

    /// Template with every placeholder replaced by its raw value
    pub fn resolve_url(&self) -> Result<String> {
        build_url(self.url, &self.path)
    }

    /// Classify a non-success response
    ///
    /// Declared statuses keep their description; anything else becomes a
    /// generic [`ApiError::Status`].
    #[must_use]
    pub fn error_for_status(&self, status: u16, body: String) -> ApiError {
        match self.errors.get(&status) {
            Some(description) => ApiError::Declared {
                status,
                description: (*description).to_string(),
                body,
            },
            None => ApiError::Status { status, body },
        }
    }
}

/// Replace every `{name}` token in `template` with its substitution
///
/// The template is scanned once, left to right, so substituted values are
/// never expanded again and the order of entries has no effect. A `{` with
/// no closing `}` is kept as literal text. Entries without a matching
/// placeholder are ignored.
pub fn build_url<K, V>(template: &str, substitutions: &BTreeMap<K, V>) -> Result<String>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    let mut url = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(len) = rest[open + 1..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + 1 + len];
        let value = substitutions
            .get(name)
            .ok_or_else(|| ApiError::MissingParameter(name.to_string()))?;

        url.push_str(&rest[..open]);
        url.push_str(value.as_ref());
        rest = &rest[open + len + 2..];
    }

    url.push_str(rest);
    Ok(url)
}
