use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User id alias the server resolves to the authenticated caller
pub const CURRENT_USER: &str = "@me";

/// Payload for creating an application
///
/// Name rules (length, uniqueness, token limit) are enforced by the server;
/// a rejected name comes back as a declared 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCreate {
    pub name: String,
}

impl ApplicationCreate {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Application model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationData {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub last_use: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
}

/// One page of a user's applications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPage {
    /// Page number, starting at 1
    pub page: u64,
    /// Total number of pages
    pub pages: u64,
    pub items: Vec<ApplicationData>,
}

impl ApplicationPage {
    /// Whether the server has a page after this one
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Page number to request next, if any
    #[must_use]
    pub fn next_page(&self) -> Option<u64> {
        self.has_next().then_some(self.page + 1)
    }
}

/// Access token for one application
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// Keep the credential out of logs.
impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Standard message response
///
/// Used for acknowledgements and as the body of most server-side errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,

    // Optional data, can be any JSON value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for MessageResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
