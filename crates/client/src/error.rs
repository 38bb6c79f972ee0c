use keyward_api::MessageResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Status code listed in the request's declared error map
    #[error("{description} (HTTP {status})")]
    Declared {
        status: u16,
        description: String,
        body: String,
    },

    /// Any other non-success status
    #[error("Request failed with HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Missing value for path parameter '{0}'")]
    MissingParameter(String),

    /// Path value that cannot stand as a single URL segment (`""`, `.`, `..`)
    #[error("Invalid value '{value}' for path parameter '{name}'")]
    InvalidParameter { name: String, value: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request was cancelled before it completed. Not a failure of the
    /// request itself; no response value will ever be produced.
    #[error("Request was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Declared { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Declared description for the status, if the endpoint documents one
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Declared { description, .. } => Some(description.as_str()),
            _ => None,
        }
    }

    /// Raw response body of a failed request
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Declared { body, .. } | Self::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether the status is one the endpoint declares
    #[must_use]
    pub fn is_declared(&self) -> bool {
        matches!(self, Self::Declared { .. })
    }

    /// Message sent by the server in the error body, when it uses the
    /// standard message shape
    #[must_use]
    pub fn server_message(&self) -> Option<MessageResponse> {
        self.body()
            .and_then(|body| serde_json::from_str::<MessageResponse>(body).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_error_accessors() {
        let err = ApiError::Declared {
            status: 401,
            description: "Unauthorized or token does not exist".to_string(),
            body: r#"{"message":"You are not authorized to make this request"}"#.to_string(),
        };

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.description(), Some("Unauthorized or token does not exist"));
        assert!(err.is_declared());
        assert!(!err.is_cancelled());
        assert_eq!(
            err.server_message().map(|m| m.message),
            Some("You are not authorized to make this request".to_string())
        );
        assert_eq!(
            err.to_string(),
            "Unauthorized or token does not exist (HTTP 401)"
        );
    }

    #[test]
    fn test_undeclared_status_has_no_description() {
        let err = ApiError::Status {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.description(), None);
        assert!(!err.is_declared());
        // Non-JSON bodies are kept but not interpreted
        assert!(err.server_message().is_none());
        assert_eq!(err.body(), Some("<html>Bad Gateway</html>"));
    }

    #[test]
    fn test_cancelled_carries_nothing() {
        let err = ApiError::Cancelled;
        assert!(err.is_cancelled());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }
}
