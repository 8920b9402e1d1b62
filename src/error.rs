//! Error types for the merchant dashboard.

/// All errors that can occur when talking to the merchant backend or
/// driving the dashboard controllers.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// HTTP transport failed (connection refused, timeout, TLS, ...).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error(
        "API error (HTTP {status}): {}",
        if message.is_empty() { "no error message" } else { message.as_str() }
    )]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body's `message` or `error` field, empty
        /// when the body carries neither.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be parsed or extended.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// An operation needed a persisted merchant but got an unsaved draft.
    #[error("merchant ID is required for this operation")]
    MissingId,

    /// The in-memory backend failed (lock poisoned or injected failure).
    #[error("backend error: {0}")]
    Backend(Box<dyn core::error::Error + Send + Sync>),

    /// Writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Returns the text a controller should show for this error.
    ///
    /// Backend errors carry a server-supplied message which is preferred;
    /// everything else falls back to `fallback`.
    #[inline]
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match *self {
            Self::Api { ref message, .. } if !message.trim().is_empty() => message.clone(),
            Self::MissingId => self.to_string(),
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) => fallback.to_owned(),
            Self::Api { .. }
            | Self::Serialization(_)
            | Self::Url(_)
            | Self::Config(_)
            | Self::Backend(_)
            | Self::Io(_) => fallback.to_owned(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DashboardError>;

/// Extracts a human-readable message from a non-2xx response body.
///
/// Only a non-blank JSON `message` (then `error`) string field counts.
/// Empty, plain-text and HTML bodies yield `None` so callers show their own
/// fallback text.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let map = value.as_object()?;
    ["message", "error"].into_iter().find_map(|key| {
        map.get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_owned)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = DashboardError::from(serde_err);
        assert!(matches!(err, DashboardError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn error_api_display() {
        let err = DashboardError::Api {
            status: 404,
            message: "Merchant not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Merchant not found"));
    }

    #[test]
    fn user_message_prefers_backend_message() {
        let err = DashboardError::Api {
            status: 409,
            message: "Email already registered".to_owned(),
        };
        assert_eq!(
            err.user_message("Failed to create merchant"),
            "Email already registered"
        );
    }

    #[test]
    fn user_message_falls_back_for_blank_backend_message() {
        let err = DashboardError::Api {
            status: 500,
            message: "   ".to_owned(),
        };
        assert_eq!(
            err.user_message("Failed to delete merchant"),
            "Failed to delete merchant"
        );
    }

    #[test]
    fn user_message_falls_back_for_transport_errors() {
        let err = DashboardError::Backend("connection reset".into());
        assert_eq!(err.user_message("Failed to load"), "Failed to load");
    }

    #[test]
    fn error_api_display_without_message() {
        let err = DashboardError::Api {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 502): no error message");
    }

    #[test]
    fn extract_message_field() {
        let body = r#"{"message":"Validation failed","status":400}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Validation failed"));
    }

    #[test]
    fn extract_error_field_when_message_missing() {
        let body = r#"{"error":"Bad Request"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Bad Request"));
    }

    #[test]
    fn extract_skips_blank_message_field() {
        let body = r#"{"message":"  ","error":"Conflict"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Conflict"));
    }

    #[test]
    fn extract_ignores_non_json_bodies() {
        assert_eq!(extract_error_message(""), None);
        assert_eq!(extract_error_message("  gateway timeout \n"), None);
        assert_eq!(
            extract_error_message("<html><body><h1>502 Bad Gateway</h1></body></html>"),
            None
        );
        assert_eq!(extract_error_message(r#"{"status":500}"#), None);
    }

    #[test]
    fn empty_body_falls_back_to_caller_text() {
        let err = DashboardError::Api {
            status: 500,
            message: extract_error_message("").unwrap_or_default(),
        };
        assert_eq!(
            err.user_message("Failed to delete merchant"),
            "Failed to delete merchant"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DashboardError>();
    }
}
