//! API error taxonomy and user-facing message translation.
//!
//! Network and HTTP errors are never fatal: callers catch them, run them
//! through [`user_message`], and surface the result to the view layer.

use thiserror::Error;

/// Errors produced by the Sweet Shop API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or timeout (no usable response received).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, with the server's `detail` message when present.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("(no detail)"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field from the server's JSON error body, if parseable.
        detail: Option<String>,
    },

    /// The response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status code, if this error carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// Whether this is a request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Whether this is a connection-level failure (server unreachable).
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }
}

/// Translate an [`ApiError`] into a message fit for display.
///
/// Keyed on status code; the server's own `detail` is preferred for the
/// statuses where it carries validation context.
#[must_use]
pub fn user_message(error: &ApiError) -> String {
    if error.is_timeout() {
        return "Request timed out. The server might be busy, please try again.".to_string();
    }
    if error.is_connect() {
        return "Unable to connect to the server. Please check your connection and try again."
            .to_string();
    }

    match error {
        ApiError::Status { status, detail } => {
            let detail = detail.as_deref();
            match status {
                400 => detail
                    .unwrap_or("Invalid request. Please check your input and try again.")
                    .to_string(),
                401 => "Authentication failed. Please check your credentials.".to_string(),
                403 => "Access denied. You don't have permission to perform this action."
                    .to_string(),
                404 => "Resource not found. The requested item may have been removed.".to_string(),
                409 => detail
                    .unwrap_or("Conflict. This item may already exist.")
                    .to_string(),
                422 => detail
                    .unwrap_or("Invalid data provided. Please check your input.")
                    .to_string(),
                500 => "Server error. Please try again later or contact support.".to_string(),
                503 => "Service temporarily unavailable. Please try again in a few minutes."
                    .to_string(),
                other => detail.map_or_else(
                    || format!("Server error ({other}). Please try again."),
                    ToString::to_string,
                ),
            }
        }
        ApiError::Http(_) | ApiError::Parse(_) => {
            "An unexpected error occurred. Please try again.".to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status(code: u16, detail: Option<&str>) -> ApiError {
        ApiError::Status {
            status: code,
            detail: detail.map(String::from),
        }
    }

    #[test]
    fn test_detail_preferred_for_validation_statuses() {
        let err = status(409, Some("Sweet already exists"));
        assert_eq!(user_message(&err), "Sweet already exists");

        let err = status(422, Some("Insufficient stock. Only 2 left."));
        assert_eq!(user_message(&err), "Insufficient stock. Only 2 left.");
    }

    #[test]
    fn test_fixed_messages_ignore_detail() {
        let err = status(401, Some("token expired at 12:00"));
        assert_eq!(
            user_message(&err),
            "Authentication failed. Please check your credentials."
        );
    }

    #[test]
    fn test_fallbacks_without_detail() {
        assert!(user_message(&status(400, None)).starts_with("Invalid request"));
        assert!(user_message(&status(404, None)).starts_with("Resource not found"));
        assert!(user_message(&status(500, None)).starts_with("Server error"));
        assert!(user_message(&status(418, None)).contains("418"));
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(status(404, None).status(), Some(404));
        let parse_err = ApiError::from(serde_json::from_str::<u32>("[").unwrap_err());
        assert_eq!(parse_err.status(), None);
    }

    #[test]
    fn test_display_includes_detail() {
        let err = status(409, Some("duplicate"));
        assert_eq!(err.to_string(), "HTTP 409: duplicate");
        let err = status(500, None);
        assert_eq!(err.to_string(), "HTTP 500: (no detail)");
    }
}
