//! Wire types for the Sweet Shop REST API.
//!
//! Field names follow the server's JSON bodies (snake_case throughout).

use serde::{Deserialize, Serialize};

use sweet_shop_core::{CurrentUser, Email, Price, Sweet};

/// Body for `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthCredentials {
    /// Account email.
    pub email: String,
    /// Plaintext password (sent over TLS, never stored).
    pub password: String,
}

/// Response from the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: CurrentUser,
    /// Bearer token for subsequent requests.
    pub access_token: String,
}

/// Body for `POST /sweets` (admin).
#[derive(Debug, Clone, Serialize)]
pub struct CreateSweet {
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Initial stock level.
    pub quantity: u32,
    /// Optional product image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body for `POST /sweets/{id}/purchase`.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest {
    /// Units to purchase (at least 1).
    pub quantity: u32,
}

/// Response from a purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseReceipt {
    /// Whether the purchase went through.
    pub success: bool,
    /// Human-readable confirmation from the server.
    pub message: String,
    /// The sweet with its post-purchase stock level.
    pub sweet: Sweet,
    /// Units actually purchased.
    pub quantity_purchased: u32,
}

/// Body for `PUT /users/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfile {
    /// New account email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Body for `PUT /users/password`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePassword {
    /// The password being replaced.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Error body shape used by the server (`{"detail": ...}`).
///
/// `detail` is usually a string but can be a structured validation list on
/// 422, so it is kept as a raw value and flattened for display.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// The server's error detail.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten the detail into a display string, if present.
    #[must_use]
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_parses() {
        let json = r#"{
            "user": {"id": "u-1", "email": "customer@example.com", "is_admin": false},
            "access_token": "tok-abc"
        }"#;
        let parsed: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "tok-abc");
        assert_eq!(parsed.user.email.as_str(), "customer@example.com");
    }

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Sweet not found"}"#).unwrap();
        assert_eq!(body.detail_text(), Some("Sweet not found".to_string()));
    }

    #[test]
    fn test_error_body_structured_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body", "price"]}]}"#).unwrap();
        assert!(body.detail_text().unwrap().contains("price"));
    }

    #[test]
    fn test_error_body_missing_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail_text(), None);
    }
}
