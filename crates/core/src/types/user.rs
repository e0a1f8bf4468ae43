//! Session identity and account types.
//!
//! These are the user-facing shapes returned by the API; the session keeps
//! only the minimal identity needed to render the UI and gate admin actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::id::{OrderId, SweetId, UserId};

/// The logged-in user's identity as held by the session.
///
/// Minimal data kept in the store to identify the current user. The bearer
/// token lives separately in the token slot, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's ID on the server.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Whether the user may use the admin inventory endpoints.
    #[serde(default)]
    pub is_admin: bool,
}

/// Full account profile as returned by `GET /users/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User's ID on the server.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Whether the user is an admin.
    #[serde(default)]
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A past purchase from `GET /users/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order ID on the server.
    pub id: OrderId,
    /// The sweet that was purchased.
    pub sweet_id: SweetId,
    /// Name of the sweet at purchase time.
    pub sweet_name: String,
    /// Units purchased.
    pub quantity: u32,
    /// When the purchase was made.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_is_admin_defaults_false() {
        // Older server versions omit the flag entirely
        let json = r#"{"id": "u-1", "email": "customer@example.com"}"#;
        let user: CurrentUser = serde_json::from_str(json).unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.id, UserId::new("u-1"));
    }

    #[test]
    fn test_current_user_roundtrip() {
        let user = CurrentUser {
            id: UserId::new("u-7"),
            email: Email::parse("admin@example.com").unwrap(),
            is_admin: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        let parsed: CurrentUser = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, user);
    }
}
