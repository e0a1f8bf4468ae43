//! Sweet Shop REST API client.
//!
//! A thin `reqwest` wrapper around the server's JSON endpoints. Every
//! request attaches `Authorization: Bearer <token>` when the shared
//! [`TokenSlot`] holds one; a 401 from a protected endpoint clears the slot
//! as a forced-logout signal (navigation stays with the view layer).
//!
//! # Endpoints
//!
//! - `POST /auth/register`, `POST /auth/login`
//! - `GET/POST /sweets`, `GET/PUT/DELETE /sweets/{id}`
//! - `POST /sweets/{id}/purchase`
//! - `GET/PUT/DELETE /users/profile`, `PUT /users/password`,
//!   `GET /users/orders`

pub mod types;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use sweet_shop_core::{Order, Sweet, SweetId, SweetPatch, UserProfile};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::token::TokenSlot;
use types::{
    AuthCredentials, AuthResponse, ChangePassword, CreateSweet, ErrorBody, PurchaseReceipt,
    PurchaseRequest, UpdateProfile,
};

/// Client for the Sweet Shop REST API.
///
/// Cloning is cheap; clones share the HTTP connection pool and token slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    token_slot: TokenSlot,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, token_slot: TokenSlot) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()?;

        let base_url = config.api_base_url.as_str().trim_end_matches('/').to_owned();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                token_slot,
            }),
        })
    }

    /// Issue a request and return the raw body text of a 2xx response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.http.request(method.clone(), &url);
        if let Some(token) = self.inner.token_slot.get() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        // Body text first, for error diagnostics on malformed responses
        let text = response.text().await?;

        if status.is_success() {
            debug!(%method, path, status = status.as_u16(), "API response");
            return Ok(text);
        }

        // Forced-logout signal: a 401 outside the auth endpoints means the
        // token is no longer valid. Clearing it is our only side effect;
        // where to navigate is the caller's decision.
        if status == StatusCode::UNAUTHORIZED && !path.starts_with("/auth/") {
            tracing::warn!(path, "401 on protected endpoint, clearing stored token");
            self.inner.token_slot.clear();
        }

        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.detail_text());

        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "API error response"
        );

        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    /// Issue a request and decode the JSON response body.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                path,
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error on conflict (already registered), validation
    /// failure, or transport failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = AuthCredentials {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.request(Method::POST, "/auth/register", Some(&body))
            .await
    }

    /// Log in with existing credentials.
    ///
    /// # Errors
    ///
    /// Returns an error on bad credentials or transport failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = AuthCredentials {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.request(Method::POST, "/auth/login", Some(&body)).await
    }

    // =========================================================================
    // Sweets
    // =========================================================================

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_sweets(&self) -> Result<Vec<Sweet>, ApiError> {
        self.request(Method::GET, "/sweets", None::<&()>).await
    }

    /// Fetch a single sweet by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweet does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_sweet(&self, id: &SweetId) -> Result<Sweet, ApiError> {
        self.request(Method::GET, &format!("/sweets/{id}"), None::<&()>)
            .await
    }

    /// Create a new sweet (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error on validation failure, missing permission, or
    /// transport failure.
    #[instrument(skip(self, sweet), fields(name = %sweet.name))]
    pub async fn create_sweet(&self, sweet: &CreateSweet) -> Result<Sweet, ApiError> {
        self.request(Method::POST, "/sweets", Some(sweet)).await
    }

    /// Update fields of an existing sweet (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the sweet does not exist or the request fails.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_sweet(&self, id: &SweetId, patch: &SweetPatch) -> Result<Sweet, ApiError> {
        self.request(Method::PUT, &format!("/sweets/{id}"), Some(patch))
            .await
    }

    /// Delete a sweet (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the sweet does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_sweet(&self, id: &SweetId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("/sweets/{id}"), None::<&()>)
            .await?;
        Ok(())
    }

    /// Purchase `quantity` units of a sweet.
    ///
    /// # Errors
    ///
    /// Returns an error on insufficient stock (422), a missing sweet (404),
    /// or transport failure.
    #[instrument(skip(self), fields(id = %id, quantity))]
    pub async fn purchase(
        &self,
        id: &SweetId,
        quantity: u32,
    ) -> Result<PurchaseReceipt, ApiError> {
        let body = PurchaseRequest { quantity };
        self.request(Method::POST, &format!("/sweets/{id}/purchase"), Some(&body))
            .await
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.request(Method::GET, "/users/profile", None::<&()>)
            .await
    }

    /// Update the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &UpdateProfile) -> Result<UserProfile, ApiError> {
        self.request(Method::PUT, "/users/profile", Some(update))
            .await
    }

    /// Change the current user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the request
    /// fails.
    #[instrument(skip_all)]
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        let body = ChangePassword {
            current_password: current.to_owned(),
            new_password: new.to_owned(),
        };
        self.send(Method::PUT, "/users/password", Some(&body))
            .await?;
        Ok(())
    }

    /// Fetch the current user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<Order>, ApiError> {
        self.request(Method::GET, "/users/orders", None::<&()>)
            .await
    }

    /// Delete the current user's account.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.send(Method::DELETE, "/users/profile", None::<&()>)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("token_slot", &self.inner.token_slot)
            .finish_non_exhaustive()
    }
}
