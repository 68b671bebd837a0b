//! External session store client.
//!
//! The session store is the identity service backing the storefront: it
//! authenticates credentials, registers accounts, and accepts guest-cart
//! merge requests. Password hashing and token issuance happen there, never
//! here.
//!
//! The [`SessionStore`] trait is the seam route handlers and the
//! reconciliation controller depend on; [`HttpSessionStore`] is the
//! production implementation speaking JSON over HTTP via `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use luxora_core::{Email, GuestId, UserIdentity};

use crate::config::SessionStoreConfig;

/// Errors that can occur when talking to the session store.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request (bad credentials, duplicate email).
    /// Carries the upstream message, which is safe to show to the user.
    #[error("{0}")]
    Rejected(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The store returned a status we have no mapping for.
    #[error("unexpected status {0} from session store")]
    Unexpected(u16),
}

/// A user as authenticated by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Opaque identity token, echoed back on cart merges.
    #[serde(rename = "token")]
    pub identity: UserIdentity,
    /// Display name.
    pub name: String,
    /// Account email, as recorded by the store.
    pub email: String,
}

/// Interface to the external identity and cart service.
///
/// Kept as a trait so the reconciliation controller and route handlers can
/// be exercised against an in-memory fake.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Authenticate credentials, returning the user identity on success.
    async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthenticatedUser, SessionStoreError>;

    /// Create an account, returning the (already authenticated) user.
    async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthenticatedUser, SessionStoreError>;

    /// Merge the guest cart identified by `guest_id` into `user`'s
    /// persistent cart. One-shot per authentication.
    async fn merge_cart(
        &self,
        guest_id: GuestId,
        user: &UserIdentity,
    ) -> Result<(), SessionStoreError>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct MergeCartRequest<'a> {
    #[serde(rename = "guestId")]
    guest_id: GuestId,
    user: &'a UserIdentity,
}

/// Error body shape returned by the session store on rejections.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the external session store API.
#[derive(Clone)]
pub struct HttpSessionStore {
    inner: Arc<HttpSessionStoreInner>,
}

struct HttpSessionStoreInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpSessionStore {
    /// Create a new session store client.
    #[must_use]
    pub fn new(config: &SessionStoreConfig) -> Self {
        Self {
            inner: Arc::new(HttpSessionStoreInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Execute a JSON POST against the store and decode the response.
    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, SessionStoreError>
    where
        Req: Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.inner.api_key))
            .json(body)
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status.is_client_error() {
            // Rejections carry a user-facing message in the body
            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .map_or_else(|_| status.to_string(), |b| b.message);
            return Err(SessionStoreError::Rejected(message));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "session store returned non-success status"
            );
            return Err(SessionStoreError::Unexpected(status.as_u16()));
        }

        match serde_json::from_str(&response_text) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "failed to parse session store response"
                );
                Err(SessionStoreError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthenticatedUser, SessionStoreError> {
        self.post(
            "/api/users/login",
            &LoginRequest {
                email: email.as_str(),
                password,
            },
        )
        .await
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthenticatedUser, SessionStoreError> {
        self.post(
            "/api/users/register",
            &RegisterRequest {
                name,
                email: email.as_str(),
                password,
            },
        )
        .await
    }

    #[instrument(skip(self), fields(guest_id = %guest_id))]
    async fn merge_cart(
        &self,
        guest_id: GuestId,
        user: &UserIdentity,
    ) -> Result<(), SessionStoreError> {
        // The merge endpoint acknowledges with an empty JSON object
        let _ack: serde_json::Value = self
            .post("/api/cart/merge", &MergeCartRequest { guest_id, user })
            .await?;
        Ok(())
    }
}
