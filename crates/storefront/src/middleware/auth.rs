//! Authentication middleware, extractors, and session helpers.
//!
//! The authentication state machine and the cart live in the tower-session;
//! the helpers here are the only code that reads or writes them. A guest
//! identity is assigned on the first unauthenticated visit and persists in
//! the session until a cart merge supersedes it.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use luxora_core::GuestId;

use crate::auth::AuthSessionState;
use crate::cart::Cart;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires an authenticated user.
///
/// If the visitor is not logged in, returns a redirect to the login page
/// (or 401 for API paths).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the visitor is a guest.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                // Check if this is an API request
                let is_api = parts.uri.path().starts_with("/api/");
                if is_api {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin
                }
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request for guests.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

// =============================================================================
// Session helpers
// =============================================================================

/// Load the authentication state, assigning a guest identity on the first
/// unauthenticated visit.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn load_auth_state(
    session: &Session,
) -> Result<AuthSessionState, tower_sessions::session::Error> {
    if let Some(state) = session
        .get::<AuthSessionState>(session_keys::AUTH_STATE)
        .await?
    {
        return Ok(state);
    }

    // First visit: mint a guest identity and persist it
    let state = AuthSessionState::for_guest(GuestId::generate());
    session.insert(session_keys::AUTH_STATE, &state).await?;
    Ok(state)
}

/// Persist the authentication state.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_auth_state(
    session: &Session,
    state: &AuthSessionState,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_STATE, state).await
}

/// Load the session cart, creating an empty guest-owned cart if absent.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_cart(
    session: &Session,
    auth: &AuthSessionState,
) -> Result<Cart, tower_sessions::session::Error> {
    if let Some(cart) = session.get::<Cart>(session_keys::CART).await? {
        return Ok(cart);
    }

    let guest_id = auth.guest_id().unwrap_or_else(GuestId::generate);
    Ok(Cart::for_guest(guest_id))
}

/// Persist the session cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Helper to set the current user's profile in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}
