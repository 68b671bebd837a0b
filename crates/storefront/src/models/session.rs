//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use luxora_core::UserIdentity;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Opaque identity token issued by the session store.
    pub identity: UserIdentity,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
}

/// Session keys for authentication and cart data.
pub mod keys {
    /// Key for the authentication state machine.
    pub const AUTH_STATE: &str = "auth_state";

    /// Key for the current logged-in user's profile.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session-scoped cart.
    pub const CART: &str = "cart";
}
