//! Identity newtypes for authenticated users and unauthenticated visitors.
//!
//! A visitor's cart is owned by exactly one of these at a time: a [`GuestId`]
//! before login, a [`UserIdentity`] after. Keeping them as distinct types
//! prevents a guest identifier from being handed to an API that expects an
//! authenticated user.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token identifying an authenticated user.
///
/// Issued by the external session store on successful login or registration.
/// The storefront never inspects its contents; it is carried in the session
/// and echoed back to the session store on cart merges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Wrap a token issued by the session store.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identity and returns its inner token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserIdentity {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for UserIdentity {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// Opaque identifier for an unauthenticated visitor's session.
///
/// Created on the first unauthenticated visit and kept in the session until a
/// cart merge completes, at which point it is superseded by a [`UserIdentity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(Uuid);

impl GuestId {
    /// Generate a fresh guest identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for GuestId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
