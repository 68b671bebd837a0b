//! Product reference type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to a product in the catalog.
///
/// Used as the unique key of a cart line: a cart never holds two lines for
/// the same `ProductRef`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRef(String);

impl ProductRef {
    /// Create a product reference from a catalog key.
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductRef {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ProductRef {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}
