//! Core types for Luxora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod identity;
pub mod product;

pub use email::{Email, EmailError};
pub use identity::{GuestId, UserIdentity};
pub use product::ProductRef;
