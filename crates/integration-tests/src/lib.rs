//! Integration tests for Luxora.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront
//! cargo run -p luxora-storefront
//!
//! # Run integration tests
//! cargo test -p luxora-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_auth_cart` - Login/registration flow and one-time cart merge
//! - `storefront_upload` - Image upload forwarding to the media host
//!
//! The tests talk to a running storefront over HTTP with a cookie-aware
//! client; they are `#[ignore]`d by default because they need a server and
//! real collaborator credentials in the environment.
