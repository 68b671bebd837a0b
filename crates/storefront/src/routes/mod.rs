//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Home page (default landing destination)
//! GET  /health          - Health check
//!
//! # Auth
//! GET  /login           - Login page (?redirect=..., ?error=...)
//! POST /login           - Login action
//! GET  /register        - Registration page (?redirect=..., ?error=...)
//! POST /register        - Registration action
//!
//! # Cart (session-scoped, JSON)
//! GET  /cart            - Cart contents
//! POST /cart/add        - Add a product (merges into existing line)
//! POST /cart/remove     - Remove a product line
//!
//! # Checkout (requires auth)
//! GET  /checkout        - Checkout page
//!
//! # Uploads
//! POST /upload          - Forward an image to the external media host
//! ```

pub mod auth;
pub mod cart;
pub mod pages;
pub mod upload;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(pages::home))
        // Auth routes
        .merge(auth_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout page (requires auth)
        .route("/checkout", get(pages::checkout))
        // Upload forwarding
        .route("/upload", post(upload::forward))
}
