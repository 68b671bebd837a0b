//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, load_auth_state, load_cart, save_auth_state, save_cart,
    set_current_user,
};
pub use session::create_session_layer;
