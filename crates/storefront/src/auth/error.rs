//! Authentication flow error types.

use thiserror::Error;

/// Errors that can occur while driving the authentication flow.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// A required field is missing or malformed. Caught before any network
    /// call; blocks submission locally.
    #[error("{0}")]
    Validation(String),

    /// The session store rejected the attempt (bad credentials, duplicate
    /// email). Surfaced into the visible error message; does not block retry.
    #[error("{0}")]
    Auth(String),

    /// An attempt is already in flight for this session.
    #[error("an authentication request is already in progress")]
    InFlight,

    /// The session is already authenticated; the flow is terminal.
    #[error("already signed in")]
    AlreadyAuthenticated,
}
