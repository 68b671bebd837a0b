//! Authentication session state and flow.
//!
//! [`AuthSessionState`] is the per-session record of who the visitor is:
//! a guest identity before login, a user identity after. It moves through
//! a small phase machine:
//!
//! ```text
//! idle -> submitting -> { authenticated, failed }
//! ```
//!
//! `authenticated` is terminal for the session (sign-out is an external
//! concern). `failed` returns to `submitting` on the next attempt, clearing
//! the previous error. The state is stored in the tower-session between
//! requests and mutated only through the transition methods here.
//!
//! [`AuthFlow`] drives the machine around the session store calls: empty
//! fields are rejected before any network call, rejections surface into the
//! visible error message, success records the user identity.

mod error;

pub use error::AuthFlowError;

use serde::{Deserialize, Serialize};

use luxora_core::{Email, GuestId, UserIdentity};

use crate::session_store::{AuthenticatedUser, SessionStore, SessionStoreError};

/// Phase of the authentication state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthPhase {
    /// No attempt made yet (or a prior failure has been acknowledged).
    Idle,
    /// A login/registration request is in flight.
    Submitting,
    /// The session belongs to an authenticated user. Terminal.
    Authenticated,
    /// The last attempt was rejected; `error` holds the message.
    Failed,
}

/// Per-session authentication state.
///
/// Invariants, enforced by the transition methods:
/// - the loading flag is true only while a request is in flight
///   (`phase == Submitting`);
/// - `error` is cleared at the start of each new attempt;
/// - `user` is set exactly once, on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSessionState {
    user: Option<UserIdentity>,
    guest_id: Option<GuestId>,
    phase: AuthPhase,
    error: Option<String>,
}

impl AuthSessionState {
    /// Fresh state for an unauthenticated visitor.
    #[must_use]
    pub const fn for_guest(guest_id: GuestId) -> Self {
        Self {
            user: None,
            guest_id: Some(guest_id),
            phase: AuthPhase::Idle,
            error: None,
        }
    }

    /// The authenticated user identity, if present.
    #[must_use]
    pub const fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// The guest identity, if not yet superseded.
    #[must_use]
    pub const fn guest_id(&self) -> Option<GuestId> {
        self.guest_id
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// True while an authentication request is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == AuthPhase::Submitting
    }

    /// The message of the last failed attempt, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Begin a new attempt: `idle`/`failed` -> `submitting`.
    ///
    /// Clears the previous error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthFlowError::InFlight`] if an attempt is already in
    /// flight (repeat submissions are blocked, not queued) and
    /// [`AuthFlowError::AlreadyAuthenticated`] if the machine is terminal.
    pub fn begin_attempt(&mut self) -> Result<(), AuthFlowError> {
        match self.phase {
            AuthPhase::Idle | AuthPhase::Failed => {
                self.error = None;
                self.phase = AuthPhase::Submitting;
                Ok(())
            }
            AuthPhase::Submitting => Err(AuthFlowError::InFlight),
            AuthPhase::Authenticated => Err(AuthFlowError::AlreadyAuthenticated),
        }
    }

    /// Record a successful attempt: `submitting` -> `authenticated`.
    pub fn complete(&mut self, user: UserIdentity) {
        self.user = Some(user);
        self.error = None;
        self.phase = AuthPhase::Authenticated;
    }

    /// Record a rejected attempt: `submitting` -> `failed`.
    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.phase = AuthPhase::Failed;
    }

    /// Drop the guest identity after a completed merge attempt.
    pub fn clear_guest(&mut self) {
        self.guest_id = None;
    }
}

/// Drives the authentication state machine against the session store.
pub struct AuthFlow<'a> {
    store: &'a dyn SessionStore,
}

impl<'a> AuthFlow<'a> {
    /// Create a flow bound to a session store.
    #[must_use]
    pub const fn new(store: &'a dyn SessionStore) -> Self {
        Self { store }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthFlowError::Validation`] if either field is empty or the
    /// email is malformed - checked before any network call, leaving the
    /// state untouched. Returns [`AuthFlowError::Auth`] when the store call
    /// fails; the visible message is also recorded in the state (verbatim
    /// for rejections, generic for transport failures).
    pub async fn login(
        &self,
        state: &mut AuthSessionState,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthFlowError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthFlowError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        let email =
            Email::parse(email).map_err(|e| AuthFlowError::Validation(e.to_string()))?;

        state.begin_attempt()?;

        match self.store.login(&email, password).await {
            Ok(user) => {
                state.complete(user.identity.clone());
                Ok(user)
            }
            Err(e) => {
                let message = visible_message(&e);
                state.fail(message.clone());
                Err(AuthFlowError::Auth(message))
            }
        }
    }

    /// Register a new account.
    ///
    /// On success the session transitions directly to `authenticated`;
    /// server-side rejections (e.g., duplicate email) surface exactly like
    /// login failures.
    ///
    /// # Errors
    ///
    /// Returns [`AuthFlowError::Validation`] for a malformed email and
    /// [`AuthFlowError::Auth`] when the store rejects the registration.
    pub async fn register(
        &self,
        state: &mut AuthSessionState,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthFlowError> {
        let email =
            Email::parse(email).map_err(|e| AuthFlowError::Validation(e.to_string()))?;

        state.begin_attempt()?;

        match self.store.register(name, &email, password).await {
            Ok(user) => {
                state.complete(user.identity.clone());
                Ok(user)
            }
            Err(e) => {
                let message = visible_message(&e);
                state.fail(message.clone());
                Err(AuthFlowError::Auth(message))
            }
        }
    }
}

/// The message recorded in the state and rendered on the auth pages.
///
/// Only a `Rejected` message comes from the store verbatim (bad credentials,
/// duplicate email). Transport and protocol failures carry internal detail
/// (URLs, statuses, parse errors) that stays in the logs.
fn visible_message(error: &SessionStoreError) -> String {
    match error {
        SessionStoreError::Rejected(message) => message.clone(),
        other => {
            tracing::error!(error = %other, "session store call failed");
            "Service temporarily unavailable, please try again".to_string()
        }
    }
}
