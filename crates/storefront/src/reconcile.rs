//! Auth-cart reconciliation.
//!
//! When a visitor authenticates, their in-progress guest cart must be merged
//! into the account's persistent cart exactly once, and the visitor must then
//! be sent to the right place: checkout if that is where they were headed,
//! the landing page otherwise.
//!
//! [`Reconciler::observe`] is edge-triggered on the absent -> present
//! transition of the user identity, guarded by a one-shot flag: observing the
//! same authenticated state again produces no second merge and no second
//! navigation. The merge is best-effort; a failed merge is logged and the
//! navigation proceeds unchanged.

use tracing::instrument;

use crate::auth::AuthSessionState;
use crate::cart::Cart;
use crate::session_store::SessionStore;

/// The post-authentication navigation target, supplied verbatim via the
/// `redirect` query parameter on the login/registration pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    /// Default landing destination when no `redirect` parameter is present.
    pub const DEFAULT: &'static str = "/";

    /// Build a target from the raw query parameter value.
    #[must_use]
    pub fn from_query(raw: Option<String>) -> Self {
        Self(raw.unwrap_or_else(|| Self::DEFAULT.to_string()))
    }

    /// The verbatim target text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RedirectTarget {
    fn default() -> Self {
        Self::from_query(None)
    }
}

/// Where to send the visitor after authentication resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The checkout page: the target text mentions "checkout".
    Checkout,
    /// The default landing page.
    Home,
}

impl Destination {
    /// Decide the destination from the redirect target.
    #[must_use]
    pub fn from_target(target: &RedirectTarget) -> Self {
        if target.as_str().contains("checkout") {
            Self::Checkout
        } else {
            Self::Home
        }
    }

    /// The path to navigate to.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Checkout => "/checkout",
            Self::Home => "/",
        }
    }
}

/// One-shot controller reconciling the guest cart with a fresh login.
#[derive(Debug, Default)]
pub struct Reconciler {
    fired: bool,
}

impl Reconciler {
    /// Create a controller that has not fired yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Observe the authentication state after a change.
    ///
    /// Returns `Some(destination)` exactly once, on the observation where the
    /// user identity is first present; every other observation returns `None`
    /// (no merge, no navigation). When it fires:
    ///
    /// - a merge request is issued iff the cart is non-empty AND a guest
    ///   identity exists - at most one per authentication;
    /// - a merge failure is logged and swallowed, never blocking navigation;
    /// - the destination is returned only after the merge attempt resolves.
    ///
    /// Both the merge and no-merge paths navigate identically, regardless of
    /// cart contents.
    #[instrument(skip_all)]
    pub async fn observe(
        &mut self,
        auth: &AuthSessionState,
        cart: &Cart,
        redirect: &RedirectTarget,
        store: &dyn SessionStore,
    ) -> Option<Destination> {
        // Level stays low until authentication succeeds
        let user = auth.user()?;

        // Edge trigger: only the first observation of the authenticated
        // state fires
        if self.fired {
            return None;
        }
        self.fired = true;

        if !cart.is_empty()
            && let Some(guest_id) = auth.guest_id()
        {
            if let Err(e) = store.merge_cart(guest_id, user).await {
                // Best-effort: the user is logged in either way
                tracing::warn!(%guest_id, error = %e, "guest cart merge failed");
            } else {
                tracing::info!(%guest_id, "guest cart merged");
            }
        }

        Some(Destination::from_target(redirect))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use luxora_core::{Email, GuestId, ProductRef, UserIdentity};

    use super::*;
    use crate::session_store::{AuthenticatedUser, SessionStoreError};

    /// Fake store that counts merge requests and optionally fails them.
    #[derive(Default)]
    struct RecordingStore {
        fail_merge: bool,
        merges: Mutex<Vec<(GuestId, UserIdentity)>>,
    }

    impl RecordingStore {
        fn failing() -> Self {
            Self {
                fail_merge: true,
                ..Self::default()
            }
        }

        fn merge_count(&self) -> usize {
            self.merges.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SessionStore for RecordingStore {
        async fn login(
            &self,
            _email: &Email,
            _password: &str,
        ) -> Result<AuthenticatedUser, SessionStoreError> {
            unreachable!("reconciliation never logs in")
        }

        async fn register(
            &self,
            _name: &str,
            _email: &Email,
            _password: &str,
        ) -> Result<AuthenticatedUser, SessionStoreError> {
            unreachable!("reconciliation never registers")
        }

        async fn merge_cart(
            &self,
            guest_id: GuestId,
            user: &UserIdentity,
        ) -> Result<(), SessionStoreError> {
            self.merges.lock().unwrap().push((guest_id, user.clone()));
            if self.fail_merge {
                Err(SessionStoreError::Unexpected(500))
            } else {
                Ok(())
            }
        }
    }

    fn authenticated_state(guest_id: GuestId) -> AuthSessionState {
        let mut state = AuthSessionState::for_guest(guest_id);
        state.begin_attempt().unwrap();
        state.complete(UserIdentity::from("tok_1"));
        state
    }

    fn filled_cart(guest_id: GuestId) -> Cart {
        let mut cart = Cart::for_guest(guest_id);
        cart.add(ProductRef::from("sku-a"), 2);
        cart
    }

    #[tokio::test]
    async fn test_unauthenticated_state_never_fires() {
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();
        let auth = AuthSessionState::for_guest(guest_id);
        let cart = filled_cart(guest_id);
        let mut reconciler = Reconciler::new();

        let dest = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;

        assert!(dest.is_none());
        assert_eq!(store.merge_count(), 0);

        // The edge can still fire later: the user becoming present is the
        // trigger, not the first observation
        let auth = authenticated_state(guest_id);
        let dest = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;
        assert_eq!(dest, Some(Destination::Home));
        assert_eq!(store.merge_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_skips_merge_but_navigates() {
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();
        let auth = authenticated_state(guest_id);
        let cart = Cart::for_guest(guest_id);
        let mut reconciler = Reconciler::new();

        let dest = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;

        assert_eq!(dest, Some(Destination::Home));
        assert_eq!(store.merge_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_guest_id_skips_merge_but_navigates() {
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();
        let mut auth = authenticated_state(guest_id);
        auth.clear_guest();
        let cart = filled_cart(guest_id);
        let mut reconciler = Reconciler::new();

        let dest = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;

        assert_eq!(dest, Some(Destination::Home));
        assert_eq!(store.merge_count(), 0);
    }

    #[tokio::test]
    async fn test_non_empty_cart_with_guest_merges_exactly_once() {
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();
        let auth = authenticated_state(guest_id);
        let cart = filled_cart(guest_id);
        let mut reconciler = Reconciler::new();

        let dest = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;

        assert_eq!(dest, Some(Destination::Home));
        assert_eq!(store.merge_count(), 1);

        let (merged_guest, merged_user) = store.merges.lock().unwrap()[0].clone();
        assert_eq!(merged_guest, guest_id);
        assert_eq!(merged_user.as_str(), "tok_1");
    }

    #[tokio::test]
    async fn test_merge_failure_never_blocks_navigation() {
        let store = RecordingStore::failing();
        let guest_id = GuestId::generate();
        let auth = authenticated_state(guest_id);
        let cart = filled_cart(guest_id);
        let mut reconciler = Reconciler::new();

        let dest = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;

        // Navigation happens exactly once regardless of merge outcome
        assert_eq!(dest, Some(Destination::Home));
        assert_eq!(store.merge_count(), 1);
    }

    #[tokio::test]
    async fn test_fresh_controller_always_resolves_authenticated_state() {
        // The auth handlers rely on this: whatever the cart and guest-id
        // shape, the first observation of an authenticated state yields a
        // destination
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();

        let mut no_guest = authenticated_state(guest_id);
        no_guest.clear_guest();

        let configurations = [
            (authenticated_state(guest_id), Cart::for_guest(guest_id)),
            (authenticated_state(guest_id), filled_cart(guest_id)),
            (no_guest, filled_cart(guest_id)),
        ];

        for (auth, cart) in configurations {
            let mut reconciler = Reconciler::new();
            let dest = reconciler
                .observe(&auth, &cart, &RedirectTarget::default(), &store)
                .await;
            assert!(dest.is_some());
        }
    }

    #[tokio::test]
    async fn test_repeated_observation_is_idempotent() {
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();
        let auth = authenticated_state(guest_id);
        let cart = filled_cart(guest_id);
        let mut reconciler = Reconciler::new();

        let first = reconciler
            .observe(&auth, &cart, &RedirectTarget::default(), &store)
            .await;
        assert!(first.is_some());

        // Re-renders with an unchanged user: no second merge, no second
        // navigation
        for _ in 0..3 {
            let again = reconciler
                .observe(&auth, &cart, &RedirectTarget::default(), &store)
                .await;
            assert!(again.is_none());
        }
        assert_eq!(store.merge_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_redirect_routes_to_checkout() {
        let store = RecordingStore::default();
        let guest_id = GuestId::generate();
        let auth = authenticated_state(guest_id);
        let cart = Cart::for_guest(guest_id);

        let redirect = RedirectTarget::from_query(Some("/checkout".to_string()));
        let mut reconciler = Reconciler::new();
        let dest = reconciler.observe(&auth, &cart, &redirect, &store).await;
        assert_eq!(dest, Some(Destination::Checkout));
    }

    #[test]
    fn test_destination_from_target() {
        let checkout = RedirectTarget::from_query(Some("/checkout".to_string()));
        assert_eq!(Destination::from_target(&checkout), Destination::Checkout);

        // Substring match, not an exact path
        let nested = RedirectTarget::from_query(Some("/cart?next=checkout".to_string()));
        assert_eq!(Destination::from_target(&nested), Destination::Checkout);

        let home = RedirectTarget::from_query(Some("/".to_string()));
        assert_eq!(Destination::from_target(&home), Destination::Home);

        let absent = RedirectTarget::from_query(None);
        assert_eq!(absent.as_str(), "/");
        assert_eq!(Destination::from_target(&absent), Destination::Home);
    }

    #[test]
    fn test_destination_paths() {
        assert_eq!(Destination::Checkout.path(), "/checkout");
        assert_eq!(Destination::Home.path(), "/");
    }
}
