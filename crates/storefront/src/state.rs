//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::media::MediaHost;
use crate::session_store::SessionStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the external collaborators. The collaborators are held
/// behind their traits so tests can install fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session_store: Arc<dyn SessionStore>,
    media: Arc<dyn MediaHost>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `session_store` - External identity/cart service
    /// * `media` - External media host
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        session_store: Arc<dyn SessionStore>,
        media: Arc<dyn MediaHost>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                session_store,
                media,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session store client.
    #[must_use]
    pub fn session_store(&self) -> &dyn SessionStore {
        &*self.inner.session_store
    }

    /// Get a reference to the media host client.
    #[must_use]
    pub fn media(&self) -> &dyn MediaHost {
        &*self.inner.media
    }
}
