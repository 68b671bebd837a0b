//! Home and checkout pages.

use askama::Template;
use askama_web::WebTemplate;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    cart::CartLine,
    error::Result,
    middleware::{OptionalAuth, RequireAuth, load_auth_state, load_cart},
    models::CurrentUser,
};

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    user: Option<CurrentUser>,
    item_count: u32,
}

#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    user: CurrentUser,
    lines: Vec<CartLine>,
    item_count: u32,
}

/// GET / - Home page.
#[instrument(skip_all)]
pub async fn home(OptionalAuth(user): OptionalAuth, session: Session) -> Result<HomeTemplate> {
    let auth = load_auth_state(&session).await?;
    let cart = load_cart(&session, &auth).await?;
    Ok(HomeTemplate {
        user,
        item_count: cart.item_count(),
    })
}

/// GET /checkout - Checkout page, login required.
#[instrument(skip_all)]
pub async fn checkout(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<CheckoutTemplate> {
    let auth = load_auth_state(&session).await?;
    let cart = load_cart(&session, &auth).await?;
    Ok(CheckoutTemplate {
        user,
        lines: cart.lines().to_vec(),
        item_count: cart.item_count(),
    })
}
