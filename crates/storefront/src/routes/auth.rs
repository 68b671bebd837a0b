//! Login and registration handlers.
//!
//! Both actions drive the session-persisted [`AuthSessionState`] through
//! the auth flow, then hand the settled state to the [`Reconciler`] so a
//! guest cart is folded into the new account exactly once before the
//! user is sent on to their destination.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    auth::{AuthFlow, AuthFlowError, AuthSessionState},
    error::{AppError, Result},
    middleware::{load_auth_state, load_cart, save_auth_state, save_cart, set_current_user},
    models::CurrentUser,
    reconcile::{Destination, Reconciler, RedirectTarget},
    session_store::AuthenticatedUser,
    state::AppState,
};

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    error: Option<String>,
    redirect: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    error: Option<String>,
    redirect: String,
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    redirect: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    name: String,
    email: String,
    password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /login - Render the login page.
pub async fn login_page(Query(query): Query<AuthPageQuery>) -> LoginTemplate {
    LoginTemplate {
        error: query.error,
        redirect: RedirectTarget::from_query(query.redirect)
            .as_str()
            .to_owned(),
    }
}

/// GET /register - Render the registration page.
pub async fn register_page(Query(query): Query<AuthPageQuery>) -> RegisterTemplate {
    RegisterTemplate {
        error: query.error,
        redirect: RedirectTarget::from_query(query.redirect)
            .as_str()
            .to_owned(),
    }
}

/// POST /login - Authenticate against the session store.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let redirect = RedirectTarget::from_query(query.redirect);
    let mut auth = load_auth_state(&session).await?;

    // An already-authenticated session navigates straight to its
    // destination; the merge fired when the session first authenticated.
    if auth.user().is_some() {
        return Ok(Redirect::to(Destination::from_target(&redirect).path()).into_response());
    }

    let flow = AuthFlow::new(state.session_store());
    match flow.login(&mut auth, &form.email, &form.password).await {
        Ok(user) => finish_authentication(&state, &session, auth, &user, &redirect).await,
        Err(error) => {
            save_auth_state(&session, &auth).await?;
            Ok(retry_redirect("/login", &redirect, &error))
        }
    }
}

/// POST /register - Create an account via the session store.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let redirect = RedirectTarget::from_query(query.redirect);
    let mut auth = load_auth_state(&session).await?;

    if auth.user().is_some() {
        return Ok(Redirect::to(Destination::from_target(&redirect).path()).into_response());
    }

    let flow = AuthFlow::new(state.session_store());
    match flow
        .register(&mut auth, &form.name, &form.email, &form.password)
        .await
    {
        Ok(user) => finish_authentication(&state, &session, auth, &user, &redirect).await,
        Err(error) => {
            save_auth_state(&session, &auth).await?;
            Ok(retry_redirect("/register", &redirect, &error))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Run post-authentication reconciliation and persist the settled session.
///
/// Registration and login converge here: the guest cart is merged into the
/// account (at most once), ownership of the session cart moves to the new
/// identity, and the response navigates to the resolved destination.
async fn finish_authentication(
    state: &AppState,
    session: &Session,
    mut auth: AuthSessionState,
    user: &AuthenticatedUser,
    redirect: &RedirectTarget,
) -> Result<Response> {
    let mut cart = load_cart(session, &auth).await?;

    // A fresh controller observing a just-authenticated state fires exactly
    // once; both callers hand in a state that `complete` has just set.
    let mut reconciler = Reconciler::new();
    let destination = match reconciler
        .observe(&auth, &cart, redirect, state.session_store())
        .await
    {
        Some(destination) => destination,
        None => return Err(AppError::Internal("merge fired before login".to_string())),
    };

    auth.clear_guest();
    cart.transfer_to(user.identity.clone());

    save_auth_state(session, &auth).await?;
    save_cart(session, &cart).await?;
    set_current_user(
        session,
        &CurrentUser {
            identity: user.identity.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        },
    )
    .await?;

    Ok(Redirect::to(destination.path()).into_response())
}

/// Send the user back to the form with the failure message and the
/// original redirect target preserved.
fn retry_redirect(page: &str, redirect: &RedirectTarget, error: &AuthFlowError) -> Response {
    let location = format!(
        "{page}?redirect={}&error={}",
        urlencoding::encode(redirect.as_str()),
        urlencoding::encode(&error.to_string())
    );
    Redirect::to(&location).into_response()
}
