//! Session-scoped cart handlers.

use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use luxora_core::ProductRef;

use crate::{
    cart::{Cart, CartLine},
    error::{AppError, Result},
    middleware::{load_auth_state, load_cart, save_cart},
};

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddForm {
    product: String,
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    product: String,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    items: Vec<CartLineView>,
    #[serde(rename = "itemCount")]
    item_count: u32,
}

#[derive(Debug, Serialize)]
pub struct CartLineView {
    product: String,
    quantity: u32,
}

impl CartView {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from_line).collect(),
            item_count: cart.item_count(),
        }
    }
}

impl CartLineView {
    fn from_line(line: &CartLine) -> Self {
        Self {
            product: line.product.as_str().to_owned(),
            quantity: line.quantity,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /cart - Current cart contents.
#[instrument(skip_all)]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let auth = load_auth_state(&session).await?;
    let cart = load_cart(&session, &auth).await?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// POST /cart/add - Add a product to the cart.
#[instrument(skip(session, form), fields(product = %form.product))]
pub async fn add(session: Session, Form(form): Form<AddForm>) -> Result<Json<CartView>> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be positive".to_string()));
    }

    let auth = load_auth_state(&session).await?;
    let mut cart = load_cart(&session, &auth).await?;
    cart.add(ProductRef::new(form.product), quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from_cart(&cart)))
}

/// POST /cart/remove - Remove a product line from the cart.
#[instrument(skip(session, form), fields(product = %form.product))]
pub async fn remove(session: Session, Form(form): Form<RemoveForm>) -> Result<Json<CartView>> {
    let auth = load_auth_state(&session).await?;
    let mut cart = load_cart(&session, &auth).await?;

    let product = ProductRef::new(form.product);
    if !cart.remove(&product) {
        return Err(AppError::BadRequest(format!(
            "Product {product} is not in the cart"
        )));
    }
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from_cart(&cart)))
}
