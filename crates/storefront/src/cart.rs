//! Session-scoped shopping cart.
//!
//! The cart lives in the visitor's session and is owned by exactly one
//! identity at a time: the guest identity before login, the user identity
//! after the one-time merge. Lines keep insertion order and each product
//! reference appears at most once; adding an existing product merges
//! quantities into its line.

use serde::{Deserialize, Serialize};

use luxora_core::{GuestId, ProductRef, UserIdentity};

/// The identity a cart belongs to. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartOwner {
    /// Unauthenticated visitor.
    Guest(GuestId),
    /// Authenticated user.
    User(UserIdentity),
}

/// A single cart line: one product reference, one quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Unique key of this line.
    pub product: ProductRef,
    /// Units of the product. Always >= 1; removing drops the whole line.
    pub quantity: u32,
}

/// The cart contents, ordered by insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    owner: CartOwner,
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart owned by a guest identity.
    #[must_use]
    pub const fn for_guest(guest_id: GuestId) -> Self {
        Self {
            owner: CartOwner::Guest(guest_id),
            lines: Vec::new(),
        }
    }

    /// The current owner.
    #[must_use]
    pub const fn owner(&self) -> &CartOwner {
        &self.owner
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Add `quantity` units of `product`.
    ///
    /// If a line for the product already exists its quantity is increased;
    /// otherwise a new line is appended. Zero-quantity adds are ignored.
    pub fn add(&mut self, product: ProductRef, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| line.product == product) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { product, quantity });
        }
    }

    /// Remove the line for `product`, if present. Returns true if removed.
    pub fn remove(&mut self, product: &ProductRef) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product != product);
        self.lines.len() != before
    }

    /// Hand ownership of the cart to an authenticated user.
    ///
    /// Called after the merge attempt resolves, when the guest identity is
    /// superseded.
    pub fn transfer_to(&mut self, user: UserIdentity) {
        self.owner = CartOwner::User(user);
    }
}
