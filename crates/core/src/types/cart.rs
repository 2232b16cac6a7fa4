//! Cart line items as read from the cart collaborator.

use serde::{Deserialize, Serialize};

/// A single line in the customer's cart.
///
/// The cart store owns these; the UI only reads quantities to derive the
/// header badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLine {
    /// Product handle (URL slug) of the merchandise.
    pub handle: String,
    /// Number of units of this product in the cart.
    pub quantity: u32,
}

impl CartLine {
    /// Create a cart line.
    #[must_use]
    pub fn new(handle: impl Into<String>, quantity: u32) -> Self {
        Self {
            handle: handle.into(),
            quantity,
        }
    }
}
