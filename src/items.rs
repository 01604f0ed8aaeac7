//! Cart line items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductKey};

/// Stable identity of a cart line.
///
/// This is the merge key for cart mutations: adding a payload whose id is
/// already in the cart bumps that line's quantity instead of appending a new
/// row. Unlike [`ProductKey`], a `LineId` survives persistence and reloads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single cart line: a priced product snapshot plus a quantity.
///
/// Prices are captured when the line is created; later catalog edits do not
/// reprice lines already sitting in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    id: LineId,
    product: Option<ProductKey>,
    name: String,
    price: Money<'a, Currency>,
    sale_price: Option<Money<'a, Currency>>,
    quantity: u32,
    category: Option<String>,
    image: Option<String>,
}

impl<'a> CartLine<'a> {
    /// Create a line with the given identity, name and base price, at quantity 1.
    pub fn new(id: LineId, name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            id,
            product: None,
            name: name.into(),
            price,
            sale_price: None,
            quantity: 1,
            category: None,
            image: None,
        }
    }

    /// Create a line from a catalog product, keeping a binding to its key.
    ///
    /// The binding is session-scoped and is dropped when a cart is persisted;
    /// the stable identity of the line is `id` alone.
    pub fn from_product(id: LineId, key: ProductKey, product: &Product<'a>) -> Self {
        Self {
            id,
            product: Some(key),
            name: product.name.clone(),
            price: product.price,
            sale_price: product.sale_price,
            quantity: 1,
            category: product.category.clone(),
            image: product.image.clone(),
        }
    }

    /// Set the sale price for this line.
    #[must_use]
    pub fn with_sale_price(mut self, sale_price: Money<'a, Currency>) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    /// Set the quantity for this line. Quantities below 1 are clamped to 1;
    /// removal is a cart operation, not a line state.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Set the category label for this line.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the image reference for this line.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Stable identity of the line.
    #[must_use]
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Catalog binding, when the line was built from a catalog product this session.
    #[must_use]
    pub fn product(&self) -> Option<ProductKey> {
        self.product
    }

    /// Display name of the line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base unit price.
    #[must_use]
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Sale unit price, when the line is on sale.
    #[must_use]
    pub fn sale_price(&self) -> Option<Money<'a, Currency>> {
        self.sale_price
    }

    /// The unit price a buyer pays: the sale price when present, else the base price.
    #[must_use]
    pub fn effective_price(&self) -> Money<'a, Currency> {
        self.sale_price.unwrap_or(self.price)
    }

    /// Units of this line in the cart. Always at least 1.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Category label, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Image reference, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
