//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Catalog key for a product.
    pub struct ProductKey;
}

/// A storefront product as listed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Display name
    pub name: String,

    /// Longer display description
    pub description: Option<String>,

    /// Base price per unit
    pub price: Money<'a, Currency>,

    /// Discounted price per unit, when the product is on sale
    pub sale_price: Option<Money<'a, Currency>>,

    /// Image reference for product tiles
    pub image: Option<String>,

    /// Category label, e.g. `"staples"` or `"snacks"`
    pub category: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a product with a name and base price and nothing else set.
    pub fn new(name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            sale_price: None,
            image: None,
            category: None,
        }
    }

    /// The price a buyer pays per unit: the sale price when present, else the base price.
    #[must_use]
    pub fn effective_price(&self) -> Money<'a, Currency> {
        self.sale_price.unwrap_or(self.price)
    }
}

/// Product catalog backed by a slotmap arena.
///
/// Keys are session-scoped: they identify a product for as long as this
/// catalog value lives and are not stable across rebuilds. Persistent cart
/// identity lives on [`crate::items::LineId`] instead.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product, returning its key.
    pub fn add(&mut self, product: Product<'a>) -> ProductKey {
        self.products.insert(product)
    }

    /// Look up a product by key.
    #[must_use]
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Iterate over the catalog entries.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
