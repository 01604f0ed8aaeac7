//! Cart persistence
//!
//! Carts survive reloads through a [`CartStore`]: a single snapshot keyed by
//! the fixed [`CART_NAMESPACE`], with no cross-device sync. Storage records
//! are deliberately separate from the domain types: they carry the currency
//! as an ISO code and prices in minor units, and they do not carry catalog
//! bindings, which are session-scoped.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    items::{CartLine, LineId},
};

/// Fixed namespace key for persisted carts.
pub const CART_NAMESPACE: &str = "mandi.cart.v1";

/// Errors that can occur while loading or saving a cart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem error.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The snapshot names a currency this build does not know.
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),

    /// The snapshot could not be rebuilt into a cart.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A place carts survive reloads in.
pub trait CartStore {
    /// Load the persisted cart, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot exists but cannot be read or
    /// rebuilt.
    fn load(&self) -> Result<Option<Cart<'static>>, StoreError>;

    /// Persist the given cart, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot cannot be written.
    fn save(&self, cart: &Cart<'_>) -> Result<(), StoreError>;

    /// Drop the persisted cart, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if an existing snapshot cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CartRecord {
    currency: String,
    open: bool,
    lines: Vec<LineRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LineRecord {
    id: u64,
    name: String,
    price_minor: i64,
    sale_price_minor: Option<i64>,
    quantity: u32,
    category: Option<String>,
    image: Option<String>,
}

impl CartRecord {
    fn from_cart(cart: &Cart<'_>) -> Self {
        Self {
            currency: cart.currency().iso_alpha_code.to_string(),
            open: cart.is_open(),
            lines: cart.iter().map(LineRecord::from_line).collect(),
        }
    }

    fn into_cart(self) -> Result<Cart<'static>, StoreError> {
        let currency = iso::find(&self.currency)
            .ok_or_else(|| StoreError::UnknownCurrency(self.currency.clone()))?;

        let lines: Vec<CartLine<'static>> = self
            .lines
            .into_iter()
            .map(|line| line.into_line(currency))
            .collect();

        let mut cart = Cart::with_lines(lines, currency)?;

        if self.open {
            cart.open();
        }

        Ok(cart)
    }
}

impl LineRecord {
    fn from_line(line: &CartLine<'_>) -> Self {
        Self {
            id: line.id().0,
            name: line.name().to_string(),
            price_minor: line.price().to_minor_units(),
            sale_price_minor: line.sale_price().map(|price| price.to_minor_units()),
            quantity: line.quantity(),
            category: line.category().map(ToString::to_string),
            image: line.image().map(ToString::to_string),
        }
    }

    fn into_line(self, currency: &'static iso::Currency) -> CartLine<'static> {
        let mut line = CartLine::new(
            LineId(self.id),
            self.name,
            Money::from_minor(self.price_minor, currency),
        )
        .with_quantity(self.quantity);

        if let Some(minor) = self.sale_price_minor {
            line = line.with_sale_price(Money::from_minor(minor, currency));
        }

        if let Some(category) = self.category {
            line = line.with_category(category);
        }

        if let Some(image) = self.image {
            line = line.with_image(image);
        }

        line
    }
}

/// JSON-on-disk cart store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store the cart under [`CART_NAMESPACE`] in the given directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CART_NAMESPACE}.json")),
        }
    }

    /// Store the cart at an explicit path.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for JsonFileStore {
    fn load(&self) -> Result<Option<Cart<'static>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let record: CartRecord = serde_json::from_str(&contents)?;

        debug!(path = %self.path.display(), "loaded persisted cart");

        record.into_cart().map(Some)
    }

    fn save(&self, cart: &Cart<'_>) -> Result<(), StoreError> {
        let record = CartRecord::from_cart(cart);
        let contents = serde_json::to_string(&record)?;

        fs::write(&self.path, contents)?;

        debug!(path = %self.path.display(), lines = cart.len(), "saved cart");

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// In-memory cart store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<CartRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<CartRecord>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> Result<Option<Cart<'static>>, StoreError> {
        self.slot().clone().map(CartRecord::into_cart).transpose()
    }

    fn save(&self, cart: &Cart<'_>) -> Result<(), StoreError> {
        *self.slot() = Some(CartRecord::from_cart(cart));

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;

        Ok(())
    }
}
