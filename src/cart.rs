//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::{CartLine, LineId},
    pricing::{SubtotalError, base_subtotal, subtotal},
};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (line id, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineId, &'static str, &'static str),
}

/// A buyer's cart: an ordered sequence of lines, a fixed currency, and a
/// visibility flag for the cart drawer.
///
/// All aggregates are derived from the line sequence on every read; nothing
/// is cached independently of it. Mutations targeting an unknown [`LineId`]
/// are no-ops, never errors.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
    open: bool,
}

impl<'a> Cart<'a> {
    /// Create an empty, closed cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
            open: false,
        }
    }

    /// Create a cart with the given lines, e.g. when rehydrating a persisted cart.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there was a currency mismatch error.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().try_for_each(|line| {
            let line_currency = line.price().currency();

            if line_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    line.id(),
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Cart {
            lines,
            currency,
            open: false,
        })
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same [`LineId`] already exists, its quantity is
    /// incremented by 1 and every other field of the payload is ignored.
    /// Otherwise the payload is appended at quantity 1 and the cart is
    /// marked open.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the line's currency differs from the cart currency.
    pub fn add(&mut self, line: CartLine<'a>) -> Result<(), CartError> {
        let line_currency = line.price().currency();

        if line_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                line.id(),
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.id() == line.id()) {
            existing.increment();
            return Ok(());
        }

        self.lines.push(line.with_quantity(1));
        self.open = true;

        Ok(())
    }

    /// Replace the quantity of the line with the given id.
    ///
    /// A quantity of 0 removes the line: the cart never retains zero-quantity
    /// rows, so `len()` and `item_count()` always agree on what is in the
    /// cart. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, id: LineId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id() == id) {
            line.set_quantity(quantity);
        }
    }

    /// Drop the line with the given id. No-op if absent.
    pub fn remove(&mut self, id: LineId) {
        self.lines.retain(|line| line.id() != id);
    }

    /// Empty the line sequence. The visibility flag is untouched.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines: the sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Calculate the subtotal of the cart: Σ(effective unit price × quantity).
    ///
    /// # Errors
    ///
    /// Returns a `SubtotalError` if there was a money arithmetic or overflow error.
    pub fn subtotal(&'a self) -> Result<Money<'a, Currency>, SubtotalError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        subtotal(&self.lines)
    }

    /// Calculate the subtotal at base prices, ignoring sale prices.
    ///
    /// # Errors
    ///
    /// Returns a `SubtotalError` if there was a money arithmetic or overflow error.
    pub fn base_subtotal(&'a self) -> Result<Money<'a, Currency>, SubtotalError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        base_subtotal(&self.lines)
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: LineId) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// The lines in the cart, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the cart drawer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Mark the cart drawer open.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Mark the cart drawer closed.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
