//! Delivery fees
//!
//! Delivery fee quoting for the storefront: a remote-authoritative service
//! call with a deterministic local fallback tariff. The remote service owns
//! the real fee logic; the [`tariff::DeliveryTariff`] is an approximation of
//! it, used only when the service cannot answer.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

pub mod client;
pub mod engine;
pub mod tariff;

/// Inputs to a delivery fee quote.
///
/// A pure value: the fee is a function of distance, order value and
/// subscription status alone, with no hidden state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeRequest<'a> {
    distance_km: f64,
    order_value: Money<'a, Currency>,
    subscribed: bool,
}

impl<'a> FeeRequest<'a> {
    /// Create a fee request. Negative distances are clamped to 0.
    #[must_use]
    pub fn new(distance_km: f64, order_value: Money<'a, Currency>, subscribed: bool) -> Self {
        Self {
            distance_km: distance_km.max(0.0),
            order_value,
            subscribed,
        }
    }

    /// Distance from store to drop-off, in kilometres.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Order subtotal the fee is computed against.
    #[must_use]
    pub fn order_value(&self) -> Money<'a, Currency> {
        self.order_value
    }

    /// Whether the buyer has an active delivery subscription.
    #[must_use]
    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    /// Whether the order value meets a threshold in major currency units.
    pub(crate) fn order_at_least(&self, major: i64) -> bool {
        *self.order_value.amount() >= Decimal::from(major)
    }
}
