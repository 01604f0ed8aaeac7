//! Checkout

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::Cart,
    delivery::tariff::FeeBreakdown,
    pricing::{self, SubtotalError},
};

/// Errors that can occur when building or rendering an order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Error totalling cart lines.
    #[error(transparent)]
    Subtotal(#[from] SubtotalError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Checkout summary for a cart and a delivery quote.
///
/// Captures the totals at build time; rebuild it after mutating the cart.
#[derive(Debug, Clone)]
pub struct OrderSummary<'a> {
    subtotal: Money<'a, Currency>,
    base_subtotal: Money<'a, Currency>,
    fees: FeeBreakdown<'a>,
    total: Money<'a, Currency>,
    currency: &'static Currency,
}

impl<'a> OrderSummary<'a> {
    /// Build a summary for a cart and a delivery quote.
    ///
    /// An empty cart is fine: the subtotal is zero and the total is just the
    /// fees.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if a subtotal or total cannot be calculated.
    pub fn build(cart: &'a Cart<'a>, fees: FeeBreakdown<'a>) -> Result<Self, SummaryError> {
        let subtotal = cart.subtotal()?;
        let base_subtotal = cart.base_subtotal()?;
        let total = subtotal.add(fees.total()?)?;

        Ok(Self {
            subtotal,
            base_subtotal,
            fees,
            total,
            currency: cart.currency(),
        })
    }

    /// Cart subtotal at effective prices.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Cart subtotal at base prices, before any sale pricing.
    #[must_use]
    pub fn base_subtotal(&self) -> Money<'a, Currency> {
        self.base_subtotal
    }

    /// The delivery quote this summary was built with.
    #[must_use]
    pub fn fees(&self) -> FeeBreakdown<'a> {
        self.fees
    }

    /// Grand total payable: subtotal + delivery charge + platform fee.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The amount saved through sale pricing: base subtotal minus subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.base_subtotal.sub(self.subtotal)
    }

    /// The savings as a fraction of the base subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;

        // Percent savings is relative to the base (pre-sale) subtotal.
        // Avoid integer division truncation by doing the ratio in decimal space.
        let savings_minor = savings.to_minor_units();
        let base_minor = self.base_subtotal.to_minor_units();

        if base_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let base_dec = Decimal::from_i64(base_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / base_dec))
    }

    /// Write the itemised order summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in cart.iter() {
            let line_total = pricing::line_total(line)?;

            builder.push_record([
                line.name().to_string(),
                line.quantity().to_string(),
                format!("{}", line.effective_price()),
                format!("{line_total}"),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::sharp());
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| SummaryError::IO)?;

        write_totals(&mut out, self)
    }
}

fn write_totals(out: &mut impl io::Write, summary: &OrderSummary<'_>) -> Result<(), SummaryError> {
    let savings = summary.savings()?;

    let mut rows: SmallVec<[(String, String); 5]> = smallvec![
        ("Subtotal:".to_string(), format!("{}", summary.subtotal())),
        (
            "Delivery fee:".to_string(),
            format!("{}", summary.fees().delivery()),
        ),
        (
            "Platform fee:".to_string(),
            format!("{}", summary.fees().platform()),
        ),
    ];

    if savings.is_positive() {
        let percent_points = (summary.savings_percent()? * Decimal::ONE_HUNDRED).round_dp(1);

        rows.push((
            "You save:".to_string(),
            format!("({percent_points}%) {savings}"),
        ));
    }

    rows.push(("Total:".to_string(), format!("{}", summary.total())));

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:<label_width$} {value}").map_err(|_err| SummaryError::IO)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{
        delivery::{FeeRequest, tariff::DeliveryTariff},
        items::{CartLine, LineId},
    };

    use super::*;

    fn sale_cart<'a>() -> Cart<'a> {
        let lines = [
            CartLine::new(LineId(1), "Atta 5kg", Money::from_major(250, INR))
                .with_sale_price(Money::from_major(200, INR)),
            CartLine::new(LineId(2), "Ghee 1l", Money::from_major(150, INR))
                .with_sale_price(Money::from_major(100, INR)),
        ];

        Cart::with_lines(lines, INR).expect("lines share the cart currency")
    }

    fn quote_for<'a>(cart: &'a Cart<'a>) -> Result<FeeBreakdown<'a>, SummaryError> {
        let subtotal = cart.subtotal()?;

        Ok(DeliveryTariff::standard().quote(&FeeRequest::new(4.0, subtotal, false)))
    }

    #[test]
    fn total_adds_fees_to_subtotal() -> TestResult {
        let cart = sale_cart();
        let fees = quote_for(&cart)?;

        let summary = OrderSummary::build(&cart, fees)?;

        // 300 order value at 4 km hits the ≥ 300 band: 15 inside 5 km,
        // plus the flat platform fee of 2.
        assert_eq!(summary.subtotal(), Money::from_major(300, INR));
        assert_eq!(summary.total(), Money::from_major(317, INR));

        Ok(())
    }

    #[test]
    fn savings_compare_base_and_effective_subtotals() -> TestResult {
        let cart = sale_cart();
        let fees = quote_for(&cart)?;

        let summary = OrderSummary::build(&cart, fees)?;

        assert_eq!(summary.base_subtotal(), Money::from_major(400, INR));
        assert_eq!(summary.savings()?, Money::from_major(100, INR));
        assert_eq!(summary.savings_percent()?, Percentage::from(0.25));

        Ok(())
    }

    #[test]
    fn empty_cart_summary_is_just_fees() -> TestResult {
        let cart = Cart::new(INR);
        let fees = quote_for(&cart)?;

        let summary = OrderSummary::build(&cart, fees)?;

        assert_eq!(summary.subtotal(), Money::from_major(0, INR));
        assert_eq!(summary.savings_percent()?, Percentage::from(0.0));

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_totals() -> TestResult {
        let cart = sale_cart();
        let fees = quote_for(&cart)?;

        let summary = OrderSummary::build(&cart, fees)?;

        let mut out = Vec::new();
        summary.write_to(&mut out, &cart)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Atta 5kg"), "missing item row");
        assert!(rendered.contains("Subtotal:"), "missing subtotal row");
        assert!(rendered.contains("Platform fee:"), "missing platform fee row");
        assert!(rendered.contains("You save:"), "missing savings row");
        assert!(rendered.contains("Total:"), "missing total row");

        Ok(())
    }
}
