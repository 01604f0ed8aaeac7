//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::CartLine;

/// Errors that can occur while totalling cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum SubtotalError {
    /// No lines were provided, so currency could not be determined.
    #[error("no lines provided; cannot determine currency")]
    NoLines,

    /// A line total did not fit in minor units.
    #[error("line total overflowed minor units")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Total for a single line: effective unit price × quantity.
///
/// # Errors
///
/// - [`SubtotalError::Overflow`]: The multiplication left the minor-unit range.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, SubtotalError> {
    scaled(line.effective_price(), line.quantity())
}

/// Total for a single line at base prices, ignoring any sale price.
///
/// # Errors
///
/// - [`SubtotalError::Overflow`]: The multiplication left the minor-unit range.
pub fn base_line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, SubtotalError> {
    scaled(line.price(), line.quantity())
}

/// Subtotal of a list of lines: Σ(effective unit price × quantity).
///
/// # Errors
///
/// - [`SubtotalError::NoLines`]: No lines were provided, so currency could not be determined.
/// - [`SubtotalError::Overflow`]: A line total left the minor-unit range.
/// - [`SubtotalError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn subtotal<'a>(lines: &[CartLine<'a>]) -> Result<Money<'a, Currency>, SubtotalError> {
    fold_totals(lines, line_total)
}

/// Subtotal of a list of lines at base prices, ignoring sale prices.
///
/// # Errors
///
/// Same conditions as [`subtotal`].
pub fn base_subtotal<'a>(lines: &[CartLine<'a>]) -> Result<Money<'a, Currency>, SubtotalError> {
    fold_totals(lines, base_line_total)
}

fn fold_totals<'a>(
    lines: &[CartLine<'a>],
    line_fn: fn(&CartLine<'a>) -> Result<Money<'a, Currency>, SubtotalError>,
) -> Result<Money<'a, Currency>, SubtotalError> {
    let first = lines.first().ok_or(SubtotalError::NoLines)?;

    lines.iter().try_fold(
        Money::from_minor(0, first.price().currency()),
        |acc, line| Ok(acc.add(line_fn(line)?)?),
    )
}

fn scaled<'a>(
    unit: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, SubtotalError> {
    let minor = unit
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(SubtotalError::Overflow)?;

    Ok(Money::from_minor(minor, unit.currency()))
}
