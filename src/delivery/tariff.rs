//! Delivery tariff
//!
//! The locally evaluated fallback rule table used when the remote fee service
//! is unavailable. Bands are an ordered list of (predicate, charge) pairs:
//! they are evaluated top to bottom, the first match wins, and bands are
//! never combined. A flat platform fee is added to whatever the table yields,
//! the free-radius case included.

use rusty_money::{Money, MoneyError, iso::Currency};

use super::FeeRequest;

/// Flat platform fee, in major currency units, added to every quote.
pub const PLATFORM_FEE: i64 = 2;

/// Radius (km) inside which delivery is free regardless of other factors.
pub const FREE_RADIUS_KM: f64 = 1.0;

/// Outer radius (km) of the short zone.
pub const SHORT_ZONE_KM: f64 = 3.0;

/// Outer radius (km) of the near zone used by the subscription and
/// order-value bands.
pub const NEAR_ZONE_KM: f64 = 5.0;

/// Outer radius (km) of the mid zone.
pub const MID_ZONE_KM: f64 = 8.0;

/// An itemised delivery quote: the tiered delivery charge plus the flat
/// platform fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeBreakdown<'a> {
    delivery: Money<'a, Currency>,
    platform: Money<'a, Currency>,
}

impl<'a> FeeBreakdown<'a> {
    /// Assemble a breakdown from its two charges.
    #[must_use]
    pub fn new(delivery: Money<'a, Currency>, platform: Money<'a, Currency>) -> Self {
        Self { delivery, platform }
    }

    /// The distance/value tiered delivery charge.
    #[must_use]
    pub fn delivery(&self) -> Money<'a, Currency> {
        self.delivery
    }

    /// The flat platform fee.
    #[must_use]
    pub fn platform(&self) -> Money<'a, Currency> {
        self.platform
    }

    /// Total fee payable: delivery charge + platform fee.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.delivery.add(self.platform)
    }
}

/// A single tariff band: a predicate over the request and the charge, in
/// major currency units, applied when this band is the first to match.
#[derive(Debug, Clone, Copy)]
pub struct TariffBand {
    matches: fn(&FeeRequest<'_>) -> bool,
    charge: fn(&FeeRequest<'_>) -> i64,
}

impl TariffBand {
    /// Create a band from a predicate and a charge function.
    #[must_use]
    pub fn new(matches: fn(&FeeRequest<'_>) -> bool, charge: fn(&FeeRequest<'_>) -> i64) -> Self {
        Self { matches, charge }
    }
}

/// An ordered delivery fee rule table.
#[derive(Debug, Clone)]
pub struct DeliveryTariff {
    bands: Vec<TariffBand>,
    remote_zone_charge: i64,
}

impl DeliveryTariff {
    /// Create a tariff from ordered bands plus the charge, in major units,
    /// applied when no band matches.
    #[must_use]
    pub fn new(bands: Vec<TariffBand>, remote_zone_charge: i64) -> Self {
        Self {
            bands,
            remote_zone_charge,
        }
    }

    /// The standard storefront tariff. Charges in major currency units,
    /// evaluated in this order:
    ///
    /// 1. free radius (≤ 1 km) → 0
    /// 2. subscribed and ≤ 5 km → 0
    /// 3. order ≥ 500 → 0 inside 5 km, else 45
    /// 4. order ≥ 300 → 15 inside 5 km, else 50
    /// 5. ≤ 3 km → 25
    /// 6. ≤ 5 km → 40
    /// 7. ≤ 8 km → 60
    /// 8. otherwise → 75
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            vec![
                TariffBand::new(|r| r.distance_km() <= FREE_RADIUS_KM, |_| 0),
                TariffBand::new(|r| r.subscribed() && r.distance_km() <= NEAR_ZONE_KM, |_| 0),
                TariffBand::new(
                    |r| r.order_at_least(500),
                    |r| if r.distance_km() <= NEAR_ZONE_KM { 0 } else { 45 },
                ),
                TariffBand::new(
                    |r| r.order_at_least(300),
                    |r| if r.distance_km() <= NEAR_ZONE_KM { 15 } else { 50 },
                ),
                TariffBand::new(|r| r.distance_km() <= SHORT_ZONE_KM, |_| 25),
                TariffBand::new(|r| r.distance_km() <= NEAR_ZONE_KM, |_| 40),
                TariffBand::new(|r| r.distance_km() <= MID_ZONE_KM, |_| 60),
            ],
            75,
        )
    }

    /// Quote a fee from the table.
    ///
    /// The first matching band wins; when none matches, the remote-zone
    /// charge applies. The flat [`PLATFORM_FEE`] is added on top in every
    /// case, the free-radius band included.
    #[must_use]
    pub fn quote<'a>(&self, request: &FeeRequest<'a>) -> FeeBreakdown<'a> {
        let charge = self
            .bands
            .iter()
            .find(|band| (band.matches)(request))
            .map_or(self.remote_zone_charge, |band| (band.charge)(request));

        let currency = request.order_value().currency();

        FeeBreakdown::new(
            Money::from_major(charge, currency),
            Money::from_major(PLATFORM_FEE, currency),
        )
    }
}

impl Default for DeliveryTariff {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn quote(distance_km: f64, order_major: i64, subscribed: bool) -> FeeBreakdown<'static> {
        DeliveryTariff::standard().quote(&FeeRequest::new(
            distance_km,
            Money::from_major(order_major, INR),
            subscribed,
        ))
    }

    #[test]
    fn free_radius_beats_order_value_bands() -> TestResult {
        let breakdown = quote(0.5, 1000, false);

        assert_eq!(breakdown.delivery(), Money::from_major(0, INR));
        assert_eq!(breakdown.platform(), Money::from_major(PLATFORM_FEE, INR));
        assert_eq!(breakdown.total()?, Money::from_major(2, INR));

        Ok(())
    }

    #[test]
    fn subscription_band_beats_order_value_band() -> TestResult {
        let breakdown = quote(3.0, 600, true);

        assert_eq!(breakdown.delivery(), Money::from_major(0, INR));
        assert_eq!(breakdown.total()?, Money::from_major(2, INR));

        Ok(())
    }

    #[test]
    fn subscription_does_not_reach_past_near_zone() {
        let breakdown = quote(5.5, 100, true);

        // Falls through to the mid zone band.
        assert_eq!(breakdown.delivery(), Money::from_major(60, INR));
    }

    #[test]
    fn large_order_is_free_inside_near_zone() {
        assert_eq!(quote(4.0, 500, false).delivery(), Money::from_major(0, INR));
        assert_eq!(quote(6.0, 500, false).delivery(), Money::from_major(45, INR));
    }

    #[test]
    fn medium_order_is_discounted() {
        assert_eq!(quote(4.0, 300, false).delivery(), Money::from_major(15, INR));
        assert_eq!(quote(7.0, 300, false).delivery(), Money::from_major(50, INR));
    }

    #[test]
    fn distance_bands_apply_without_order_discounts() -> TestResult {
        assert_eq!(quote(2.0, 200, false).delivery(), Money::from_major(25, INR));

        // distance 4 km misses the ≤ 3 km band and lands on the ≤ 5 km one
        let breakdown = quote(4.0, 200, false);

        assert_eq!(breakdown.delivery(), Money::from_major(40, INR));
        assert_eq!(breakdown.total()?, Money::from_major(42, INR));

        assert_eq!(quote(6.0, 200, false).delivery(), Money::from_major(60, INR));

        Ok(())
    }

    #[test]
    fn remote_zone_charge_applies_beyond_all_bands() {
        assert_eq!(quote(12.0, 200, false).delivery(), Money::from_major(75, INR));
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(quote(1.0, 200, false).delivery(), Money::from_major(0, INR));
        assert_eq!(quote(3.0, 200, false).delivery(), Money::from_major(25, INR));
        assert_eq!(quote(5.0, 200, false).delivery(), Money::from_major(40, INR));
        assert_eq!(quote(8.0, 200, false).delivery(), Money::from_major(60, INR));
    }

    #[test]
    fn order_value_thresholds_are_inclusive() {
        assert_eq!(quote(4.0, 499, false).delivery(), Money::from_major(15, INR));
        assert_eq!(quote(4.0, 500, false).delivery(), Money::from_major(0, INR));
        assert_eq!(quote(4.0, 299, false).delivery(), Money::from_major(40, INR));
    }

    #[test]
    fn quote_is_deterministic() {
        let first = quote(4.0, 200, false);
        let second = quote(4.0, 200, false);

        assert_eq!(first, second);
    }
}
