//! Delivery fee engine

use rusty_money::Money;
use tracing::warn;

use super::{
    FeeRequest,
    client::{FeeQuoteClient, FeeQuoteRequest},
    tariff::{DeliveryTariff, FeeBreakdown, PLATFORM_FEE},
};

/// Remote-first delivery fee engine.
///
/// Asks the authoritative fee service first and recovers through the local
/// [`DeliveryTariff`] on any client error. Callers always get a usable
/// breakdown: remote failure is logged and recovered, never surfaced.
#[derive(Debug)]
pub struct DeliveryFeeEngine<C> {
    client: C,
    tariff: DeliveryTariff,
}

impl<C: FeeQuoteClient> DeliveryFeeEngine<C> {
    /// Create an engine over the given client with the standard tariff.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_tariff(client, DeliveryTariff::standard())
    }

    /// Create an engine with a custom fallback tariff.
    #[must_use]
    pub fn with_tariff(client: C, tariff: DeliveryTariff) -> Self {
        Self { client, tariff }
    }

    /// The fallback tariff in use.
    #[must_use]
    pub fn tariff(&self) -> &DeliveryTariff {
        &self.tariff
    }

    /// Quote the delivery fee for a request.
    ///
    /// The remote charge is taken as authoritative when the service answers;
    /// the flat platform fee is applied locally on both paths so the
    /// breakdown always itemises the two charges the same way.
    pub async fn quote<'a>(&self, request: &FeeRequest<'a>) -> FeeBreakdown<'a> {
        let wire = FeeQuoteRequest::from_request(request);

        match self.client.fetch_quote(&wire).await {
            Ok(fee) => {
                let currency = request.order_value().currency();

                FeeBreakdown::new(
                    Money::from_decimal(fee, currency),
                    Money::from_major(PLATFORM_FEE, currency),
                )
            }
            Err(error) => {
                warn!(%error, "fee service unavailable, quoting from local tariff");

                self.tariff.quote(request)
            }
        }
    }
}

/// Issues tickets for in-flight fee quotes so that only the most recent
/// request updates displayed totals.
///
/// Begin a ticket before dispatching a quote; when the quote resolves, apply
/// it only if the ticket is still current. A response arriving after a newer
/// request began is stale and must be discarded by the caller.
#[derive(Debug, Default)]
pub struct QuoteSequence {
    issued: u64,
}

/// Ticket for a single in-flight quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTicket {
    serial: u64,
}

impl QuoteSequence {
    /// Create a sequence with no quotes issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a quote about to be dispatched, superseding all
    /// previously issued tickets.
    pub fn begin(&mut self) -> QuoteTicket {
        self.issued += 1;

        QuoteTicket {
            serial: self.issued,
        }
    }

    /// Whether the given ticket is still the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: QuoteTicket) -> bool {
        ticket.serial == self.issued
    }
}
