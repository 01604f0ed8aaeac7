//! Mandi prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    checkout::{OrderSummary, SummaryError},
    delivery::{
        FeeRequest,
        client::{
            FeeClientError, FeeEndpointConfig, FeeQuoteClient, FeeQuoteRequest, HttpFeeQuoteClient,
        },
        engine::{DeliveryFeeEngine, QuoteSequence, QuoteTicket},
        tariff::{DeliveryTariff, FeeBreakdown, PLATFORM_FEE, TariffBand},
    },
    items::{CartLine, LineId},
    pricing::SubtotalError,
    products::{Catalog, Product, ProductKey},
    storage::{CART_NAMESPACE, CartStore, JsonFileStore, MemoryStore, StoreError},
};
