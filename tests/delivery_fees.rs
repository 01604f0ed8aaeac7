//! Integration tests for delivery fee quoting

use rust_decimal::Decimal;
use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use mandi::delivery::{
    FeeRequest,
    client::{FeeClientError, FeeEndpointConfig, FeeQuoteClient, HttpFeeQuoteClient, MockFeeQuoteClient},
    engine::{DeliveryFeeEngine, QuoteSequence},
    tariff::{DeliveryTariff, PLATFORM_FEE},
};

fn request(distance_km: f64, order_major: i64, subscribed: bool) -> FeeRequest<'static> {
    FeeRequest::new(distance_km, Money::from_major(order_major, INR), subscribed)
}

fn offline_engine() -> DeliveryFeeEngine<MockFeeQuoteClient> {
    let mut client = MockFeeQuoteClient::new();

    client
        .expect_fetch_quote()
        .returning(|_| Err(FeeClientError::UnexpectedResponse("offline".to_string())));

    DeliveryFeeEngine::new(client)
}

#[tokio::test]
async fn fallback_matches_the_published_table() -> TestResult {
    let engine = offline_engine();

    // (distance km, order value, subscribed) → expected delivery charge
    let cases = [
        (0.5, 1000, false, 0),
        (3.0, 600, true, 0),
        (4.0, 500, false, 0),
        (6.0, 500, false, 45),
        (4.0, 300, false, 15),
        (7.0, 300, false, 50),
        (2.0, 200, false, 25),
        (4.0, 200, false, 40),
        (6.0, 200, false, 60),
        (12.0, 200, false, 75),
    ];

    for (distance_km, order_major, subscribed, expected) in cases {
        let breakdown = engine
            .quote(&request(distance_km, order_major, subscribed))
            .await;

        assert_eq!(
            breakdown.delivery(),
            Money::from_major(expected, INR),
            "distance {distance_km} km, order {order_major}, subscribed {subscribed}"
        );
        assert_eq!(breakdown.platform(), Money::from_major(PLATFORM_FEE, INR));
        assert_eq!(
            breakdown.total()?,
            Money::from_major(expected + PLATFORM_FEE, INR)
        );
    }

    Ok(())
}

#[tokio::test]
async fn remote_answer_wins_over_the_table() -> TestResult {
    let mut client = MockFeeQuoteClient::new();

    client
        .expect_fetch_quote()
        .returning(|_| Ok(Decimal::from(12)));

    let engine = DeliveryFeeEngine::new(client);
    let breakdown = engine.quote(&request(12.0, 200, false)).await;

    assert_eq!(breakdown.delivery(), Money::from_major(12, INR));
    assert_eq!(breakdown.total()?, Money::from_major(14, INR));

    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_recovers_through_the_table() -> TestResult {
    // Discard port: nothing listens there, so the connection is refused.
    let client = HttpFeeQuoteClient::new(FeeEndpointConfig {
        url: "http://127.0.0.1:9/api/delivery-fee".to_string(),
        timeout_ms: 500,
    })?;

    let engine = DeliveryFeeEngine::new(client);
    let breakdown = engine.quote(&request(4.0, 200, false)).await;

    assert_eq!(breakdown.delivery(), Money::from_major(40, INR));
    assert_eq!(breakdown.total()?, Money::from_major(42, INR));

    Ok(())
}

#[tokio::test]
async fn http_client_surfaces_connection_errors() -> TestResult {
    let client = HttpFeeQuoteClient::new(FeeEndpointConfig {
        url: "http://127.0.0.1:9/api/delivery-fee".to_string(),
        timeout_ms: 500,
    })?;

    let wire = mandi::delivery::client::FeeQuoteRequest::from_request(&request(4.0, 200, false));
    let result = client.fetch_quote(&wire).await;

    assert!(
        matches!(result, Err(FeeClientError::Http(_))),
        "expected transport error, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn stale_quote_is_discarded() -> TestResult {
    let engine = offline_engine();
    let mut sequence = QuoteSequence::new();

    // First request goes out for a 12 km address...
    let stale_ticket = sequence.begin();
    let stale_quote = engine.quote(&request(12.0, 200, false)).await;

    // ...then the buyer edits the address before the first answer lands.
    let fresh_ticket = sequence.begin();
    let fresh_quote = engine.quote(&request(2.0, 200, false)).await;

    let mut displayed = None;

    if sequence.is_current(fresh_ticket) {
        displayed = Some(fresh_quote);
    }

    // The stale response arrives last; its ticket is no longer current.
    if sequence.is_current(stale_ticket) {
        displayed = Some(stale_quote);
    }

    let displayed = displayed.expect("fresh quote should be displayed");

    assert_eq!(displayed.delivery(), Money::from_major(25, INR));

    Ok(())
}

#[test]
fn custom_tariff_replaces_the_standard_table() {
    let tariff = DeliveryTariff::new(Vec::new(), 99);

    let breakdown = tariff.quote(&request(1.0, 1000, true));

    assert_eq!(breakdown.delivery(), Money::from_major(99, INR));
}
