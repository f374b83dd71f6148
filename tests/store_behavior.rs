//! Behaviour tests for the Aggregate Store.
//!
//! The store is driven through fake transports: provider and backend calls
//! are answered by `FakeHttpClient`, live pushes are injected through
//! `FakeLiveConnector`.

mod support;

use std::time::Duration;

use quotedeck_core::{
    FetchErrorKind, HttpResponse, MarketStore, Quote, Session, StoreState, Symbol,
    UntrackedPolicy,
};
use serde_json::json;
use support::{global_quote, store, FakeHttpClient, FakeLiveConnector, BACKEND_URL};
use tokio::sync::watch;

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

async fn wait_until<F>(receiver: &mut watch::Receiver<StoreState>, condition: F)
where
    F: FnMut(&StoreState) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), receiver.wait_for(condition))
        .await
        .expect("store should reach the expected state")
        .expect("store should still be alive");
}

fn provider_with_quotes() -> std::sync::Arc<FakeHttpClient> {
    let http = FakeHttpClient::new();
    http.respond(
        "GLOBAL_QUOTE:AAPL",
        global_quote("AAPL", "150.25", "52000000", "2024-01-02"),
    );
    http.respond(
        "GLOBAL_QUOTE:MSFT",
        global_quote("MSFT", "410.10", "21000000", "2024-01-02"),
    );
    http
}

// =============================================================================
// Tracking
// =============================================================================

#[tokio::test]
async fn when_symbol_is_tracked_twice_store_keeps_one_entry_and_one_channel() {
    // Given: a store with a provider that knows AAPL
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http.clone(), live.clone(), UntrackedPolicy::Ignore);

    // When: AAPL is tracked twice
    store.track(&symbol("AAPL")).await.expect("first track");
    store.track(&symbol("aapl")).await.expect("second track");
    live.wait_for_connections(1).await;

    // Then: the quote was fetched twice but stored once, with one channel
    let state = store.snapshot();
    assert_eq!(state.tracked_symbols.len(), 1);
    assert_eq!(state.tracked_symbols[0].symbol, "AAPL");
    assert_eq!(http.requests_for("GLOBAL_QUOTE").len(), 2);
    assert_eq!(store.live_symbols().await, vec![symbol("AAPL")]);
    assert_eq!(live.opened(), 1);

    store.shutdown().await;
}

#[tokio::test]
async fn when_tracking_fails_state_is_unchanged_and_no_channel_opens() {
    // Given: a provider that has no data for the symbol
    let http = FakeHttpClient::new();
    http.respond("GLOBAL_QUOTE", json!({ "Global Quote": {} }));
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Ignore);

    // When: the symbol is tracked
    let err = store
        .track(&symbol("ZZZZ"))
        .await
        .expect_err("empty quote must fail");

    // Then: the error propagates and nothing changed
    assert_eq!(err.kind(), FetchErrorKind::MissingData);
    assert_eq!(store.snapshot(), StoreState::default());
    assert!(store.live_symbols().await.is_empty());
}

#[tokio::test]
async fn when_many_symbols_are_tracked_each_gets_its_own_outcome() {
    let http = provider_with_quotes();
    http.respond_with(
        "GLOBAL_QUOTE:TSLA",
        Ok(HttpResponse::with_status(500, "boom")),
    );
    let live = FakeLiveConnector::new();
    let store = store(http, live, UntrackedPolicy::Ignore);

    let outcomes = store
        .track_many(&[symbol("AAPL"), symbol("TSLA"), symbol("MSFT")])
        .await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].symbol, symbol("AAPL"));
    assert!(outcomes[0].result.is_ok());
    assert_eq!(
        outcomes[1].result.as_ref().map_err(|e| e.kind()).err(),
        Some(FetchErrorKind::Transport)
    );
    assert!(outcomes[2].result.is_ok());

    let tracked = store
        .snapshot()
        .tracked_symbols
        .into_iter()
        .map(|quote| quote.symbol)
        .collect::<Vec<_>>();
    assert_eq!(tracked.len(), 2);
    assert!(tracked.contains(&String::from("AAPL")));
    assert!(tracked.contains(&String::from("MSFT")));

    store.shutdown().await;
}

#[tokio::test]
async fn when_subscribed_tracking_notifies_the_subscriber() {
    let http = provider_with_quotes();
    let store = store(http, FakeLiveConnector::new(), UntrackedPolicy::Ignore);
    let mut updates = store.subscribe();

    store.track(&symbol("MSFT")).await.expect("track");

    wait_until(&mut updates, |state| state.tracked("MSFT").is_some()).await;
    assert_eq!(
        updates.borrow().tracked("MSFT").map(|quote| quote.price),
        Some(410.10)
    );

    store.shutdown().await;
}

// =============================================================================
// Live pushes
// =============================================================================

#[tokio::test]
async fn when_tracked_symbol_is_pushed_record_is_replaced_whole() {
    // Given: AAPL is tracked with a volume
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Ignore);
    store.track(&symbol("AAPL")).await.expect("track");
    live.wait_for_connections(1).await;
    let mut updates = store.subscribe();

    // When: a push arrives without volume
    live.push(r#"{"symbol":"AAPL","price":"151.75","volume":null,"timestamp":"2024-01-02T15:59:00Z"}"#);

    // Then: the whole record is replaced, volume included
    wait_until(&mut updates, |state| {
        state.tracked("AAPL").is_some_and(|quote| quote.price == 151.75)
    })
    .await;
    assert_eq!(
        store.snapshot().tracked("AAPL"),
        Some(&Quote::new("AAPL", 151.75, None, "2024-01-02T15:59:00Z"))
    );

    store.shutdown().await;
}

#[tokio::test]
async fn when_untracked_symbol_is_pushed_under_append_it_is_added() {
    // Given: a store configured to append unknown pushes
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Append);
    store.track(&symbol("AAPL")).await.expect("track");
    live.wait_for_connections(1).await;
    let mut updates = store.subscribe();

    // When: a push for TSLA arrives
    live.push_quote(&Quote::new("TSLA", 248.5, Some(900), "2024-01-02"));

    // Then: TSLA joins the tracked collection
    wait_until(&mut updates, |state| state.tracked("TSLA").is_some()).await;
    let state = store.snapshot();
    assert_eq!(state.tracked_symbols.len(), 2);
    assert_eq!(state.tracked_symbols[1].symbol, "TSLA");

    store.shutdown().await;
}

#[tokio::test]
async fn when_untracked_symbol_is_pushed_under_ignore_it_is_dropped() {
    // Given: a store with the default ignore policy
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Ignore);
    store.track(&symbol("AAPL")).await.expect("track");
    live.wait_for_connections(1).await;
    let mut updates = store.subscribe();

    // When: a TSLA push is followed by an AAPL push on the same channel
    live.push_quote(&Quote::new("TSLA", 248.5, Some(900), "2024-01-02"));
    live.push_quote(&Quote::new("AAPL", 152.0, Some(10), "2024-01-02"));

    // Then: once the later push has landed, TSLA is still absent
    wait_until(&mut updates, |state| {
        state.tracked("AAPL").is_some_and(|quote| quote.price == 152.0)
    })
    .await;
    let state = store.snapshot();
    assert!(state.tracked("TSLA").is_none());
    assert_eq!(state.tracked_symbols.len(), 1);

    store.shutdown().await;
}

#[tokio::test]
async fn when_push_is_malformed_it_is_skipped_and_channel_stays_up() {
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Ignore);
    store.track(&symbol("AAPL")).await.expect("track");
    live.wait_for_connections(1).await;
    let mut updates = store.subscribe();

    live.push("not json");
    live.push(r#"{"price": 1}"#);
    live.push_quote(&Quote::new("AAPL", 153.0, None, "2024-01-03"));

    wait_until(&mut updates, |state| {
        state.tracked("AAPL").is_some_and(|quote| quote.price == 153.0)
    })
    .await;

    store.shutdown().await;
}

// =============================================================================
// Watchlist
// =============================================================================

#[tokio::test]
async fn when_watchlist_is_loaded_it_replaces_the_previous_one() {
    // Given: a backend whose watchlist changes between loads
    let http = FakeHttpClient::new();
    let route = format!("{BACKEND_URL}/api/watchlist");
    http.respond(
        &route,
        json!([
            { "symbol": "AAPL", "price": "150.25", "volume": "100", "timestamp": "2024-01-02" },
            { "symbol": "MSFT", "price": 410.1, "volume": 200, "timestamp": "2024-01-02" }
        ]),
    );
    let store = store(http.clone(), FakeLiveConnector::new(), UntrackedPolicy::Ignore);
    let session = Session::from_token("jwt-token");

    store
        .load_watchlist(&session)
        .await
        .expect("first load should succeed");
    assert_eq!(store.snapshot().watchlist.len(), 2);

    // When: the watchlist is loaded again
    http.respond(
        &route,
        json!([{ "symbol": "NVDA", "price": "495.2", "volume": "300", "timestamp": "2024-01-03" }]),
    );
    store
        .load_watchlist(&session)
        .await
        .expect("second load should succeed");

    // Then: the old entries are gone and tracked quotes are untouched
    let state = store.snapshot();
    assert_eq!(
        state.watchlist,
        vec![Quote::new("NVDA", 495.2, Some(300), "2024-01-03")]
    );
    assert!(state.tracked_symbols.is_empty());
}

#[tokio::test]
async fn when_watchlist_load_fails_previous_watchlist_is_kept() {
    let http = FakeHttpClient::new();
    let route = format!("{BACKEND_URL}/api/watchlist");
    http.respond(
        &route,
        json!([{ "symbol": "AAPL", "price": 1, "volume": 1, "timestamp": "t" }]),
    );
    let store = store(http.clone(), FakeLiveConnector::new(), UntrackedPolicy::Ignore);
    let session = Session::from_token("jwt-token");
    store.load_watchlist(&session).await.expect("first load");

    http.respond_with(&route, Ok(HttpResponse::with_status(401, "{}")));
    let err = store
        .load_watchlist(&session)
        .await
        .expect_err("401 must fail");

    assert_eq!(err.kind(), FetchErrorKind::Unauthorized);
    assert_eq!(store.snapshot().watchlist.len(), 1);
}

// =============================================================================
// Channel lifecycle
// =============================================================================

#[tokio::test]
async fn when_symbol_is_untracked_its_channel_is_closed() {
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Ignore);
    store.track(&symbol("AAPL")).await.expect("track AAPL");
    store.track(&symbol("MSFT")).await.expect("track MSFT");
    live.wait_for_connections(2).await;

    assert!(store.untrack(&symbol("AAPL")).await);

    assert_eq!(live.closed(), 1);
    assert_eq!(store.live_symbols().await, vec![symbol("MSFT")]);
    let state = store.snapshot();
    assert!(state.tracked("AAPL").is_none());
    assert!(state.tracked("MSFT").is_some());
    assert!(!store.untrack(&symbol("AAPL")).await, "second untrack is a no-op");

    store.shutdown().await;
}

#[tokio::test]
async fn when_symbol_is_untracked_under_append_later_pushes_do_not_restore_it() {
    // Given: AAPL and MSFT tracked under the append policy
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Append);
    store.track(&symbol("AAPL")).await.expect("track AAPL");
    store.track(&symbol("MSFT")).await.expect("track MSFT");
    live.wait_for_connections(2).await;
    let mut updates = store.subscribe();

    // When: AAPL is untracked and a push for it reaches MSFT's channel
    assert!(store.untrack(&symbol("AAPL")).await);
    live.push_quote(&Quote::new("AAPL", 151.0, Some(10), "2024-01-02"));
    live.push_quote(&Quote::new("MSFT", 411.0, Some(10), "2024-01-02"));

    // Then: once the later MSFT push has landed, AAPL is still gone
    wait_until(&mut updates, |state| {
        state.tracked("MSFT").is_some_and(|quote| quote.price == 411.0)
    })
    .await;
    let state = store.snapshot();
    assert!(state.tracked("AAPL").is_none());
    assert_eq!(store.live_symbols().await, vec![symbol("MSFT")]);

    // And: tracking AAPL again lets its pushes through
    store.track(&symbol("AAPL")).await.expect("track AAPL again");
    live.wait_for_connections(3).await;
    live.push_quote(&Quote::new("AAPL", 152.0, Some(10), "2024-01-02"));
    wait_until(&mut updates, |state| {
        state.tracked("AAPL").is_some_and(|quote| quote.price == 152.0)
    })
    .await;

    store.shutdown().await;
}

#[tokio::test]
async fn when_store_shuts_down_every_channel_is_closed() {
    let http = provider_with_quotes();
    let live = FakeLiveConnector::new();
    let store = store(http, live.clone(), UntrackedPolicy::Ignore);
    store
        .track_many(&[symbol("AAPL"), symbol("MSFT")])
        .await;
    live.wait_for_connections(2).await;

    store.shutdown().await;

    assert_eq!(live.closed(), 2);
    assert!(store.live_symbols().await.is_empty());
    assert_eq!(store.snapshot().tracked_symbols.len(), 2);
}

// =============================================================================
// Pass-through and batch actions
// =============================================================================

fn provider_with_fundamentals() -> std::sync::Arc<FakeHttpClient> {
    let http = provider_with_quotes();
    http.respond(
        "OVERVIEW",
        json!({ "Symbol": "AAPL", "Name": "Apple Inc", "Description": "", "Exchange": "NASDAQ", "MarketCapitalization": "2900000000000" }),
    );
    http.respond(
        "INCOME_STATEMENT",
        json!({ "annualReports": [{ "fiscalDateEnding": "2023-09-30", "totalRevenue": "383285000000", "netIncome": "96995000000" }] }),
    );
    http.respond(
        "BALANCE_SHEET",
        json!({ "annualReports": [{ "fiscalDateEnding": "2023-09-30", "totalAssets": "352583000000", "totalLiabilities": "290437000000" }] }),
    );
    http.respond(
        "CASH_FLOW",
        json!({ "annualReports": [{ "fiscalDateEnding": "2023-09-30", "operatingCashflow": "110543000000", "capitalExpenditures": "10959000000" }] }),
    );
    http.respond(
        "EARNINGS",
        json!({ "annualEarnings": [{ "fiscalDateEnding": "2023-09-30", "reportedEPS": "6.13" }] }),
    );
    http.respond(
        "TIME_SERIES_DAILY",
        json!({ "Time Series (Daily)": { "2024-01-02": { "1. open": "187.15", "2. high": "188.44", "3. low": "183.89", "4. close": "185.64", "5. volume": "82488700" } } }),
    );
    http
}

#[tokio::test]
async fn when_fundamentals_are_requested_five_calls_are_bundled() {
    let http = provider_with_fundamentals();
    let store = store(http.clone(), FakeLiveConnector::new(), UntrackedPolicy::Ignore);

    let report = store
        .fundamentals(&symbol("AAPL"))
        .await
        .expect("fundamentals should load");

    assert_eq!(report.overview.market_cap, Some(2_900_000_000_000));
    assert_eq!(report.income_statements[0].net_income, Some(96_995_000_000));
    assert_eq!(report.balance_sheets.len(), 1);
    assert_eq!(report.cash_flows[0].capital_expenditure, Some(10_959_000_000));
    assert_eq!(report.earnings[0].reported_eps, 6.13);
    assert_eq!(http.requests().len(), 5);
    assert_eq!(store.snapshot(), StoreState::default(), "pass-through leaves state alone");
}

#[tokio::test]
async fn when_symbol_report_loads_quote_history_and_overview_arrive_together() {
    let http = provider_with_fundamentals();
    let store = store(http, FakeLiveConnector::new(), UntrackedPolicy::Ignore);

    let report = store
        .symbol_report(&symbol("AAPL"))
        .await
        .expect("report should load");

    assert_eq!(report.quote.price, 150.25);
    assert_eq!(report.history[0].close, 185.64);
    assert_eq!(report.overview.name, "Apple Inc");
    assert!(store.snapshot().tracked_symbols.is_empty());
}

#[tokio::test]
async fn when_any_report_call_fails_the_whole_report_fails() {
    // Given: the overview is missing while quote and history succeed
    let http = provider_with_fundamentals();
    http.respond("OVERVIEW", json!({}));
    let store = store(http, FakeLiveConnector::new(), UntrackedPolicy::Ignore);

    // When: the report is requested
    let err = store
        .symbol_report(&symbol("AAPL"))
        .await
        .expect_err("partial report must fail");

    // Then: no partial result is returned
    assert_eq!(err.kind(), FetchErrorKind::MissingData);
    assert!(err.message().contains("Symbol"));
}

#[tokio::test]
async fn when_pass_through_fails_caller_can_fall_back() {
    let http = FakeHttpClient::new();
    let store: MarketStore = store(http, FakeLiveConnector::new(), UntrackedPolicy::Ignore);

    let results = store.search("apple").await.unwrap_or_default();

    assert!(results.is_empty());
}

#[tokio::test]
async fn when_prediction_is_requested_state_is_left_alone() {
    // Given: a backend that predicts AAPL but has no route for MSFT
    let http = FakeHttpClient::new();
    http.respond(
        &format!("{BACKEND_URL}/api/predictions/AAPL"),
        json!({ "symbol": "AAPL", "predicted_price": 155.4, "confidence": 0.82 }),
    );
    let store = store(http, FakeLiveConnector::new(), UntrackedPolicy::Ignore);

    // When: both predictions are requested
    let prediction = store
        .prediction(&symbol("AAPL"))
        .await
        .expect("AAPL prediction should load");
    let missing = store
        .prediction(&symbol("MSFT"))
        .await
        .expect_err("unrouted prediction must fail");

    // Then: the result is returned and the failure is a transport error
    assert_eq!(prediction.predicted_price, 155.4);
    assert_eq!(missing.kind(), FetchErrorKind::Transport);
    assert_eq!(store.snapshot(), StoreState::default());
}
