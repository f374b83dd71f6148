//! Shared fakes for the behaviour tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quotedeck_core::{
    AlphaVantageGateway, BackendClient, HttpClient, HttpError, HttpRequest, HttpResponse,
    LiveConnection, LiveConnector, LiveError, MarketStore, Quote, UntrackedPolicy,
};
use serde_json::Value;
use tokio::sync::mpsc;

pub const PROVIDER_URL: &str = "https://provider.test/query";
pub const BACKEND_URL: &str = "https://backend.test";
pub const LIVE_URL: &str = "ws://backend.test/ws/stocks";
pub const API_KEY: &str = "test-key";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Routes provider requests by `FUNCTION:SYMBOL`, then by `FUNCTION`, and
/// backend requests by full URL. Unrouted requests get a 404.
#[derive(Default)]
pub struct FakeHttpClient {
    routes: Mutex<HashMap<String, Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, route: &str, body: Value) {
        self.respond_with(route, Ok(HttpResponse::ok_json(body.to_string())));
    }

    pub fn respond_with(&self, route: &str, response: Result<HttpResponse, HttpError>) {
        self.routes
            .lock()
            .expect("route table should not be poisoned")
            .insert(route.to_owned(), response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .clone()
    }

    pub fn requests_for(&self, function: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.query_param("function") == Some(function))
            .collect()
    }
}

impl HttpClient for FakeHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let candidates = match (request.query_param("function"), request.query_param("symbol")) {
            (Some(function), Some(symbol)) => vec![format!("{function}:{symbol}"), function.to_owned()],
            (Some(function), None) => vec![function.to_owned()],
            (None, _) => vec![request.url.clone()],
        };
        let response = {
            let routes = self.routes.lock().expect("route table should not be poisoned");
            candidates
                .iter()
                .find_map(|route| routes.get(route).cloned())
                .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "{}")))
        };
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .push(request);
        Box::pin(async move { response })
    }
}

/// In-memory live transport. Every pushed message reaches every open
/// connection.
#[derive(Default)]
pub struct FakeLiveConnector {
    senders: Mutex<Vec<mpsc::UnboundedSender<String>>>,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl FakeLiveConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        self.senders
            .lock()
            .expect("sender list should not be poisoned")
            .retain(|sender| sender.send(message.clone()).is_ok());
    }

    pub fn push_quote(&self, quote: &Quote) {
        self.push(serde_json::to_string(quote).expect("quote should serialize"));
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn wait_for_connections(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.opened() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("live connections should open");
    }
}

impl LiveConnector for FakeLiveConnector {
    fn connect<'a>(
        &'a self,
        _url: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn LiveConnection>, LiveError>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .expect("sender list should not be poisoned")
            .push(sender);
        self.opened.fetch_add(1, Ordering::SeqCst);
        let connection = FakeConnection {
            receiver,
            closed: Arc::clone(&self.closed),
        };
        Box::pin(async move { Ok(Box::new(connection) as Box<dyn LiveConnection>) })
    }
}

struct FakeConnection {
    receiver: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicUsize>,
}

impl LiveConnection for FakeConnection {
    fn next_text(&mut self) -> BoxFuture<'_, Option<Result<String, LiveError>>> {
        Box::pin(async move { self.receiver.recv().await.map(Ok) })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        self.receiver.close();
        self.closed.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }
}

pub fn gateway(http: Arc<FakeHttpClient>) -> AlphaVantageGateway {
    AlphaVantageGateway::new(http, API_KEY).with_base_url(PROVIDER_URL)
}

pub fn backend(http: Arc<FakeHttpClient>) -> BackendClient {
    BackendClient::new(http, BACKEND_URL)
}

pub fn store(
    http: Arc<FakeHttpClient>,
    live: Arc<FakeLiveConnector>,
    policy: UntrackedPolicy,
) -> MarketStore {
    MarketStore::new(gateway(http.clone()), backend(http), live, LIVE_URL)
        .with_untracked_policy(policy)
}

/// Provider body for a `GLOBAL_QUOTE` call.
pub fn global_quote(symbol: &str, price: &str, volume: &str, day: &str) -> Value {
    serde_json::json!({
        "Global Quote": {
            "01. symbol": symbol,
            "02. open": price,
            "05. price": price,
            "06. volume": volume,
            "07. latest trading day": day
        }
    })
}
