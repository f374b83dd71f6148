//! Aggregate Store.
//!
//! [`MarketStore`] owns the dashboard state `{ tracked_symbols, watchlist }`
//! and exposes one action per gateway operation. Only `track`, live pushes
//! and `load_watchlist` mutate state; every other action is a pass-through
//! that returns the gateway result.
//!
//! State lives in a [`tokio::sync::watch`] channel. Every mutation goes
//! through `send_modify`, so fetch results and live pushes arriving from
//! channel tasks are applied one at a time and subscribers see each change.
//!
//! Failed actions are logged at `warn` here and returned to the caller, who
//! decides between fallback and propagation. State is left untouched.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::backend::{BackendClient, Session};
use crate::gateway::{AlphaVantageGateway, FetchError, TechnicalRequest};
use crate::live::{LiveChannel, LiveConnector, QuoteCallback};
use crate::{
    BalanceSheet, CashFlow, Commodity, CommodityInterval, CommodityPoint, CompanyOverview,
    CryptoPoint, CurrencyCode, Earnings, EconomicIndicator, EconomicPoint, ExchangeRate,
    FundamentalsReport, HistoricalPoint, IncomeStatement, IntradayInterval, IntradayPoint,
    OptionContract, OutputSize, Prediction, Quote, SearchResult, Symbol, SymbolReport,
    TechnicalPoint, UntrackedPolicy,
};

/// Snapshot of the dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState {
    /// Quotes for tracked symbols, unique by symbol, in insertion order.
    pub tracked_symbols: Vec<Quote>,
    /// The signed-in user's watchlist, replaced wholesale on load.
    pub watchlist: Vec<Quote>,
    /// Uppercased symbols removed with `untrack`; live pushes never re-add
    /// them until they are tracked again.
    #[serde(skip)]
    untracked: BTreeSet<String>,
}

impl StoreState {
    pub fn tracked(&self, symbol: &str) -> Option<&Quote> {
        self.tracked_symbols
            .iter()
            .find(|quote| quote.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Replaces the record for `quote.symbol`, or appends it.
    fn upsert(&mut self, quote: Quote) {
        match self
            .tracked_symbols
            .iter_mut()
            .find(|existing| existing.symbol.eq_ignore_ascii_case(&quote.symbol))
        {
            Some(existing) => *existing = quote,
            None => self.tracked_symbols.push(quote),
        }
    }

    /// Applies a live push under `policy`; returns whether state changed.
    /// A push equal to the stored record is not a change.
    fn apply_push(&mut self, quote: Quote, policy: UntrackedPolicy) -> bool {
        match self.tracked(&quote.symbol) {
            Some(existing) if *existing == quote => false,
            Some(_) => {
                self.upsert(quote);
                true
            }
            None if policy == UntrackedPolicy::Append
                && !self.untracked.contains(&quote.symbol.to_ascii_uppercase()) =>
            {
                self.upsert(quote);
                true
            }
            None => false,
        }
    }
}

/// Per-symbol outcome of [`MarketStore::track_many`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackOutcome {
    pub symbol: Symbol,
    pub result: Result<Quote, FetchError>,
}

pub struct MarketStore {
    gateway: AlphaVantageGateway,
    backend: BackendClient,
    connector: Arc<dyn LiveConnector>,
    live_url: String,
    untracked_policy: UntrackedPolicy,
    state: Arc<watch::Sender<StoreState>>,
    channels: Mutex<HashMap<Symbol, LiveChannel>>,
}

impl MarketStore {
    pub fn new(
        gateway: AlphaVantageGateway,
        backend: BackendClient,
        connector: Arc<dyn LiveConnector>,
        live_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            gateway,
            backend,
            connector,
            live_url: live_url.into(),
            untracked_policy: UntrackedPolicy::default(),
            state: Arc::new(state),
            channels: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_untracked_policy(mut self, policy: UntrackedPolicy) -> Self {
        self.untracked_policy = policy;
        self
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub const fn untracked_policy(&self) -> UntrackedPolicy {
        self.untracked_policy
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Symbols with an open live channel.
    pub async fn live_symbols(&self) -> Vec<Symbol> {
        let mut symbols = self.channels.lock().await.keys().cloned().collect::<Vec<_>>();
        symbols.sort();
        symbols
    }

    /// Fetches a quote, upserts it and makes sure a live channel feeds the
    /// symbol. Tracking a symbol again refreshes its quote without opening a
    /// second channel.
    pub async fn track(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let quote = logged("quote", self.gateway.quote(symbol)).await?;
        self.state.send_modify(|state| {
            state.untracked.remove(symbol.as_str());
            state.upsert(quote.clone());
        });

        let mut channels = self.channels.lock().await;
        if !channels.contains_key(symbol) {
            let channel = LiveChannel::open(
                Arc::clone(&self.connector),
                self.live_url.clone(),
                self.push_handler(),
            );
            info!(symbol = %symbol, "tracking symbol");
            channels.insert(symbol.clone(), channel);
        }

        Ok(quote)
    }

    /// Tracks every symbol concurrently; one outcome per input, in order.
    pub async fn track_many(&self, symbols: &[Symbol]) -> Vec<TrackOutcome> {
        join_all(symbols.iter().map(|symbol| async move {
            TrackOutcome {
                symbol: symbol.clone(),
                result: self.track(symbol).await,
            }
        }))
        .await
    }

    /// Drops the symbol's record and closes its live channel. Under
    /// [`UntrackedPolicy::Append`] later pushes for the symbol stay ignored
    /// until it is tracked again. Returns whether the symbol was tracked.
    pub async fn untrack(&self, symbol: &Symbol) -> bool {
        let channel = self.channels.lock().await.remove(symbol);
        let removed = self.state.send_if_modified(|state| {
            state.untracked.insert(symbol.as_str().to_owned());
            let before = state.tracked_symbols.len();
            state
                .tracked_symbols
                .retain(|quote| !symbol.matches(&quote.symbol));
            state.tracked_symbols.len() != before
        });

        let had_channel = channel.is_some();
        if let Some(channel) = channel {
            channel.close().await;
            info!(symbol = %symbol, "untracked symbol");
        }
        removed || had_channel
    }

    /// Replaces the watchlist with the backend's copy.
    pub async fn load_watchlist(&self, session: &Session) -> Result<Vec<Quote>, FetchError> {
        let watchlist = logged("watchlist", self.backend.watchlist(session)).await?;
        self.state
            .send_modify(|state| state.watchlist = watchlist.clone());
        Ok(watchlist)
    }

    /// Closes every live channel. Tracked quotes stay in state.
    pub async fn shutdown(&self) {
        let channels = self.channels.lock().await.drain().collect::<Vec<_>>();
        debug!(count = channels.len(), "closing live channels");
        join_all(channels.into_iter().map(|(_, channel)| channel.close())).await;
    }

    pub async fn historical(
        &self,
        symbol: &Symbol,
        output_size: OutputSize,
    ) -> Result<Vec<HistoricalPoint>, FetchError> {
        logged("historical", self.gateway.historical(symbol, output_size)).await
    }

    pub async fn intraday(
        &self,
        symbol: &Symbol,
        interval: IntradayInterval,
        output_size: OutputSize,
    ) -> Result<Vec<IntradayPoint>, FetchError> {
        logged(
            "intraday",
            self.gateway.intraday(symbol, interval, output_size),
        )
        .await
    }

    pub async fn options(&self, symbol: &Symbol) -> Result<Vec<OptionContract>, FetchError> {
        logged("options", self.gateway.options(symbol)).await
    }

    pub async fn overview(&self, symbol: &Symbol) -> Result<CompanyOverview, FetchError> {
        logged("overview", self.gateway.overview(symbol)).await
    }

    pub async fn income_statement(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<IncomeStatement>, FetchError> {
        logged("income_statement", self.gateway.income_statement(symbol)).await
    }

    pub async fn balance_sheet(&self, symbol: &Symbol) -> Result<Vec<BalanceSheet>, FetchError> {
        logged("balance_sheet", self.gateway.balance_sheet(symbol)).await
    }

    pub async fn cash_flow(&self, symbol: &Symbol) -> Result<Vec<CashFlow>, FetchError> {
        logged("cash_flow", self.gateway.cash_flow(symbol)).await
    }

    pub async fn earnings(&self, symbol: &Symbol) -> Result<Vec<Earnings>, FetchError> {
        logged("earnings", self.gateway.earnings(symbol)).await
    }

    pub async fn exchange_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, FetchError> {
        logged("exchange_rate", self.gateway.exchange_rate(from, to)).await
    }

    pub async fn crypto_daily(
        &self,
        symbol: &Symbol,
        market: &CurrencyCode,
    ) -> Result<Vec<CryptoPoint>, FetchError> {
        logged("crypto_daily", self.gateway.crypto_daily(symbol, market)).await
    }

    pub async fn commodity(
        &self,
        commodity: Commodity,
        interval: CommodityInterval,
    ) -> Result<Vec<CommodityPoint>, FetchError> {
        logged("commodity", self.gateway.commodity(commodity, interval)).await
    }

    pub async fn economic(
        &self,
        indicator: EconomicIndicator,
    ) -> Result<Vec<EconomicPoint>, FetchError> {
        logged("economic", self.gateway.economic(indicator)).await
    }

    pub async fn technical(
        &self,
        request: &TechnicalRequest,
    ) -> Result<Vec<TechnicalPoint>, FetchError> {
        logged("technical", self.gateway.technical(request)).await
    }

    pub async fn search(&self, keywords: &str) -> Result<Vec<SearchResult>, FetchError> {
        logged("search", self.gateway.search(keywords)).await
    }

    pub async fn prediction(&self, symbol: &Symbol) -> Result<Prediction, FetchError> {
        logged("prediction", self.backend.prediction(symbol)).await
    }

    /// Quote, compact daily history and overview, fetched concurrently.
    /// Fails as a whole if any call fails; state is not touched.
    pub async fn symbol_report(&self, symbol: &Symbol) -> Result<SymbolReport, FetchError> {
        let (quote, history, overview) = logged("symbol_report", async {
            tokio::try_join!(
                self.gateway.quote(symbol),
                self.gateway.historical(symbol, OutputSize::Compact),
                self.gateway.overview(symbol),
            )
        })
        .await?;

        Ok(SymbolReport {
            quote,
            history,
            overview,
        })
    }

    /// Overview plus the four statement series, fetched concurrently.
    pub async fn fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsReport, FetchError> {
        let (overview, income_statements, balance_sheets, cash_flows, earnings) =
            logged("fundamentals", async {
                tokio::try_join!(
                    self.gateway.overview(symbol),
                    self.gateway.income_statement(symbol),
                    self.gateway.balance_sheet(symbol),
                    self.gateway.cash_flow(symbol),
                    self.gateway.earnings(symbol),
                )
            })
            .await?;

        Ok(FundamentalsReport {
            overview,
            income_statements,
            balance_sheets,
            cash_flows,
            earnings,
        })
    }

    fn push_handler(&self) -> QuoteCallback {
        let state = Arc::clone(&self.state);
        let policy = self.untracked_policy;
        Arc::new(move |quote: Quote| {
            let symbol = quote.symbol.clone();
            let changed = state.send_if_modified(|current| current.apply_push(quote, policy));
            if !changed {
                debug!(%symbol, "live push left state unchanged");
            }
        })
    }
}

async fn logged<T, F>(action: &'static str, call: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    let result = call.await;
    if let Err(e) = &result {
        warn!(action, code = e.code(), error = %e, "store action failed");
    }
    result
}
