//! # Quotedeck Core
//!
//! Client-side data layer for the quotedeck market dashboard.
//!
//! ## Overview
//!
//! - **Field Mapper** turning Alpha Vantage JSON into normalized records
//! - **Fetch Gateway** with one async call per data category
//! - **Live Update Channel** feeding pushed quotes into the store
//! - **Aggregate Store** holding tracked quotes and the watchlist
//! - **Backend client** for the watchlist and account routes
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`backend`] | Watchlist, prediction, login, register and profile routes |
//! | [`config`] | Environment-driven configuration |
//! | [`domain`] | Request parameters and normalized records |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation errors |
//! | [`gateway`] | Alpha Vantage client and `FetchError` |
//! | [`http_client`] | HTTP client abstraction |
//! | [`live`] | Streaming quote channel |
//! | [`mapper`] | Provider JSON to records |
//! | [`store`] | `MarketStore` state container |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotedeck_core::{
//!     AlphaVantageGateway, BackendClient, DashboardConfig, MarketStore, ReqwestHttpClient,
//!     Symbol, WebSocketConnector,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::from_env()?;
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let store = MarketStore::new(
//!         AlphaVantageGateway::from_config(http.clone(), &config),
//!         BackendClient::from_config(http, &config),
//!         Arc::new(WebSocketConnector),
//!         config.live_url(),
//!     );
//!
//!     store.track(&Symbol::parse("AAPL")?).await?;
//!     println!("{:?}", store.snapshot().tracked_symbols);
//!     store.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  MarketStore    │◀────│  LiveChannel     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Fetch Gateway   │────▶│ HTTP Client      │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Field Mapper    │
//! └─────────────────┘
//! ```
//!
//! ## Security
//!
//! - The API key travels only as a query parameter and is never logged
//! - Bearer tokens are attached per request and never logged

pub mod backend;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod live;
pub mod mapper;
pub mod store;

pub use backend::{validate_email, BackendClient, Credentials, Session, User};
pub use config::{DashboardConfig, UntrackedPolicy};
pub use domain::{
    BalanceSheet, CashFlow, Commodity, CommodityInterval, CommodityPoint, CompanyOverview,
    CryptoPoint, CurrencyCode, Earnings, EconomicIndicator, EconomicPoint, ExchangeRate,
    FundamentalsReport, HistoricalPoint, IncomeStatement, IndicatorFunction, IndicatorInterval,
    IntradayInterval, IntradayPoint, OptionContract, OutputSize, Prediction, Quote, SearchResult,
    SeriesType,
    Symbol, SymbolReport, TechnicalPoint, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use gateway::{AlphaVantageGateway, FetchError, FetchErrorKind, TechnicalRequest};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use live::{
    ChannelState, LiveChannel, LiveConnection, LiveConnector, LiveError, QuoteCallback,
    WebSocketConnector,
};
pub use mapper::MissingData;
pub use store::{MarketStore, StoreState, TrackOutcome};
