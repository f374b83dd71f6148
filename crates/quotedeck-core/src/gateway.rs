//! Fetch Gateway for the Alpha Vantage query endpoint.
//!
//! One async method per data category. Each call sends exactly one GET with
//! the `function` discriminator, the category parameters and `apikey`, then
//! hands the decoded body to the matching [`crate::mapper`] function. There is
//! no caching, retry or rate limiting at this layer.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::mapper::{self, MissingData};
use crate::{
    BalanceSheet, CashFlow, Commodity, CommodityInterval, CommodityPoint, CompanyOverview,
    CryptoPoint, CurrencyCode, DashboardConfig, Earnings, EconomicIndicator, EconomicPoint,
    ExchangeRate, HistoricalPoint, IncomeStatement, IndicatorFunction, IndicatorInterval,
    IntradayInterval, IntradayPoint, OptionContract, OutputSize, Quote, SearchResult, SeriesType,
    Symbol, TechnicalPoint, ValidationError,
};

pub const DEFAULT_PROVIDER_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TIME_PERIOD: u32 = 20;

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection failure, timeout or non-2xx status.
    Transport,
    /// The body lacked the category's top-level key.
    MissingData,
    /// The body was not JSON or did not have the expected shape.
    Decode,
    /// The backend rejected the bearer token or credentials.
    Unauthorized,
    /// Parameters were rejected before the request was sent.
    InvalidRequest,
}

/// Structured error returned by every gateway, backend and store action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Transport, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Decode, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Unauthorized, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::InvalidRequest, message)
    }

    fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::MissingData => "fetch.missing_data",
            FetchErrorKind::Decode => "fetch.decode",
            FetchErrorKind::Unauthorized => "fetch.unauthorized",
            FetchErrorKind::InvalidRequest => "fetch.invalid_request",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

impl From<MissingData> for FetchError {
    fn from(value: MissingData) -> Self {
        Self::new(FetchErrorKind::MissingData, value.to_string())
    }
}

impl From<ValidationError> for FetchError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Parameters of a technical indicator request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalRequest {
    pub function: IndicatorFunction,
    pub symbol: Symbol,
    pub interval: IndicatorInterval,
    pub time_period: u32,
    pub series_type: SeriesType,
}

impl TechnicalRequest {
    /// Daily interval, 20-period window over closing prices.
    pub fn new(function: IndicatorFunction, symbol: Symbol) -> Self {
        Self {
            function,
            symbol,
            interval: IndicatorInterval::default(),
            time_period: DEFAULT_TIME_PERIOD,
            series_type: SeriesType::default(),
        }
    }

    pub fn with_interval(mut self, interval: IndicatorInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_time_period(mut self, time_period: u32) -> Result<Self, ValidationError> {
        if time_period == 0 {
            return Err(ValidationError::InvalidTimePeriod);
        }
        self.time_period = time_period;
        Ok(self)
    }

    pub fn with_series_type(mut self, series_type: SeriesType) -> Self {
        self.series_type = series_type;
        self
    }
}

/// Alpha Vantage client.
#[derive(Clone)]
pub struct AlphaVantageGateway {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl AlphaVantageGateway {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_PROVIDER_URL),
            timeout_ms: None,
        }
    }

    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &DashboardConfig) -> Self {
        Self::new(http_client, config.api_key.clone())
            .with_base_url(config.provider_url.clone())
            .with_timeout_ms(Some(config.timeout_ms))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn quote(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let body = self
            .fetch_json("GLOBAL_QUOTE", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_quote(&body)?)
    }

    pub async fn historical(
        &self,
        symbol: &Symbol,
        output_size: OutputSize,
    ) -> Result<Vec<HistoricalPoint>, FetchError> {
        let body = self
            .fetch_json(
                "TIME_SERIES_DAILY",
                &[("symbol", symbol.as_str()), ("outputsize", output_size.as_str())],
            )
            .await?;
        Ok(mapper::map_historical(&body)?)
    }

    pub async fn intraday(
        &self,
        symbol: &Symbol,
        interval: IntradayInterval,
        output_size: OutputSize,
    ) -> Result<Vec<IntradayPoint>, FetchError> {
        let body = self
            .fetch_json(
                "TIME_SERIES_INTRADAY",
                &[
                    ("symbol", symbol.as_str()),
                    ("interval", interval.as_str()),
                    ("outputsize", output_size.as_str()),
                ],
            )
            .await?;
        Ok(mapper::map_intraday(&body, interval)?)
    }

    pub async fn options(&self, symbol: &Symbol) -> Result<Vec<OptionContract>, FetchError> {
        let body = self
            .fetch_json("REALTIME_OPTIONS", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_options(&body)?)
    }

    pub async fn overview(&self, symbol: &Symbol) -> Result<CompanyOverview, FetchError> {
        let body = self
            .fetch_json("OVERVIEW", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_overview(&body)?)
    }

    pub async fn income_statement(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<IncomeStatement>, FetchError> {
        let body = self
            .fetch_json("INCOME_STATEMENT", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_income_statements(&body)?)
    }

    pub async fn balance_sheet(&self, symbol: &Symbol) -> Result<Vec<BalanceSheet>, FetchError> {
        let body = self
            .fetch_json("BALANCE_SHEET", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_balance_sheets(&body)?)
    }

    pub async fn cash_flow(&self, symbol: &Symbol) -> Result<Vec<CashFlow>, FetchError> {
        let body = self
            .fetch_json("CASH_FLOW", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_cash_flows(&body)?)
    }

    pub async fn earnings(&self, symbol: &Symbol) -> Result<Vec<Earnings>, FetchError> {
        let body = self
            .fetch_json("EARNINGS", &[("symbol", symbol.as_str())])
            .await?;
        Ok(mapper::map_earnings(&body)?)
    }

    pub async fn exchange_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, FetchError> {
        let body = self
            .fetch_json(
                "CURRENCY_EXCHANGE_RATE",
                &[("from_currency", from.as_str()), ("to_currency", to.as_str())],
            )
            .await?;
        Ok(mapper::map_exchange_rate(&body)?)
    }

    pub async fn crypto_daily(
        &self,
        symbol: &Symbol,
        market: &CurrencyCode,
    ) -> Result<Vec<CryptoPoint>, FetchError> {
        let body = self
            .fetch_json(
                "DIGITAL_CURRENCY_DAILY",
                &[("symbol", symbol.as_str()), ("market", market.as_str())],
            )
            .await?;
        Ok(mapper::map_crypto_daily(&body, market)?)
    }

    pub async fn commodity(
        &self,
        commodity: Commodity,
        interval: CommodityInterval,
    ) -> Result<Vec<CommodityPoint>, FetchError> {
        let body = self
            .fetch_json(commodity.as_str(), &[("interval", interval.as_str())])
            .await?;
        Ok(mapper::map_commodity(&body)?)
    }

    pub async fn economic(
        &self,
        indicator: EconomicIndicator,
    ) -> Result<Vec<EconomicPoint>, FetchError> {
        let body = self.fetch_json(indicator.as_str(), &[]).await?;
        Ok(mapper::map_economic(&body)?)
    }

    pub async fn technical(
        &self,
        request: &TechnicalRequest,
    ) -> Result<Vec<TechnicalPoint>, FetchError> {
        let time_period = request.time_period.to_string();
        let body = self
            .fetch_json(
                request.function.as_str(),
                &[
                    ("symbol", request.symbol.as_str()),
                    ("interval", request.interval.as_str()),
                    ("time_period", time_period.as_str()),
                    ("series_type", request.series_type.as_str()),
                ],
            )
            .await?;
        Ok(mapper::map_technical(&body, &request.function)?)
    }

    pub async fn search(&self, keywords: &str) -> Result<Vec<SearchResult>, FetchError> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(ValidationError::EmptyKeywords.into());
        }

        let body = self
            .fetch_json("SYMBOL_SEARCH", &[("keywords", keywords)])
            .await?;
        Ok(mapper::map_search(&body)?)
    }

    async fn fetch_json(&self, function: &str, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let mut request = HttpRequest::get(&self.base_url).with_query("function", function);
        for (name, value) in params {
            request = request.with_query(*name, *value);
        }
        let request = request
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms);

        let started = Instant::now();
        let response = self.http_client.execute(request).await.map_err(|e| {
            FetchError::transport(format!("{function} transport error: {}", e.message()))
        })?;
        debug!(
            function,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "provider responded"
        );

        if !response.is_success() {
            return Err(FetchError::transport(format!(
                "provider returned status {} for {function}",
                response.status
            )));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| FetchError::decode(format!("{function} response is not valid JSON: {e}")))
    }
}
