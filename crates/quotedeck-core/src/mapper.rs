//! Field Mapper: provider JSON to normalized records.
//!
//! Every function here is pure. The only check performed is that the
//! category's top-level key is present; individual fields are coerced with
//! the lenient rules in [`crate::domain::numeric`] and never rejected.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::numeric::{parse_float, parse_int, parse_text};
use crate::{
    BalanceSheet, CashFlow, CommodityPoint, CompanyOverview, CryptoPoint, CurrencyCode, Earnings,
    EconomicPoint, ExchangeRate, HistoricalPoint, IncomeStatement, IndicatorFunction,
    IntradayInterval, IntradayPoint, OptionContract, Quote, SearchResult, TechnicalPoint,
};

pub const QUOTE_KEY: &str = "Global Quote";
pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
pub const OPTION_CHAIN_KEY: &str = "Option Chain";
pub const OVERVIEW_KEY: &str = "Symbol";
pub const ANNUAL_REPORTS_KEY: &str = "annualReports";
pub const ANNUAL_EARNINGS_KEY: &str = "annualEarnings";
pub const EXCHANGE_RATE_KEY: &str = "Realtime Currency Exchange Rate";
pub const CRYPTO_SERIES_KEY: &str = "Time Series (Digital Currency Daily)";
pub const DATA_KEY: &str = "data";
pub const SEARCH_KEY: &str = "bestMatches";

/// Provider keys that carry a diagnostic instead of data.
const DIAGNOSTIC_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// The expected top-level key was absent from a provider response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider response is missing '{key}'{}", describe(.detail))]
pub struct MissingData {
    pub key: String,
    /// Diagnostic the provider sent in place of data, if any.
    pub detail: Option<String>,
}

impl MissingData {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            detail: None,
        }
    }

    fn in_body(key: impl Into<String>, body: &Value) -> Self {
        let detail = DIAGNOSTIC_KEYS
            .iter()
            .find_map(|name| body.get(*name).and_then(Value::as_str))
            .map(str::to_owned);
        Self {
            key: key.into(),
            detail,
        }
    }
}

fn describe(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|text| format!(" (provider said: {text})"))
        .unwrap_or_default()
}

pub fn map_quote(body: &Value) -> Result<Quote, MissingData> {
    let data = body
        .get(QUOTE_KEY)
        .and_then(Value::as_object)
        .filter(|data| {
            data.get("01. symbol")
                .and_then(Value::as_str)
                .is_some_and(|symbol| !symbol.is_empty())
        })
        .ok_or_else(|| MissingData::in_body(QUOTE_KEY, body))?;

    Ok(Quote {
        symbol: parse_text(data.get("01. symbol")),
        price: parse_float(data.get("05. price")),
        volume: parse_int(data.get("06. volume")),
        timestamp: parse_text(data.get("07. latest trading day")),
    })
}

pub fn map_historical(body: &Value) -> Result<Vec<HistoricalPoint>, MissingData> {
    let series = object_at(body, DAILY_SERIES_KEY)?;

    Ok(series
        .iter()
        .map(|(date, values)| {
            let bar = OhlcvFields::read(values, &OhlcvKeys::PLAIN);
            HistoricalPoint {
                date: date.clone(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            }
        })
        .collect())
}

pub fn map_intraday(
    body: &Value,
    interval: IntradayInterval,
) -> Result<Vec<IntradayPoint>, MissingData> {
    let key = intraday_key(interval);
    let series = object_at(body, &key)?;

    Ok(series
        .iter()
        .map(|(timestamp, values)| {
            let bar = OhlcvFields::read(values, &OhlcvKeys::PLAIN);
            IntradayPoint {
                timestamp: timestamp.clone(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            }
        })
        .collect())
}

pub fn intraday_key(interval: IntradayInterval) -> String {
    format!("Time Series ({})", interval.as_str())
}

pub fn map_options(body: &Value) -> Result<Vec<OptionContract>, MissingData> {
    let contracts = array_at(body, OPTION_CHAIN_KEY)?;

    Ok(contracts
        .iter()
        .map(|contract| OptionContract {
            symbol: parse_text(contract.get("symbol")),
            expiration_date: parse_text(contract.get("expiration_date")),
            strike: parse_float(contract.get("strike")),
            option_type: parse_text(contract.get("type")),
            last_price: parse_float(contract.get("last_price")),
        })
        .collect())
}

pub fn map_overview(body: &Value) -> Result<CompanyOverview, MissingData> {
    let has_symbol = body
        .get(OVERVIEW_KEY)
        .and_then(Value::as_str)
        .is_some_and(|symbol| !symbol.is_empty());
    if !has_symbol {
        return Err(MissingData::in_body(OVERVIEW_KEY, body));
    }

    Ok(CompanyOverview {
        symbol: parse_text(body.get("Symbol")),
        name: parse_text(body.get("Name")),
        description: parse_text(body.get("Description")),
        exchange: parse_text(body.get("Exchange")),
        market_cap: parse_int(body.get("MarketCapitalization")),
    })
}

pub fn map_income_statements(body: &Value) -> Result<Vec<IncomeStatement>, MissingData> {
    let reports = array_at(body, ANNUAL_REPORTS_KEY)?;

    Ok(reports
        .iter()
        .map(|report| IncomeStatement {
            fiscal_date_ending: parse_text(report.get("fiscalDateEnding")),
            total_revenue: parse_int(report.get("totalRevenue")),
            net_income: parse_int(report.get("netIncome")),
        })
        .collect())
}

pub fn map_balance_sheets(body: &Value) -> Result<Vec<BalanceSheet>, MissingData> {
    let reports = array_at(body, ANNUAL_REPORTS_KEY)?;

    Ok(reports
        .iter()
        .map(|report| BalanceSheet {
            fiscal_date_ending: parse_text(report.get("fiscalDateEnding")),
            total_assets: parse_int(report.get("totalAssets")),
            total_liabilities: parse_int(report.get("totalLiabilities")),
        })
        .collect())
}

pub fn map_cash_flows(body: &Value) -> Result<Vec<CashFlow>, MissingData> {
    let reports = array_at(body, ANNUAL_REPORTS_KEY)?;

    Ok(reports
        .iter()
        .map(|report| CashFlow {
            fiscal_date_ending: parse_text(report.get("fiscalDateEnding")),
            operating_cash_flow: parse_int(report.get("operatingCashflow")),
            capital_expenditure: parse_int(report.get("capitalExpenditures")),
        })
        .collect())
}

pub fn map_earnings(body: &Value) -> Result<Vec<Earnings>, MissingData> {
    let reports = array_at(body, ANNUAL_EARNINGS_KEY)?;

    Ok(reports
        .iter()
        .map(|report| Earnings {
            fiscal_date_ending: parse_text(report.get("fiscalDateEnding")),
            reported_eps: parse_float(report.get("reportedEPS")),
        })
        .collect())
}

pub fn map_exchange_rate(body: &Value) -> Result<ExchangeRate, MissingData> {
    let data = object_at(body, EXCHANGE_RATE_KEY)?;

    Ok(ExchangeRate {
        from_currency: parse_text(data.get("1. From_Currency Code")),
        to_currency: parse_text(data.get("3. To_Currency Code")),
        exchange_rate: parse_float(data.get("5. Exchange Rate")),
    })
}

/// Maps a digital currency daily series priced in `market`.
///
/// Prices are read from the market-suffixed keys (`1a. open (EUR)`), then
/// from the unsuffixed ones (`1. open`) newer payloads use.
pub fn map_crypto_daily(
    body: &Value,
    market: &CurrencyCode,
) -> Result<Vec<CryptoPoint>, MissingData> {
    let series = object_at(body, CRYPTO_SERIES_KEY)?;
    let market = market.as_str();
    let (open, high, low, close) = (
        format!("1a. open ({market})"),
        format!("2a. high ({market})"),
        format!("3a. low ({market})"),
        format!("4a. close ({market})"),
    );
    let suffixed = OhlcvKeys {
        open: &open,
        high: &high,
        low: &low,
        close: &close,
        volume: "5. volume",
    };

    Ok(series
        .iter()
        .map(|(date, values)| {
            let bar = OhlcvFields::read_with_fallback(values, &suffixed, &OhlcvKeys::PLAIN);
            CryptoPoint {
                date: date.clone(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            }
        })
        .collect())
}

pub fn map_commodity(body: &Value) -> Result<Vec<CommodityPoint>, MissingData> {
    let points = array_at(body, DATA_KEY)?;

    Ok(points
        .iter()
        .map(|point| CommodityPoint {
            date: parse_text(point.get("date")),
            value: parse_float(point.get("value")),
        })
        .collect())
}

pub fn map_economic(body: &Value) -> Result<Vec<EconomicPoint>, MissingData> {
    let points = array_at(body, DATA_KEY)?;

    Ok(points
        .iter()
        .map(|point| EconomicPoint {
            date: parse_text(point.get("date")),
            value: parse_float(point.get("value")),
        })
        .collect())
}

/// Maps `"Technical Analysis: <FUNCTION>"`.
///
/// Each entry stores its value under the function name; the lowercase form
/// is accepted as well.
pub fn map_technical(
    body: &Value,
    function: &IndicatorFunction,
) -> Result<Vec<TechnicalPoint>, MissingData> {
    let series = object_at(body, &function.response_key())?;
    let upper = function.as_str();
    let lower = upper.to_ascii_lowercase();

    Ok(series
        .iter()
        .map(|(date, values)| TechnicalPoint {
            date: date.clone(),
            value: parse_float(values.get(upper).or_else(|| values.get(lower.as_str()))),
        })
        .collect())
}

pub fn map_search(body: &Value) -> Result<Vec<SearchResult>, MissingData> {
    let matches = array_at(body, SEARCH_KEY)?;

    Ok(matches
        .iter()
        .map(|entry| SearchResult {
            symbol: parse_text(entry.get("1. symbol")),
            name: parse_text(entry.get("2. name")),
            match_type: parse_text(entry.get("3. type")),
            region: parse_text(entry.get("4. region")),
        })
        .collect())
}

fn object_at<'a>(body: &'a Value, key: &str) -> Result<&'a Map<String, Value>, MissingData> {
    body.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| MissingData::in_body(key, body))
}

fn array_at<'a>(body: &'a Value, key: &str) -> Result<&'a Vec<Value>, MissingData> {
    body.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| MissingData::in_body(key, body))
}

struct OhlcvKeys<'a> {
    open: &'a str,
    high: &'a str,
    low: &'a str,
    close: &'a str,
    volume: &'a str,
}

impl OhlcvKeys<'static> {
    const PLAIN: Self = Self {
        open: "1. open",
        high: "2. high",
        low: "3. low",
        close: "4. close",
        volume: "5. volume",
    };
}

struct OhlcvFields {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<i64>,
}

impl OhlcvFields {
    fn read(values: &Value, keys: &OhlcvKeys<'_>) -> Self {
        Self {
            open: parse_float(values.get(keys.open)),
            high: parse_float(values.get(keys.high)),
            low: parse_float(values.get(keys.low)),
            close: parse_float(values.get(keys.close)),
            volume: parse_int(values.get(keys.volume)),
        }
    }

    fn read_with_fallback(values: &Value, primary: &OhlcvKeys<'_>, fallback: &OhlcvKeys<'_>) -> Self {
        let field = |first: &str, second: &str| values.get(first).or_else(|| values.get(second));
        Self {
            open: parse_float(field(primary.open, fallback.open)),
            high: parse_float(field(primary.high, fallback.high)),
            low: parse_float(field(primary.low, fallback.low)),
            close: parse_float(field(primary.close, fallback.close)),
            volume: parse_int(field(primary.volume, fallback.volume)),
        }
    }
}
