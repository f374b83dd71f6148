use serde::{Deserialize, Serialize};

use super::numeric::{lenient_f64, lenient_i64};

fn nan() -> f64 {
    f64::NAN
}

/// Current price/volume snapshot for a symbol.
///
/// Replaced wholesale on every update, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub volume: Option<i64>,
    #[serde(default)]
    pub timestamp: String,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        volume: Option<i64>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            volume,
            timestamp: timestamp.into(),
        }
    }
}

/// One trading day of a daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

/// One bar of an intraday series, keyed by `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayPoint {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub symbol: String,
    pub expiration_date: String,
    pub strike: f64,
    #[serde(rename = "type")]
    pub option_type: String,
    pub last_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub exchange: String,
    pub market_cap: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub fiscal_date_ending: String,
    pub total_revenue: Option<i64>,
    pub net_income: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub fiscal_date_ending: String,
    pub total_assets: Option<i64>,
    pub total_liabilities: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub fiscal_date_ending: String,
    pub operating_cash_flow: Option<i64>,
    pub capital_expenditure: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earnings {
    pub fiscal_date_ending: String,
    pub reported_eps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub exchange_rate: f64,
}

/// Daily digital currency bar, priced in the requested market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub match_type: String,
    pub region: String,
}

/// Backend price prediction for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub symbol: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub predicted_price: f64,
    /// Fraction between 0 and 1.
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub confidence: f64,
}

/// Fundamentals bundle assembled from five concurrent statement calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsReport {
    pub overview: CompanyOverview,
    pub income_statements: Vec<IncomeStatement>,
    pub balance_sheets: Vec<BalanceSheet>,
    pub cash_flows: Vec<CashFlow>,
    pub earnings: Vec<Earnings>,
}

/// Dashboard card data for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub quote: Quote,
    pub history: Vec<HistoricalPoint>,
    pub overview: CompanyOverview,
}
