//! # Domain Models
//!
//! Request parameters and normalized records for quotedeck.
//!
//! ## Records
//!
//! | Type | Produced by |
//! |------|-------------|
//! | [`Quote`] | quote fetch, live pushes, watchlist |
//! | [`HistoricalPoint`] | daily series |
//! | [`IntradayPoint`] | intraday series |
//! | [`OptionContract`] | option chain |
//! | [`CompanyOverview`], [`IncomeStatement`], [`BalanceSheet`], [`CashFlow`], [`Earnings`] | fundamentals |
//! | [`ExchangeRate`] | forex |
//! | [`CryptoPoint`] | digital currency daily series |
//! | [`CommodityPoint`], [`EconomicPoint`], [`TechnicalPoint`] | dated value series |
//! | [`SearchResult`] | symbol search |
//! | [`Prediction`] | backend prediction route |
//!
//! Records are flat values with no validation beyond their shape: numbers the
//! provider fails to supply are `NaN` (floats) or `None` (integers).
//!
//! ## Parameters
//!
//! [`Symbol`], [`CurrencyCode`] and [`IndicatorFunction`] are validated at
//! construction; interval and size options are closed enums.

mod models;
pub mod numeric;
mod params;
mod symbol;
mod timestamp;

pub use models::{
    BalanceSheet, CashFlow, CommodityPoint, CompanyOverview, CryptoPoint, Earnings,
    EconomicPoint, ExchangeRate, FundamentalsReport, HistoricalPoint, IncomeStatement,
    IntradayPoint, OptionContract, Prediction, Quote, SearchResult, SymbolReport,
    TechnicalPoint,
};
pub use params::{
    Commodity, CommodityInterval, CurrencyCode, EconomicIndicator, IndicatorFunction,
    IndicatorInterval, IntradayInterval, OutputSize, SeriesType,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
