//! Request parameters accepted by the Fetch Gateway.
//!
//! Every enumerated option is a closed set; free-form identifiers
//! (currency codes, indicator functions) are validated newtypes.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire value sent to the provider.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| ValidationError::$error {
                        value: trimmed.to_owned(),
                    })
            }
        }
    };
}

closed_set! {
    /// Bar granularity for `TIME_SERIES_INTRADAY`.
    IntradayInterval, InvalidIntradayInterval {
        OneMinute => "1min",
        FiveMinutes => "5min",
        FifteenMinutes => "15min",
        ThirtyMinutes => "30min",
        SixtyMinutes => "60min",
    }
}

closed_set! {
    /// `compact` returns the latest 100 points, `full` the whole history.
    OutputSize, InvalidOutputSize {
        Compact => "compact",
        Full => "full",
    }
}

closed_set! {
    CommodityInterval, InvalidCommodityInterval {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

closed_set! {
    /// Sampling interval for technical indicator series.
    IndicatorInterval, InvalidIndicatorInterval {
        OneMinute => "1min",
        FiveMinutes => "5min",
        FifteenMinutes => "15min",
        ThirtyMinutes => "30min",
        SixtyMinutes => "60min",
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

closed_set! {
    /// Price field an indicator is computed over.
    SeriesType, InvalidSeriesType {
        Close => "close",
        Open => "open",
        High => "high",
        Low => "low",
    }
}

closed_set! {
    /// Commodity series; the wire value doubles as the provider `function`.
    Commodity, UnknownCommodity {
        Wti => "WTI",
        Brent => "BRENT",
        NaturalGas => "NATURAL_GAS",
        Copper => "COPPER",
        Aluminum => "ALUMINUM",
        Wheat => "WHEAT",
        Corn => "CORN",
        Cotton => "COTTON",
        Sugar => "SUGAR",
        Coffee => "COFFEE",
        AllCommodities => "ALL_COMMODITIES",
    }
}

closed_set! {
    /// US economic indicator series; the wire value is the provider `function`.
    EconomicIndicator, UnknownEconomicIndicator {
        RealGdp => "REAL_GDP",
        RealGdpPerCapita => "REAL_GDP_PER_CAPITA",
        TreasuryYield => "TREASURY_YIELD",
        FederalFundsRate => "FEDERAL_FUNDS_RATE",
        Cpi => "CPI",
        Inflation => "INFLATION",
        RetailSales => "RETAIL_SALES",
        Durables => "DURABLES",
        Unemployment => "UNEMPLOYMENT",
        NonfarmPayroll => "NONFARM_PAYROLL",
    }
}

impl Default for IntradayInterval {
    fn default() -> Self {
        Self::OneMinute
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        Self::Compact
    }
}

impl Default for CommodityInterval {
    fn default() -> Self {
        Self::Monthly
    }
}

impl Default for IndicatorInterval {
    fn default() -> Self {
        Self::Daily
    }
}

impl Default for SeriesType {
    fn default() -> Self {
        Self::Close
    }
}

/// Physical or digital currency code (`USD`, `EUR`, `BTC`, `USDT`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let len = normalized.len();
        let is_valid = (3..=10).contains(&len)
            && normalized.chars().all(|ch| ch.is_ascii_alphanumeric());

        if !is_valid {
            return Err(ValidationError::InvalidCurrency {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

const MAX_FUNCTION_LEN: usize = 32;

/// Technical indicator function name (`SMA`, `RSI`, `BBANDS`, ...).
///
/// The provider exposes dozens of indicators, so this is validated for shape
/// rather than enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndicatorFunction(String);

impl IndicatorFunction {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let starts_with_letter = normalized
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_alphabetic());
        let is_valid = starts_with_letter
            && normalized.len() <= MAX_FUNCTION_LEN
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_');

        if !is_valid {
            return Err(ValidationError::InvalidIndicatorFunction {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Top-level key of the provider response for this indicator.
    pub fn response_key(&self) -> String {
        format!("Technical Analysis: {}", self.0)
    }
}

impl Display for IndicatorFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorFunction {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for IndicatorFunction {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IndicatorFunction> for String {
    fn from(value: IndicatorFunction) -> Self {
        value.0
    }
}
