use thiserror::Error;

/// Validation and contract errors exposed by `quotedeck-core`.
///
/// These are raised client-side, before any request leaves the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("currency must be a 3-10 character alphanumeric code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("invalid intraday interval '{value}', expected one of 1min, 5min, 15min, 30min, 60min")]
    InvalidIntradayInterval { value: String },
    #[error("invalid output size '{value}', expected compact or full")]
    InvalidOutputSize { value: String },
    #[error("invalid commodity interval '{value}', expected daily, weekly or monthly")]
    InvalidCommodityInterval { value: String },
    #[error("invalid indicator interval '{value}'")]
    InvalidIndicatorInterval { value: String },
    #[error("invalid series type '{value}', expected close, open, high or low")]
    InvalidSeriesType { value: String },
    #[error("unknown commodity '{value}'")]
    UnknownCommodity { value: String },
    #[error("unknown economic indicator '{value}'")]
    UnknownEconomicIndicator { value: String },
    #[error("indicator function must be uppercase letters, digits or '_': '{value}'")]
    InvalidIndicatorFunction { value: String },
    #[error("time period must be greater than zero")]
    InvalidTimePeriod,
    #[error("search keywords cannot be empty")]
    EmptyKeywords,

    #[error("email address is not valid: '{value}'")]
    InvalidEmail { value: String },
    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("invalid untracked policy '{value}', expected ignore or append")]
    InvalidUntrackedPolicy { value: String },
    #[error("invalid value for {name}: '{value}'")]
    InvalidConfigValue { name: &'static str, value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}
