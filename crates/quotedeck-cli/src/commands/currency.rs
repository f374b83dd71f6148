use quotedeck_core::{CurrencyCode, MarketStore, Symbol};

use crate::cli::{CryptoArgs, ForexArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn forex(args: &ForexArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let from = CurrencyCode::parse(&args.from)?;
    let to = CurrencyCode::parse(&args.to)?;
    CommandResult::from_fetch(store.exchange_rate(&from, &to).await)
}

pub async fn crypto(args: &CryptoArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let market = CurrencyCode::parse(&args.market)?;
    CommandResult::from_fetch(store.crypto_daily(&symbol, &market).await)
}
