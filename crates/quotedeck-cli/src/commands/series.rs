use quotedeck_core::{IntradayInterval, MarketStore, OutputSize, Symbol};

use crate::cli::{HistoricalArgs, IntradayArgs, SymbolArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn historical(
    args: &HistoricalArgs,
    store: &MarketStore,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let size = args.outputsize.parse::<OutputSize>()?;
    CommandResult::from_fetch(store.historical(&symbol, size).await)
}

pub async fn intraday(args: &IntradayArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let interval = args.interval.parse::<IntradayInterval>()?;
    let size = args.outputsize.parse::<OutputSize>()?;
    CommandResult::from_fetch(store.intraday(&symbol, interval, size).await)
}

pub async fn options(args: &SymbolArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    CommandResult::from_fetch(store.options(&symbol).await)
}
