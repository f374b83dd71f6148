use quotedeck_core::{MarketStore, Symbol};

use crate::cli::SymbolArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &SymbolArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    CommandResult::from_fetch(store.symbol_report(&symbol).await)
}

pub async fn prediction(args: &SymbolArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    CommandResult::from_fetch(store.prediction(&symbol).await)
}
