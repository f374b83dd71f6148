use quotedeck_core::{MarketStore, Symbol};

use crate::cli::{FundamentalsArgs, FundamentalsSection};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &FundamentalsArgs,
    store: &MarketStore,
) -> Result<(&'static str, CommandResult), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let result = match args.section {
        FundamentalsSection::Overview => CommandResult::from_fetch(store.overview(&symbol).await),
        FundamentalsSection::Income => {
            CommandResult::from_fetch(store.income_statement(&symbol).await)
        }
        FundamentalsSection::Balance => {
            CommandResult::from_fetch(store.balance_sheet(&symbol).await)
        }
        FundamentalsSection::Cashflow => CommandResult::from_fetch(store.cash_flow(&symbol).await),
        FundamentalsSection::Earnings => CommandResult::from_fetch(store.earnings(&symbol).await),
        FundamentalsSection::All => CommandResult::from_fetch(store.fundamentals(&symbol).await),
    }?;

    Ok((command_name(args.section), result))
}

const fn command_name(section: FundamentalsSection) -> &'static str {
    match section {
        FundamentalsSection::Overview => "fundamentals.overview",
        FundamentalsSection::Income => "fundamentals.income",
        FundamentalsSection::Balance => "fundamentals.balance",
        FundamentalsSection::Cashflow => "fundamentals.cashflow",
        FundamentalsSection::Earnings => "fundamentals.earnings",
        FundamentalsSection::All => "fundamentals.all",
    }
}
