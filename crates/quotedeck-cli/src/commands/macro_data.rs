use quotedeck_core::{Commodity, CommodityInterval, EconomicIndicator, MarketStore};

use crate::cli::{CommodityArgs, EconomicArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn commodity(args: &CommodityArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let commodity = args.name.parse::<Commodity>()?;
    let interval = args.interval.parse::<CommodityInterval>()?;
    CommandResult::from_fetch(store.commodity(commodity, interval).await)
}

pub async fn economic(args: &EconomicArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let indicator = args.name.parse::<EconomicIndicator>()?;
    CommandResult::from_fetch(store.economic(indicator).await)
}
