use quotedeck_core::{
    IndicatorFunction, IndicatorInterval, MarketStore, SeriesType, Symbol, TechnicalRequest,
};

use crate::cli::TechnicalArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &TechnicalArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let request = TechnicalRequest::new(
        IndicatorFunction::parse(&args.function)?,
        Symbol::parse(&args.symbol)?,
    )
    .with_interval(args.interval.parse::<IndicatorInterval>()?)
    .with_time_period(args.time_period)?
    .with_series_type(args.series_type.parse::<SeriesType>()?);

    CommandResult::from_fetch(store.technical(&request).await)
}
