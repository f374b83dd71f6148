use quotedeck_core::{MarketStore, Session};

use crate::cli::TokenArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &TokenArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let session = Session::from_token(args.token.as_str());
    let result = CommandResult::from_fetch(store.load_watchlist(&session).await)?;

    if result.errors.is_empty() && store.snapshot().watchlist.is_empty() {
        return Ok(result.with_warning("watchlist is empty"));
    }
    Ok(result)
}
