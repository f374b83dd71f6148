use quotedeck_core::{MarketStore, ValidationError};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &SearchArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let keywords = args.keywords.trim();
    if keywords.is_empty() {
        return Err(ValidationError::EmptyKeywords.into());
    }

    CommandResult::from_fetch(store.search(keywords).await)
}
