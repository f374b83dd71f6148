use quotedeck_core::{Credentials, MarketStore, Session};

use crate::cli::{CredentialsArgs, ProfileArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn login(args: &CredentialsArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let credentials = Credentials::new(&args.email, &args.password)?;
    CommandResult::from_fetch(store.backend().login(&credentials).await)
}

pub async fn register(
    args: &CredentialsArgs,
    store: &MarketStore,
) -> Result<CommandResult, CliError> {
    let credentials = Credentials::new(&args.email, &args.password)?;
    CommandResult::from_fetch(store.backend().register(&credentials).await)
}

pub async fn profile(args: &ProfileArgs, store: &MarketStore) -> Result<CommandResult, CliError> {
    let email = quotedeck_core::validate_email(&args.email)?;
    let session = Session::from_token(args.auth.token.as_str());
    CommandResult::from_fetch(store.backend().update_profile(&session, &email).await)
}
