mod account;
mod currency;
mod fundamentals;
mod macro_data;
mod quote;
mod report;
mod search;
mod series;
mod technical;
mod watch;
mod watchlist;

use std::sync::Arc;

use quotedeck_core::{
    AlphaVantageGateway, BackendClient, DashboardConfig, Envelope, EnvelopeError, EnvelopeMeta,
    FetchError, HttpClient, MarketStore, ReqwestHttpClient, UtcDateTime, ValidationError,
    WebSocketConnector,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Successful payload, or a null payload carrying the fetch error.
    pub fn from_fetch<T: Serialize>(result: Result<T, FetchError>) -> Result<Self, CliError> {
        match result {
            Ok(value) => Ok(Self::ok(serde_json::to_value(value)?)),
            Err(error) => Ok(Self::ok(Value::Null).with_errors(vec![EnvelopeError::from(&error)])),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Configuration plus the store every command runs against.
pub struct Context {
    pub config: DashboardConfig,
    pub store: MarketStore,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = DashboardConfig::from_env()?;
        if let Some(timeout_ms) = cli.timeout_ms {
            if timeout_ms == 0 {
                return Err(ValidationError::InvalidConfigValue {
                    name: "--timeout-ms",
                    value: timeout_ms.to_string(),
                }
                .into());
            }
            config = config.with_timeout_ms(timeout_ms);
        }
        if let Some(policy) = &cli.untracked {
            config = config.with_untracked_policy(policy.parse()?);
        }

        let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
        let gateway = AlphaVantageGateway::from_config(Arc::clone(&http_client), &config);
        let backend = BackendClient::from_config(http_client, &config);
        let store = MarketStore::new(
            gateway,
            backend,
            Arc::new(WebSocketConnector),
            config.live_url(),
        )
        .with_untracked_policy(config.untracked_policy);

        Ok(Self { config, store })
    }
}

/// Runs the selected command. `watch` streams its own output and yields no
/// envelope.
pub async fn run(cli: &Cli) -> Result<Option<Envelope<Value>>, CliError> {
    let context = Context::from_cli(cli)?;

    let started = UtcDateTime::now();
    let outcome = dispatch(&cli.command, &context).await;
    context.store.shutdown().await;
    let Some((command, result)) = outcome? else {
        return Ok(None);
    };

    let CommandResult {
        data,
        mut warnings,
        errors,
    } = result;

    if context.config.uses_demo_key() && uses_provider(&cli.command) {
        warnings.push(String::from(
            "ALPHA_VANTAGE_API_KEY is not set; using the demo key, which serves sample symbols only",
        ));
    }

    let latency_ms = UtcDateTime::now().millis_since(started);
    debug!(command, latency_ms, errors = errors.len(), "command finished");

    let meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), command, latency_ms)?
        .with_warnings(warnings);
    Envelope::with_errors(meta, data, errors)
        .map(Some)
        .map_err(CliError::from)
}

async fn dispatch(
    command: &Command,
    context: &Context,
) -> Result<Option<(&'static str, CommandResult)>, CliError> {
    let store = &context.store;
    let outcome = match command {
        Command::Quote(args) => ("quote", quote::run(args, store).await?),
        Command::Historical(args) => ("historical", series::historical(args, store).await?),
        Command::Intraday(args) => ("intraday", series::intraday(args, store).await?),
        Command::Options(args) => ("options", series::options(args, store).await?),
        Command::Fundamentals(args) => fundamentals::run(args, store).await?,
        Command::Forex(args) => ("forex", currency::forex(args, store).await?),
        Command::Crypto(args) => ("crypto", currency::crypto(args, store).await?),
        Command::Commodity(args) => ("commodity", macro_data::commodity(args, store).await?),
        Command::Economic(args) => ("economic", macro_data::economic(args, store).await?),
        Command::Technical(args) => ("technical", technical::run(args, store).await?),
        Command::Search(args) => ("search", search::run(args, store).await?),
        Command::Report(args) => ("report", report::run(args, store).await?),
        Command::Prediction(args) => ("prediction", report::prediction(args, store).await?),
        Command::Watchlist(args) => ("watchlist", watchlist::run(args, store).await?),
        Command::Login(args) => ("login", account::login(args, store).await?),
        Command::Register(args) => ("register", account::register(args, store).await?),
        Command::Profile(args) => ("profile", account::profile(args, store).await?),
        Command::Watch(args) => {
            watch::run(args, store).await?;
            return Ok(None);
        }
    };
    Ok(Some(outcome))
}

fn uses_provider(command: &Command) -> bool {
    !matches!(
        command,
        Command::Prediction(_)
            | Command::Watchlist(_)
            | Command::Login(_)
            | Command::Register(_)
            | Command::Profile(_)
    )
}
