//! CLI argument definitions for quotedeck.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Track symbols and print their quotes |
//! | `historical` / `intraday` | Price series |
//! | `options` | Option chain |
//! | `fundamentals` | Company overview and statements |
//! | `forex` / `crypto` | Exchange rate and digital currency series |
//! | `commodity` / `economic` | Commodity and macro series |
//! | `technical` | Technical indicator series |
//! | `search` | Symbol search |
//! | `report` | Quote, history and overview in one call |
//! | `prediction` | Backend price prediction |
//! | `watchlist` | Signed-in user's watchlist |
//! | `watch` | Stream live store snapshots as NDJSON |
//! | `login` / `register` / `profile` | Account actions |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--timeout-ms` | `QUOTEDECK_TIMEOUT_MS` | Request timeout in ms |
//! | `--untracked` | `QUOTEDECK_UNTRACKED_POLICY` | Live pushes for untracked symbols |
//! | `-v` | | Raise log verbosity (repeatable) |

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Market dashboard data from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "quotedeck",
    author,
    version,
    about = "Market dashboard data from the command line",
    long_about = "quotedeck fetches quotes, series, fundamentals and macro data from \
Alpha Vantage, loads your dashboard watchlist and follows live quote pushes.\n\
\n\
Configuration is read from ALPHA_VANTAGE_API_KEY and the QUOTEDECK_* \
environment variables; flags override them."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// What to do with live pushes for symbols that are not tracked.
    #[arg(long, global = true, value_name = "ignore|append")]
    pub untracked: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable layout.
    Table,
    /// Single JSON object.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Track one or more symbols and print their latest quotes.
    ///
    ///   quotedeck quote AAPL MSFT
    Quote(QuoteArgs),

    /// Daily price history.
    ///
    ///   quotedeck historical IBM --outputsize full
    Historical(HistoricalArgs),

    /// Intraday bars.
    ///
    ///   quotedeck intraday IBM --interval 5min
    Intraday(IntradayArgs),

    /// Realtime option chain.
    Options(SymbolArgs),

    /// Company overview and financial statements.
    ///
    ///   quotedeck fundamentals all IBM
    Fundamentals(FundamentalsArgs),

    /// Realtime exchange rate between two currencies.
    ///
    ///   quotedeck forex USD JPY
    Forex(ForexArgs),

    /// Daily digital currency series priced in a market currency.
    ///
    ///   quotedeck crypto BTC EUR
    Crypto(CryptoArgs),

    /// Commodity price series.
    ///
    ///   quotedeck commodity WTI --interval monthly
    Commodity(CommodityArgs),

    /// US economic indicator series.
    ///
    ///   quotedeck economic REAL_GDP
    Economic(EconomicArgs),

    /// Technical indicator series.
    ///
    ///   quotedeck technical SMA IBM --interval weekly --time-period 10
    Technical(TechnicalArgs),

    /// Search symbols by keyword.
    Search(SearchArgs),

    /// Quote, daily history and overview fetched together.
    Report(SymbolArgs),

    /// Price prediction from the dashboard backend.
    ///
    ///   quotedeck prediction AAPL
    Prediction(SymbolArgs),

    /// Load the signed-in user's watchlist.
    Watchlist(TokenArgs),

    /// Track symbols and stream store snapshots as NDJSON until the duration
    /// elapses.
    ///
    ///   quotedeck watch AAPL MSFT --duration-secs 60
    Watch(WatchArgs),

    /// Log in and print the session token.
    Login(CredentialsArgs),

    /// Create an account and print the session token.
    Register(CredentialsArgs),

    /// Change the signed-in user's email.
    Profile(ProfileArgs),
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// One or more symbols (e.g. AAPL MSFT).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct HistoricalArgs {
    pub symbol: String,

    /// compact (latest 100 points) or full.
    #[arg(long, default_value = "compact")]
    pub outputsize: String,
}

#[derive(Debug, Args)]
pub struct IntradayArgs {
    pub symbol: String,

    /// 1min, 5min, 15min, 30min or 60min.
    #[arg(long, default_value = "1min")]
    pub interval: String,

    #[arg(long, default_value = "compact")]
    pub outputsize: String,
}

#[derive(Debug, Args)]
pub struct FundamentalsArgs {
    #[arg(value_enum)]
    pub section: FundamentalsSection,

    pub symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FundamentalsSection {
    Overview,
    Income,
    Balance,
    Cashflow,
    Earnings,
    /// All of the above, fetched concurrently.
    All,
}

#[derive(Debug, Args)]
pub struct ForexArgs {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Args)]
pub struct CryptoArgs {
    pub symbol: String,

    /// Market currency prices are quoted in.
    #[arg(default_value = "USD")]
    pub market: String,
}

#[derive(Debug, Args)]
pub struct CommodityArgs {
    /// WTI, BRENT, NATURAL_GAS, COPPER, ALUMINUM, WHEAT, CORN, COTTON,
    /// SUGAR, COFFEE or ALL_COMMODITIES.
    pub name: String,

    /// daily, weekly or monthly.
    #[arg(long, default_value = "monthly")]
    pub interval: String,
}

#[derive(Debug, Args)]
pub struct EconomicArgs {
    /// REAL_GDP, REAL_GDP_PER_CAPITA, TREASURY_YIELD, FEDERAL_FUNDS_RATE,
    /// CPI, INFLATION, RETAIL_SALES, DURABLES, UNEMPLOYMENT or
    /// NONFARM_PAYROLL.
    pub name: String,
}

#[derive(Debug, Args)]
pub struct TechnicalArgs {
    /// Indicator function (SMA, EMA, RSI, ...).
    pub function: String,

    pub symbol: String,

    #[arg(long, default_value = "daily")]
    pub interval: String,

    #[arg(long, default_value_t = 20)]
    pub time_period: u32,

    /// close, open, high or low.
    #[arg(long, default_value = "close")]
    pub series_type: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub keywords: String,
}

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Bearer token from `login` or `register`.
    #[arg(long, env = "QUOTEDECK_TOKEN", hide_env_values = true)]
    pub token: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Stop after this many seconds.
    #[arg(long, default_value_t = 30)]
    pub duration_secs: u64,

    /// Also load the watchlist for this session token.
    #[arg(long, env = "QUOTEDECK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
pub struct CredentialsArgs {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// New email address.
    pub email: String,

    #[command(flatten)]
    pub auth: TokenArgs,
}
