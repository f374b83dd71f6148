//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ALPHA_VANTAGE_API_KEY` | `demo` |
//! | `QUOTEDECK_PROVIDER_URL` | `https://www.alphavantage.co/query` |
//! | `QUOTEDECK_API_URL` | `http://localhost:3001` |
//! | `QUOTEDECK_WS_URL` | `ws://localhost:3001` |
//! | `QUOTEDECK_TIMEOUT_MS` | `10000` |
//! | `QUOTEDECK_UNTRACKED_POLICY` | `ignore` |

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gateway::DEFAULT_PROVIDER_URL;
use crate::ValidationError;

pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
pub const PROVIDER_URL_VAR: &str = "QUOTEDECK_PROVIDER_URL";
pub const API_URL_VAR: &str = "QUOTEDECK_API_URL";
pub const WS_URL_VAR: &str = "QUOTEDECK_WS_URL";
pub const TIMEOUT_VAR: &str = "QUOTEDECK_TIMEOUT_MS";
pub const UNTRACKED_POLICY_VAR: &str = "QUOTEDECK_UNTRACKED_POLICY";

const DEFAULT_API_KEY: &str = "demo";
const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_WS_URL: &str = "ws://localhost:3001";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const LIVE_PATH: &str = "/ws/stocks";

/// What the store does with a live push for a symbol it does not track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UntrackedPolicy {
    /// Drop the push.
    #[default]
    Ignore,
    /// Append the quote to the tracked collection.
    Append,
}

impl UntrackedPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Append => "append",
        }
    }
}

impl Display for UntrackedPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UntrackedPolicy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "append" => Ok(Self::Append),
            other => Err(ValidationError::InvalidUntrackedPolicy {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_key: String,
    /// Alpha Vantage query endpoint.
    pub provider_url: String,
    /// Dashboard backend base URL (watchlist and account routes).
    pub api_url: String,
    /// Streaming base URL; the live path is appended by [`Self::live_url`].
    pub ws_url: String,
    pub timeout_ms: u64,
    pub untracked_policy: UntrackedPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_key: String::from(DEFAULT_API_KEY),
            provider_url: String::from(DEFAULT_PROVIDER_URL),
            api_url: String::from(DEFAULT_API_URL),
            ws_url: String::from(DEFAULT_WS_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            untracked_policy: UntrackedPolicy::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(api_key) = read(API_KEY_VAR) {
            config.api_key = api_key;
        }
        if let Some(url) = read(PROVIDER_URL_VAR) {
            config.provider_url = url;
        }
        if let Some(url) = read(API_URL_VAR) {
            config.api_url = trim_trailing_slash(url);
        }
        if let Some(url) = read(WS_URL_VAR) {
            config.ws_url = trim_trailing_slash(url);
        }
        if let Some(raw) = read(TIMEOUT_VAR) {
            config.timeout_ms = parse_timeout(&raw)?;
        }
        if let Some(raw) = read(UNTRACKED_POLICY_VAR) {
            config.untracked_policy = raw.parse()?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_provider_url(mut self, url: impl Into<String>) -> Self {
        self.provider_url = url.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_trailing_slash(url.into());
        self
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = trim_trailing_slash(url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_untracked_policy(mut self, policy: UntrackedPolicy) -> Self {
        self.untracked_policy = policy;
        self
    }

    /// True when no key was configured and the provider's public demo key is
    /// in use.
    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Streaming endpoint for quote pushes.
    pub fn live_url(&self) -> String {
        format!("{}{LIVE_PATH}", self.ws_url)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ValidationError> {
    raw.parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ValidationError::InvalidConfigValue {
            name: TIMEOUT_VAR,
            value: raw.to_owned(),
        })
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
