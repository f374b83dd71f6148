//! Client for the dashboard backend: watchlist, prediction and account routes.
//!
//! The watchlist and profile routes require the bearer token returned by
//! login or registration.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::gateway::FetchError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse};
use crate::{DashboardConfig, Prediction, Quote, Symbol, ValidationError};

const WATCHLIST_PATH: &str = "/api/watchlist";
const LOGIN_PATH: &str = "/api/users/login";
const REGISTER_PATH: &str = "/api/users/register";
const PROFILE_PATH: &str = "/api/users/profile";
const PREDICTIONS_PATH: &str = "/api/predictions";

/// Account as returned by the backend. Fields other than `email` are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authenticated backend session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    /// Session for a token obtained elsewhere.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: None,
        }
    }

    fn auth(&self) -> HttpAuth {
        HttpAuth::BearerToken(self.token.clone())
    }
}

/// Login or registration form, validated before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: password.to_owned(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Accepts `local@domain.tld`: no whitespace, exactly one `@`, and a dot
/// inside the domain.
pub fn validate_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim();
    let invalid = || ValidationError::InvalidEmail {
        value: email.to_owned(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let interior_dot = domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len());
    if !interior_dot {
        return Err(invalid());
    }

    Ok(email.to_owned())
}

#[derive(Clone)]
pub struct BackendClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl BackendClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            timeout_ms: None,
        }
    }

    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &DashboardConfig) -> Self {
        Self::new(http_client, config.api_url.clone()).with_timeout_ms(Some(config.timeout_ms))
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Fetches the signed-in user's watchlist.
    pub async fn watchlist(&self, session: &Session) -> Result<Vec<Quote>, FetchError> {
        let request = HttpRequest::get(self.url(WATCHLIST_PATH)).with_auth(&session.auth());
        let response = self.send(request, WATCHLIST_PATH).await?;
        decode(&response, WATCHLIST_PATH)
    }

    /// Fetches the price prediction for `symbol`. The route needs no session.
    pub async fn prediction(&self, symbol: &Symbol) -> Result<Prediction, FetchError> {
        let path = format!("{PREDICTIONS_PATH}/{}", urlencoding::encode(symbol.as_str()));
        let response = self.send(HttpRequest::get(self.url(&path)), &path).await?;
        decode(&response, &path)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, FetchError> {
        self.authenticate(LOGIN_PATH, credentials).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<Session, FetchError> {
        self.authenticate(REGISTER_PATH, credentials).await
    }

    pub async fn update_profile(&self, session: &Session, email: &str) -> Result<User, FetchError> {
        let email = validate_email(email)?;
        let request = HttpRequest::put(self.url(PROFILE_PATH))
            .with_auth(&session.auth())
            .with_json_body(json!({ "email": email }).to_string());
        let response = self.send(request, PROFILE_PATH).await?;
        decode(&response, PROFILE_PATH)
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials) -> Result<Session, FetchError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let request = HttpRequest::post(self.url(path)).with_json_body(body.to_string());
        let response = self.send(request, path).await?;
        decode(&response, path)
    }

    async fn send(&self, request: HttpRequest, path: &str) -> Result<HttpResponse, FetchError> {
        let method = request.method;
        let response = self
            .http_client
            .execute(request.with_timeout_ms(self.timeout_ms))
            .await
            .map_err(|e| FetchError::transport(format!("{path} transport error: {}", e.message())))?;
        debug!(?method, path, status = response.status, "backend responded");

        match response.status {
            401 | 403 => Err(FetchError::unauthorized(format!(
                "{path} rejected the request with status {}",
                response.status
            ))),
            _ if !response.is_success() => Err(FetchError::transport(format!(
                "{path} returned status {}",
                response.status
            ))),
            _ => Ok(response),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse, path: &str) -> Result<T, FetchError> {
    serde_json::from_str(&response.body)
        .map_err(|e| FetchError::decode(format!("{path} returned an unexpected body: {e}")))
}
