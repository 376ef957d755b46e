// =================================================================
// exchange/binance.rs - Binance cross-margin REST client
// =================================================================

use chrono::Utc;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use super::utils::{api_error_message, build_query, sign_query, validate_pair};
use super::MarginExchange;
use crate::config::TrackerConfig;
use crate::errors::{Result, TrackerError};
use crate::models::{MarginAccount, Trade};

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

const MARGIN_ACCOUNT_PATH: &str = "/sapi/v1/margin/account";
const MARGIN_TRADES_PATH: &str = "/sapi/v1/margin/myTrades";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read `BINANCE_API_KEY` / `BINANCE_API_SECRET`; both must be non-empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required_var(&lookup, API_KEY_VAR)?;
        let api_secret = required_var(&lookup, API_SECRET_VAR)?;
        Ok(Self::new(api_key, api_secret))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

fn required_var<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(TrackerError::MissingCredentials(name)),
    }
}

pub struct BinanceClient {
    client: Client,
    api_url: String,
    recv_window_ms: u64,
    credentials: Credentials,
}

impl BinanceClient {
    pub fn new(credentials: Credentials, config: &TrackerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            recv_window_ms: config.recv_window_ms,
            credentials,
        })
    }

    /// Signed GET: appends `recvWindow`, `timestamp` and `signature` to `params`.
    fn signed_get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let mut all_params = params.to_vec();
        all_params.push(("recvWindow", self.recv_window_ms.to_string()));
        all_params.push(("timestamp", Utc::now().timestamp_millis().to_string()));

        let query = build_query(&all_params);
        let signature = sign_query(&self.credentials.api_secret, &query)?;
        let url = format!("{}{}?{}&signature={}", self.api_url, path, query, signature);

        debug!("GET {}{}?{}", self.api_url, path, query);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(TrackerError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl MarginExchange for BinanceClient {
    fn margin_account(&self) -> Result<MarginAccount> {
        let account: MarginAccount = self.signed_get(MARGIN_ACCOUNT_PATH, &[])?;
        info!("Margin account loaded: {} assets", account.user_assets.len());
        Ok(account)
    }

    fn margin_trades(&self, pair: &str) -> Result<Vec<Trade>> {
        let pair = validate_pair(pair)?;
        self.signed_get(MARGIN_TRADES_PATH, &[("symbol", pair)])
    }
}
