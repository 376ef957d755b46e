use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Missing credentials: environment variable {0} is not set")]
    MissingCredentials(&'static str),

    #[error("Failed to fetch trades for {symbol}: {reason}")]
    FetchFailure { symbol: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Exchange API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(feature = "binance_exec")]
impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        TrackerError::Http(e.to_string())
    }
}
