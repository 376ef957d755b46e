// =================================================================
// exchange/utils.rs - Request signing and symbol helpers
// =================================================================

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{Result, TrackerError};

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of the query string, as Binance expects in `signature`.
pub fn sign_query(secret: &str, query: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| TrackerError::Signing(e.to_string()))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Join parameters into `k1=v1&k2=v2` in the given order.
pub fn build_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validate a Binance pair name such as `BTCUSDT`.
pub fn validate_pair(pair: &str) -> Result<String> {
    let pair = pair.trim().to_uppercase();

    if pair.is_empty() {
        return Err(TrackerError::InvalidConfiguration(
            "Symbol cannot be empty".to_string(),
        ));
    }

    if !pair.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TrackerError::InvalidConfiguration(format!(
            "Symbol '{}' contains invalid characters",
            pair
        )));
    }

    if pair.len() > 20 {
        return Err(TrackerError::InvalidConfiguration(format!(
            "Symbol '{}' has invalid length",
            pair
        )));
    }

    Ok(pair)
}

/// Pull `msg` out of a Binance error body, falling back to the raw text.
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let msg = v.get("msg")?.as_str()?.to_string();
            Some(match v.get("code").and_then(|c| c.as_i64()) {
                Some(code) => format!("{} (code {})", msg, code),
                None => msg,
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}
