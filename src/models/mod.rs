use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single margin fill as returned by the exchange.
///
/// Only the fields the analytics need are kept; the rest of the payload
/// (order id, commission, maker flag, ...) is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub price: Decimal,
    #[serde(rename = "qty")]
    pub quantity: Decimal,
    /// Milliseconds since the Unix epoch
    #[serde(rename = "time")]
    pub timestamp: i64,
}

impl Trade {
    pub fn new(symbol: impl Into<String>, price: Decimal, quantity: Decimal, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
            timestamp,
        }
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Calendar date of the fill in the given time zone.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.executed_at()
            .map(|ts| ts.with_timezone(tz).date_naive())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginAsset {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
    #[serde(default)]
    pub borrowed: Decimal,
    #[serde(default, rename = "netAsset")]
    pub net_asset: Decimal,
}

impl MarginAsset {
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }

    pub fn is_held(&self) -> bool {
        !self.total().is_zero()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginAccount {
    #[serde(rename = "userAssets", default)]
    pub user_assets: Vec<MarginAsset>,
}

impl MarginAccount {
    /// Asset tickers in account order, optionally restricted to non-zero balances.
    pub fn asset_symbols(&self, held_only: bool) -> Vec<String> {
        self.user_assets
            .iter()
            .filter(|a| !held_only || a.is_held())
            .map(|a| a.asset.clone())
            .collect()
    }
}
