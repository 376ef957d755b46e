//! Per-asset trade history retrieval with partial-failure accounting

use log::{debug, info, warn};

use crate::errors::TrackerError;
use crate::exchange::MarginExchange;
use crate::models::Trade;

pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Assets whose history could not be retrieved during one fetch pass.
///
/// Insertion order is kept and repeated symbols are recorded once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkippedSymbols {
    symbols: Vec<String>,
}

impl SkippedSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        if !self.symbols.contains(&symbol) {
            self.symbols.push(symbol);
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }
}

/// Trades gathered in one pass together with the assets that failed.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub trades: Vec<Trade>,
    pub skipped: SkippedSymbols,
}

/// Pair name requested for an asset, e.g. `BTC` + `USDT` -> `BTCUSDT`.
pub fn trading_pair(asset: &str, quote: &str) -> String {
    format!("{}{}", asset.trim().to_uppercase(), quote.trim().to_uppercase())
}

/// Fetch margin trades for every asset against `quote`.
///
/// A failing asset is recorded in [`FetchOutcome::skipped`] and the pass
/// moves on; no fetch error ends the run.
pub fn fetch_trades<E: MarginExchange + ?Sized>(
    exchange: &E,
    assets: &[String],
    quote: &str,
) -> FetchOutcome {
    fetch_trades_with_progress(exchange, assets, quote, |_, _, _| {})
}

/// Like [`fetch_trades`], calling `on_progress(done, total, asset)` after each asset.
pub fn fetch_trades_with_progress<E, F>(
    exchange: &E,
    assets: &[String],
    quote: &str,
    mut on_progress: F,
) -> FetchOutcome
where
    E: MarginExchange + ?Sized,
    F: FnMut(usize, usize, &str),
{
    let mut outcome = FetchOutcome::default();
    let total = assets.len();

    info!("Fetching cross trades for {} assets against {}", total, quote);

    for (index, asset) in assets.iter().enumerate() {
        let asset = asset.trim();
        if asset.is_empty() {
            on_progress(index + 1, total, asset);
            continue;
        }
        if asset.eq_ignore_ascii_case(quote) {
            debug!("Skipping {}: it is the quote asset", asset);
            on_progress(index + 1, total, asset);
            continue;
        }

        let pair = trading_pair(asset, quote);
        match exchange.margin_trades(&pair) {
            Ok(trades) => {
                debug!("{}: {} trades", pair, trades.len());
                outcome.trades.extend(trades);
            }
            Err(e) => {
                let failure = TrackerError::FetchFailure {
                    symbol: pair,
                    reason: e.to_string(),
                };
                warn!("Skipping {}: {}", asset, failure);
                outcome.skipped.push(asset);
            }
        }

        on_progress(index + 1, total, asset);
    }

    info!(
        "Fetched {} trades, {} symbols skipped",
        outcome.trades.len(),
        outcome.skipped.len()
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use crate::models::MarginAccount;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    struct ScriptedExchange {
        requested: RefCell<Vec<String>>,
    }

    impl MarginExchange for ScriptedExchange {
        fn margin_account(&self) -> Result<MarginAccount> {
            Ok(MarginAccount::default())
        }

        fn margin_trades(&self, pair: &str) -> Result<Vec<Trade>> {
            self.requested.borrow_mut().push(pair.to_string());
            match pair {
                "BTCUSDT" => Ok(vec![
                    Trade::new("BTCUSDT", dec!(100), dec!(1), 1),
                    Trade::new("BTCUSDT", dec!(110), dec!(1), 2),
                ]),
                "SOLUSDT" => Ok(Vec::new()),
                _ => Err(TrackerError::Api {
                    status: 400,
                    message: "Invalid symbol.".to_string(),
                }),
            }
        }
    }

    fn exchange() -> ScriptedExchange {
        ScriptedExchange {
            requested: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_failures_are_recorded_not_fatal() {
        let exchange = exchange();
        let assets = vec!["BTC".to_string(), "ETH".to_string(), "SOL".to_string()];

        let outcome = fetch_trades(&exchange, &assets, "USDT");
        assert_eq!(outcome.trades.len(), 2);
        assert_eq!(outcome.skipped.as_slice(), ["ETH".to_string()]);
        assert_eq!(
            *exchange.requested.borrow(),
            vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]
        );
    }

    #[test]
    fn test_quote_asset_is_not_requested() {
        let exchange = exchange();
        let assets = vec!["USDT".to_string(), "BTC".to_string(), "  ".to_string()];

        let outcome = fetch_trades(&exchange, &assets, "USDT");
        assert!(outcome.skipped.is_empty());
        assert_eq!(*exchange.requested.borrow(), vec!["BTCUSDT"]);
    }

    #[test]
    fn test_progress_reports_every_asset() {
        let exchange = exchange();
        let assets = vec!["BTC".to_string(), "USDT".to_string(), "ETH".to_string()];
        let mut seen = Vec::new();

        fetch_trades_with_progress(&exchange, &assets, "USDT", |done, total, asset| {
            seen.push((done, total, asset.to_string()));
        });

        assert_eq!(
            seen,
            vec![
                (1, 3, "BTC".to_string()),
                (2, 3, "USDT".to_string()),
                (3, 3, "ETH".to_string()),
            ]
        );
    }

    #[test]
    fn test_skipped_symbols_ignore_duplicates() {
        let mut skipped = SkippedSymbols::new();
        skipped.push("ETH");
        skipped.push("XRP");
        skipped.push("ETH");
        assert_eq!(skipped.len(), 2);
        assert!(skipped.contains("XRP"));
    }

    #[test]
    fn test_trading_pair() {
        assert_eq!(trading_pair("btc", "usdt"), "BTCUSDT");
    }
}
