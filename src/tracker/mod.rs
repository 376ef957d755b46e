//! Configuration-driven pipeline: fetch -> recency filter -> aggregate

use chrono::{Local, NaiveDate, TimeZone};
use log::info;

use crate::analytics::{aggregate, filter_recent_in, AggregateResult};
use crate::config::TrackerConfig;
use crate::errors::Result;
use crate::exchange::MarginExchange;
use crate::fetcher::{fetch_trades_with_progress, SkippedSymbols};
use crate::models::{MarginAccount, Trade};
use crate::window::{DateWindow, WindowMode};

/// Everything one analysis request produces.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub mode: WindowMode,
    pub window: DateWindow,
    /// Trades in the window, newest first
    pub recent_trades: Vec<Trade>,
    pub aggregate: AggregateResult,
    pub skipped: SkippedSymbols,
}

pub struct Tracker<E: MarginExchange> {
    exchange: E,
    mode: WindowMode,
    quote_asset: String,
    held_assets_only: bool,
}

impl<E: MarginExchange> Tracker<E> {
    pub fn new(exchange: E, mode: WindowMode) -> Self {
        Self::with_config(exchange, &TrackerConfig {
            mode,
            ..TrackerConfig::default()
        })
    }

    pub fn with_config(exchange: E, config: &TrackerConfig) -> Self {
        Self {
            exchange,
            mode: config.mode,
            quote_asset: config.quote_asset.trim().to_uppercase(),
            held_assets_only: config.held_assets_only,
        }
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WindowMode) {
        info!("Window mode: {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    /// Switch to the mode named by `tag`; an unknown tag leaves the current mode in place.
    pub fn change_mode(&mut self, tag: &str) -> Result<WindowMode> {
        let mode = tag.parse::<WindowMode>()?;
        self.set_mode(mode);
        Ok(mode)
    }

    pub fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    pub fn margin_account(&self) -> Result<MarginAccount> {
        self.exchange.margin_account()
    }

    /// Run the pipeline against the local clock and time zone.
    pub fn analyze<F>(&self, on_progress: F) -> Result<AnalysisRun>
    where
        F: FnMut(usize, usize, &str),
    {
        self.analyze_with_progress(Local::now().date_naive(), &Local, on_progress)
    }

    pub fn analyze_at<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> Result<AnalysisRun> {
        self.analyze_with_progress(today, tz, |_, _, _| {})
    }

    /// Fetch, filter and aggregate; `on_progress(done, total, asset)` follows the fetch pass.
    ///
    /// Only the margin account lookup can fail the run; per-symbol failures
    /// end up in [`AnalysisRun::skipped`].
    pub fn analyze_with_progress<Tz, F>(
        &self,
        today: NaiveDate,
        tz: &Tz,
        on_progress: F,
    ) -> Result<AnalysisRun>
    where
        Tz: TimeZone,
        F: FnMut(usize, usize, &str),
    {
        let account = self.exchange.margin_account()?;
        let assets = account.asset_symbols(self.held_assets_only);

        let outcome = fetch_trades_with_progress(&self.exchange, &assets, &self.quote_asset, on_progress);

        let window = DateWindow::resolve(self.mode, today);
        let mut recent_trades = filter_recent_in(&outcome.trades, &window, tz);
        let aggregate = aggregate(&recent_trades);
        recent_trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        info!(
            "{} analysis: {} of {} trades in window, {} skipped",
            self.mode,
            recent_trades.len(),
            outcome.trades.len(),
            outcome.skipped.len()
        );

        Ok(AnalysisRun {
            mode: self.mode,
            window,
            recent_trades,
            aggregate,
            skipped: outcome.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TrackerError;
    use crate::models::MarginAsset;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct StaticExchange {
        account: MarginAccount,
        trades: Vec<Trade>,
    }

    impl MarginExchange for StaticExchange {
        fn margin_account(&self) -> Result<MarginAccount> {
            Ok(self.account.clone())
        }

        fn margin_trades(&self, pair: &str) -> Result<Vec<Trade>> {
            let trades: Vec<Trade> = self.trades.iter().filter(|t| t.symbol == pair).cloned().collect();
            if trades.is_empty() {
                Err(TrackerError::Api {
                    status: 400,
                    message: "Invalid symbol.".to_string(),
                })
            } else {
                Ok(trades)
            }
        }
    }

    fn asset(name: &str, free: Decimal) -> MarginAsset {
        MarginAsset {
            asset: name.to_string(),
            free,
            locked: Decimal::ZERO,
            borrowed: Decimal::ZERO,
            net_asset: free,
        }
    }

    fn ms(date: NaiveDate, hour: u32) -> i64 {
        date.and_hms_opt(hour, 0, 0).unwrap().and_utc().timestamp_millis()
    }

    #[test]
    fn test_mode_drives_window() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let exchange = StaticExchange {
            account: MarginAccount {
                user_assets: vec![asset("BTC", dec!(1))],
            },
            trades: vec![
                Trade::new("BTCUSDT", dec!(100), dec!(1), ms(yesterday, 9)),
                Trade::new("BTCUSDT", dec!(120), dec!(1), ms(today, 9)),
                Trade::new("BTCUSDT", dec!(130), dec!(1), ms(today, 10)),
            ],
        };

        let mut tracker = Tracker::new(exchange, WindowMode::Day);
        let run = tracker.analyze_at(today, &Utc).unwrap();
        assert_eq!(run.recent_trades.len(), 2);
        assert_eq!(run.aggregate.total_profit_loss, dec!(10));

        tracker.set_mode(WindowMode::Week);
        let run = tracker.analyze_at(today, &Utc).unwrap();
        assert_eq!(run.mode, WindowMode::Week);
        assert_eq!(run.recent_trades.len(), 3);
        assert_eq!(run.aggregate.total_profit_loss, dec!(30));
        // newest first for display
        assert_eq!(run.recent_trades[0].price, dec!(130));
    }

    #[test]
    fn test_unknown_mode_tag_keeps_current_mode() {
        let exchange = StaticExchange {
            account: MarginAccount::default(),
            trades: Vec::new(),
        };
        let mut tracker = Tracker::new(exchange, WindowMode::Week);

        let err = tracker.change_mode("fortnight").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfiguration(_)));
        assert_eq!(tracker.mode(), WindowMode::Week);

        assert_eq!(tracker.change_mode(" LMONTH ").unwrap(), WindowMode::LastMonth);
        assert_eq!(tracker.mode(), WindowMode::LastMonth);
    }

    #[test]
    fn test_analyze_uses_local_calendar() {
        let exchange = StaticExchange {
            account: MarginAccount {
                user_assets: vec![asset("ETH", dec!(2))],
            },
            trades: Vec::new(),
        };
        let config = TrackerConfig {
            quote_asset: " usdc ".to_string(),
            ..TrackerConfig::default()
        };
        let tracker = Tracker::with_config(exchange, &config);
        assert_eq!(tracker.quote_asset(), "USDC");

        let mut calls = 0;
        let run = tracker.analyze(|_, _, _| calls += 1).unwrap();
        assert_eq!(calls, 1);
        assert_eq!(run.window.len(), 1);
        assert_eq!(run.skipped.as_slice(), ["ETH".to_string()]);
    }

    #[test]
    fn test_held_assets_only_limits_requests() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let exchange = StaticExchange {
            account: MarginAccount {
                user_assets: vec![asset("BTC", dec!(1)), asset("XRP", Decimal::ZERO)],
            },
            trades: vec![Trade::new("BTCUSDT", dec!(100), dec!(1), ms(today, 1))],
        };

        let config = TrackerConfig {
            held_assets_only: true,
            ..TrackerConfig::default()
        };
        let run = Tracker::with_config(&exchange, &config).analyze_at(today, &Utc).unwrap();
        assert!(run.skipped.is_empty());

        let run = Tracker::new(&exchange, WindowMode::Day).analyze_at(today, &Utc).unwrap();
        assert_eq!(run.skipped.as_slice(), ["XRP".to_string()]);
    }
}
