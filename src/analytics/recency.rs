//! Selection of trades that fall inside a date window

use chrono::{Local, TimeZone};

use crate::models::Trade;
use crate::window::DateWindow;

/// Trades whose local calendar date lies in `window`, in input order.
pub fn filter_recent(trades: &[Trade], window: &DateWindow) -> Vec<Trade> {
    filter_recent_in(trades, window, &Local)
}

/// Same as [`filter_recent`] with the date conversion pinned to `tz`.
pub fn filter_recent_in<Tz: TimeZone>(trades: &[Trade], window: &DateWindow, tz: &Tz) -> Vec<Trade> {
    trades
        .iter()
        .filter(|trade| {
            trade
                .date_in(tz)
                .map(|date| window.contains(&date))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowMode;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    const DAY_MS: i64 = 86_400_000;

    fn midday_ms(date: NaiveDate) -> i64 {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp_millis()
    }

    #[test]
    fn test_filter_keeps_only_window_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let window = DateWindow::resolve(WindowMode::Week, today);
        let now = midday_ms(today);

        let trades: Vec<Trade> = (0..10)
            .map(|days_back| Trade::new("BTCUSDT", dec!(100), dec!(1), now - days_back * DAY_MS))
            .collect();

        let recent = filter_recent_in(&trades, &window, &Utc);
        assert_eq!(recent.len(), 7);
        assert_eq!(recent, trades[..7].to_vec());

        for trade in &trades {
            let inside = window.contains(&trade.date_in(&Utc).unwrap());
            assert_eq!(recent.contains(trade), inside);
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let window = DateWindow::resolve(WindowMode::Day, today);
        let now = midday_ms(today);

        let trades = vec![
            Trade::new("ETHUSDT", dec!(2), dec!(1), now + 1_000),
            Trade::new("BTCUSDT", dec!(1), dec!(1), now - 3 * DAY_MS),
            Trade::new("BTCUSDT", dec!(3), dec!(1), now - 1_000),
        ];

        let recent = filter_recent_in(&trades, &window, &Utc);
        assert_eq!(recent, vec![trades[0].clone(), trades[2].clone()]);
    }

    #[test]
    fn test_filter_drops_unrepresentable_timestamps() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let window = DateWindow::resolve(WindowMode::Day, today);
        let trades = vec![Trade::new("BTCUSDT", dec!(1), dec!(1), i64::MAX)];

        assert!(filter_recent_in(&trades, &window, &Utc).is_empty());
    }
}
