// exchange/mod.rs
#[cfg(feature = "binance_exec")]
pub mod binance;
#[cfg(feature = "binance_exec")]
pub mod utils;

#[cfg(feature = "binance_exec")]
pub use binance::{BinanceClient, Credentials};

use crate::errors::Result;
use crate::models::{MarginAccount, Trade};

/// Account and trade-history endpoints the tracker consumes.
///
/// Implementations are blocking; the tracker calls them one at a time.
pub trait MarginExchange {
    fn margin_account(&self) -> Result<MarginAccount>;

    /// Cross-margin fills for a pair such as `BTCUSDT`.
    fn margin_trades(&self, pair: &str) -> Result<Vec<Trade>>;
}

impl<E: MarginExchange + ?Sized> MarginExchange for &E {
    fn margin_account(&self) -> Result<MarginAccount> {
        (**self).margin_account()
    }

    fn margin_trades(&self, pair: &str) -> Result<Vec<Trade>> {
        (**self).margin_trades(pair)
    }
}

impl<E: MarginExchange + ?Sized> MarginExchange for Box<E> {
    fn margin_account(&self) -> Result<MarginAccount> {
        (**self).margin_account()
    }

    fn margin_trades(&self, pair: &str) -> Result<Vec<Trade>> {
        (**self).margin_trades(pair)
    }
}
