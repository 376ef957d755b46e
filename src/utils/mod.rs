#[cfg(feature = "binance_exec")]
pub mod logging;
