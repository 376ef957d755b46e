//! Logging setup for the binary.
//! Levels come from RUST_LOG through env_logger.

use std::env;

/// Initialize env_logger.
///
/// RUST_LOG controls verbosity and defaults to `info`:
/// - RUST_LOG=warn - only skipped symbols and errors
/// - RUST_LOG=debug - every signed request and per-pair trade counts
/// - RUST_LOG=margin_tracker::fetcher=debug - fetch pass only
pub fn init_logging() {
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false)
        .init();

    log::debug!("Logging initialized at '{}'", filter);
}
