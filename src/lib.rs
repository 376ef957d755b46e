pub mod analytics;
pub mod config;
pub mod errors;
pub mod exchange;
pub mod fetcher;
pub mod models;
pub mod report;
pub mod tracker;
pub mod utils;
pub mod window;

pub use analytics::{aggregate, filter_recent, filter_recent_in, AggregateResult};
pub use config::TrackerConfig;
pub use errors::{Result, TrackerError};
pub use exchange::MarginExchange;
pub use fetcher::{fetch_trades, FetchOutcome, SkippedSymbols};
pub use models::{MarginAccount, MarginAsset, Trade};
pub use tracker::{AnalysisRun, Tracker};
pub use window::{DateWindow, WindowMode};
