//! Trade analytics - recency selection and pairwise P&L

pub mod aggregator;
pub mod recency;

pub use aggregator::*;
pub use recency::*;
