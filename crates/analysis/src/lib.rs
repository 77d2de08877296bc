//! Reconciliation, ranking, and classification for the flowrank system.
//!
//! This crate handles:
//! - Price-map construction with the VWAP fallback chain
//! - Joining institutional-flow rows with price rows by security code
//! - The four ranked lists and three pattern sets
//! - Per-code highlight classification
//! - The per-day analysis aggregate

pub mod classify;
pub mod daily;
pub mod rank;
pub mod reconcile;

pub use classify::classify_records;
pub use daily::DailyAnalysis;
pub use rank::{MarketQuadrants, Rankings, TOP_N};
pub use reconcile::{build_price_map, reconcile_market, PriceQuote};
