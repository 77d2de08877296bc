//! Feed retrieval and normalization for the flowrank system.
//!
//! This crate handles:
//! - HTTP client construction and JSON retrieval
//! - Extraction of loosely-structured feed payloads into uniform tables
//! - Header-based column resolution with ordered fallback matchers
//! - Per-market feed endpoints and vocabulary
//! - Trading-day validation and backward session search
//! - Concurrent fetching of both feeds for both markets

pub mod client;
pub mod fetcher;
pub mod markets;
pub mod resolver;
pub mod search;
pub mod table;
pub mod validator;

pub use client::build_client;
pub use fetcher::{fetch_all, fetch_market, MarketFeeds};
pub use markets::{FlowIndexMap, MarketSpec, PriceIndexMap};
pub use resolver::{FieldMatcher, FieldSpec};
pub use search::{find_session, DaySearch};
pub use table::{RawTable, TableLocator};
pub use validator::is_trading_day;
