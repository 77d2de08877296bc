//! Per-day analysis aggregate.

use crate::rank::Rankings;
use crate::reconcile::reconcile_market;
use chrono::NaiveDate;
use flowrank_core::{Error, Result, SecurityRecord};
use flowrank_fetch::MarketFeeds;
use tracing::info;

/// Complete analysis output for one trading day: the combined record set
/// plus every ranked list and pattern set. Immutable once built.
#[derive(Debug, Clone)]
pub struct DailyAnalysis {
    /// The trading day the records describe.
    pub date: NaiveDate,
    /// Combined record set, both markets.
    pub records: Vec<SecurityRecord>,
    /// Ranked lists and pattern sets over `records`.
    pub rankings: Rankings,
}

impl DailyAnalysis {
    /// Reconcile both markets' feeds and build the rankings.
    ///
    /// Errors with [`Error::NoData`] when both markets came back empty;
    /// the caller treats that as "not a valid trading day for analysis",
    /// not as a transport failure.
    pub fn from_feeds(date: NaiveDate, feeds: &[MarketFeeds]) -> Result<Self> {
        let records: Vec<SecurityRecord> = feeds.iter().flat_map(|f| reconcile_market(f)).collect();
        Self::from_records(date, records)
    }

    /// Build from already-reconciled records.
    pub fn from_records(date: NaiveDate, records: Vec<SecurityRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::NoData(date.to_string()));
        }
        info!("processed {} securities for {}", records.len(), date);

        let rankings = Rankings::build(&records);
        Ok(Self {
            date,
            records,
            rankings,
        })
    }
}
