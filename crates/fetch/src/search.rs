//! Backward search for the most recent trading session.
//!
//! The search walks one calendar day at a time from a start date, probing
//! each candidate before doing any heavy work. The iteration state is just
//! (current offset, max offset); the probe itself is injected so the loop
//! can be tested without the network.

use chrono::{Days, NaiveDate};
use std::future::Future;
use tracing::info;

/// Candidate dates for the backward search: the start date, then one day
/// earlier per step, up to the offset bound.
#[derive(Debug, Clone)]
pub struct DaySearch {
    start: NaiveDate,
    max_offset: u32,
    offset: u32,
}

impl DaySearch {
    /// Candidates from `start` back through `start - max_offset + 1` days.
    pub fn new(start: NaiveDate, max_offset: u32) -> Self {
        Self {
            start,
            max_offset,
            offset: 0,
        }
    }
}

impl Iterator for DaySearch {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.offset >= self.max_offset {
            return None;
        }
        let date = self.start.checked_sub_days(Days::new(self.offset as u64))?;
        self.offset += 1;
        Some(date)
    }
}

/// Walk back from `start`, trying one candidate date at a time, and return
/// the first date the attempt closure accepts.
///
/// The closure should return true only for a fully completed attempt; a
/// closed market or a session with no usable data returns false and the
/// search continues. Candidates are strictly sequential: the next attempt
/// starts only after the previous one finished.
pub async fn find_session<F, Fut>(
    start: NaiveDate,
    max_lookback: u32,
    mut attempt: F,
) -> Option<NaiveDate>
where
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future<Output = bool>,
{
    for date in DaySearch::new(start, max_lookback) {
        if attempt(date).await {
            return Some(date);
        }
        info!("no complete session for {}, stepping back", date);
    }
    None
}
