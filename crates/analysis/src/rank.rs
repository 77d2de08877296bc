//! Ranking lists and pattern sets over the record set.
//!
//! Every sort here is stable and uses no secondary key, so records with
//! equal values keep their input order.

use flowrank_core::{Market, SecurityRecord};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Top-N reporting cut for every ranked list.
pub const TOP_N: usize = 10;

/// The four ranked lists and three pattern sets for one record set.
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    /// Net foreign buys, largest value first.
    pub foreign_buy: Vec<SecurityRecord>,
    /// Net foreign sells, most negative value first.
    pub foreign_sell: Vec<SecurityRecord>,
    /// Net trust buys, largest value first.
    pub trust_buy: Vec<SecurityRecord>,
    /// Net trust sells, most negative value first.
    pub trust_sell: Vec<SecurityRecord>,
    /// Both institutions net-bought, by combined value descending.
    pub aligned_buy: Vec<SecurityRecord>,
    /// Both institutions net-sold, by combined value ascending.
    pub aligned_sell: Vec<SecurityRecord>,
    /// Foreign bought while trusts sold, by intensity of disagreement.
    pub divergent_foreign_buy: Vec<SecurityRecord>,
    /// Foreign sold while trusts bought, by intensity of disagreement.
    pub divergent_foreign_sell: Vec<SecurityRecord>,
}

impl Rankings {
    /// Build every list from the combined record set.
    pub fn build(records: &[SecurityRecord]) -> Self {
        Self {
            foreign_buy: sorted_subset(
                records,
                |r| r.foreign_value > 0.0,
                |r| Reverse(OrderedFloat(r.foreign_value)),
            ),
            foreign_sell: sorted_subset(
                records,
                |r| r.foreign_value < 0.0,
                |r| OrderedFloat(r.foreign_value),
            ),
            trust_buy: sorted_subset(
                records,
                |r| r.trust_value > 0.0,
                |r| Reverse(OrderedFloat(r.trust_value)),
            ),
            trust_sell: sorted_subset(
                records,
                |r| r.trust_value < 0.0,
                |r| OrderedFloat(r.trust_value),
            ),
            aligned_buy: sorted_subset(
                records,
                |r| r.foreign_value > 0.0 && r.trust_value > 0.0,
                |r| Reverse(OrderedFloat(r.combined_value())),
            ),
            aligned_sell: sorted_subset(
                records,
                |r| r.foreign_value < 0.0 && r.trust_value < 0.0,
                |r| OrderedFloat(r.combined_value()),
            ),
            divergent_foreign_buy: sorted_subset(
                records,
                |r| r.foreign_value > 0.0 && r.trust_value < 0.0,
                |r| Reverse(OrderedFloat(r.disagreement())),
            ),
            divergent_foreign_sell: sorted_subset(
                records,
                |r| r.foreign_value < 0.0 && r.trust_value > 0.0,
                |r| Reverse(OrderedFloat(r.disagreement())),
            ),
        }
    }

    /// The reporting cut of a ranked list.
    pub fn top(list: &[SecurityRecord]) -> &[SecurityRecord] {
        &list[..list.len().min(TOP_N)]
    }
}

/// Per-market report quadrants: the four lists restricted to one market,
/// full length, keyed by share sign. Consumed by the spreadsheet emitter.
#[derive(Debug, Clone)]
pub struct MarketQuadrants {
    pub market: Market,
    pub foreign_buy: Vec<SecurityRecord>,
    pub foreign_sell: Vec<SecurityRecord>,
    pub trust_buy: Vec<SecurityRecord>,
    pub trust_sell: Vec<SecurityRecord>,
}

impl MarketQuadrants {
    /// Build the quadrants for one market from a record set.
    pub fn build(records: &[SecurityRecord], market: Market) -> Self {
        let market_records: Vec<SecurityRecord> = records
            .iter()
            .filter(|r| r.market == market)
            .cloned()
            .collect();
        Self {
            market,
            foreign_buy: sorted_subset(
                &market_records,
                |r| r.foreign_shares > 0,
                |r| Reverse(OrderedFloat(r.foreign_value)),
            ),
            foreign_sell: sorted_subset(
                &market_records,
                |r| r.foreign_shares < 0,
                |r| OrderedFloat(r.foreign_value),
            ),
            trust_buy: sorted_subset(
                &market_records,
                |r| r.trust_shares > 0,
                |r| Reverse(OrderedFloat(r.trust_value)),
            ),
            trust_sell: sorted_subset(
                &market_records,
                |r| r.trust_shares < 0,
                |r| OrderedFloat(r.trust_value),
            ),
        }
    }

    /// Length of the longest quadrant; the sheet's data-row count.
    pub fn max_rows(&self) -> usize {
        self.foreign_buy
            .len()
            .max(self.foreign_sell.len())
            .max(self.trust_buy.len())
            .max(self.trust_sell.len())
    }
}

fn sorted_subset<F, K, S>(records: &[SecurityRecord], filter: F, key: S) -> Vec<SecurityRecord>
where
    F: Fn(&SecurityRecord) -> bool,
    K: Ord,
    S: FnMut(&SecurityRecord) -> K,
{
    let mut subset: Vec<SecurityRecord> = records.iter().filter(|r| filter(r)).cloned().collect();
    subset.sort_by_key(key);
    subset
}
