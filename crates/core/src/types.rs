//! Core data types for the flowrank system.

use serde::{Deserialize, Serialize};

/// Exchange identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Taiwan Stock Exchange (listed market).
    Twse,
    /// Taipei Exchange (over-the-counter market).
    Tpex,
}

impl Market {
    /// Both markets, in report order.
    pub const ALL: [Market; 2] = [Market::Twse, Market::Tpex];

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Market::Twse => "TWSE",
            Market::Tpex => "TPEX",
        }
    }

    /// Sheet name used in the spreadsheet report.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Market::Twse => "上市",
            Market::Tpex => "上櫃",
        }
    }
}

/// One security's reconciled daily row: price information joined with the
/// net share flow of the two institutional investor classes.
///
/// A record exists only if the code had both a usable closing price
/// (> 0) and a parseable institutional-flow row for the date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRecord {
    /// Market the security trades on.
    pub market: Market,
    /// 4-character security code (common stock only).
    pub code: String,
    /// Security name.
    pub name: String,
    /// Closing price.
    pub close: f64,
    /// Volume-weighted average price; falls back to `close` when
    /// volume/value are unusable.
    pub vwap: f64,
    /// Net share flow of foreign institutional investors (signed).
    pub foreign_shares: i64,
    /// Net share flow of domestic investment trusts (signed).
    pub trust_shares: i64,
    /// Estimated monetary value of the foreign flow (shares x vwap).
    pub foreign_value: f64,
    /// Estimated monetary value of the trust flow (shares x vwap).
    pub trust_value: f64,
}

impl SecurityRecord {
    /// Sum of both institution values.
    #[inline]
    pub fn combined_value(&self) -> f64 {
        self.foreign_value + self.trust_value
    }

    /// Sum of absolute values; the intensity of disagreement when the two
    /// institutions trade in opposite directions.
    #[inline]
    pub fn disagreement(&self) -> f64 {
        self.foreign_value.abs() + self.trust_value.abs()
    }
}

/// Direction relationship between the two institution classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    /// Both net-flowed in the same direction.
    Aligned,
    /// The two classes net-flowed in opposite directions.
    Divergent,
    /// At least one class had exactly zero net flow.
    Neutral,
}

/// Which institution class dominates a security's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dominant {
    /// Foreign institutional investors.
    Foreign,
    /// Domestic investment trusts.
    Trust,
}

/// Highlight classification for one security, derived from the sign and
/// relative magnitude of the two share flows. Computed once per code and
/// reused by every report quadrant that shows the security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationState {
    /// Direction relationship.
    pub alignment: Alignment,
    /// Institution with the larger absolute share count; `None` when
    /// neutral. Equal counts mark the trust side dominant.
    pub dominant: Option<Dominant>,
}

impl ClassificationState {
    /// Derive the classification from the two signed share flows.
    pub fn from_shares(foreign_shares: i64, trust_shares: i64) -> Self {
        if foreign_shares == 0 || trust_shares == 0 {
            return Self {
                alignment: Alignment::Neutral,
                dominant: None,
            };
        }

        let alignment = if (foreign_shares > 0) == (trust_shares > 0) {
            Alignment::Aligned
        } else {
            Alignment::Divergent
        };
        let dominant = if foreign_shares.abs() > trust_shares.abs() {
            Dominant::Foreign
        } else {
            Dominant::Trust
        };

        Self {
            alignment,
            dominant: Some(dominant),
        }
    }

    /// Whether the security gets no highlight at all.
    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.alignment == Alignment::Neutral
    }
}
