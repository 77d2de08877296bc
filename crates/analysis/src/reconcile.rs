//! Joins one market's institutional-flow feed with its price feed.
//!
//! The price feed becomes a code-keyed lookup first, then each flow row is
//! matched against it. Rows are dropped eagerly: no price, zero price,
//! non-common-stock code, or an unparseable flow count all skip the row.
//! A non-numeric flow value means the row is untrustworthy, not that the
//! flow was zero.

use flowrank_core::SecurityRecord;
use flowrank_fetch::{MarketFeeds, MarketSpec, PriceIndexMap, RawTable};
use std::collections::HashMap;
use tracing::warn;

/// Closing price and session VWAP for one security.
#[derive(Debug, Clone, Copy)]
pub struct PriceQuote {
    /// Closing price; 0.0 means no usable price.
    pub close: f64,
    /// Volume-weighted average price, defaulting to `close`.
    pub vwap: f64,
}

/// Strip thousands separators and parse a decimal. Returns `None` for
/// empty or non-numeric text (the feeds print `--` on no-trade rows).
pub fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Strip separators and parse a digits-only unsigned integer.
fn parse_unsigned(text: &str) -> Option<u64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// Strip separators and parse a signed share count.
pub fn parse_shares(text: &str) -> Option<i64> {
    text.trim().replace(',', "").parse().ok()
}

/// 4-character code without a leading zero. Anything else is an ETF, fund,
/// or warrant and is excluded from the analysis.
pub fn is_common_stock(code: &str) -> bool {
    code.len() == 4 && !code.starts_with('0')
}

/// Build the code -> price quote lookup from a price feed.
///
/// VWAP precedence: value / volume when both parse as unsigned integers
/// and volume is positive; otherwise the market's average-price column if
/// present and parseable; otherwise the closing price.
pub fn build_price_map(table: &RawTable, idx: &PriceIndexMap) -> HashMap<String, PriceQuote> {
    let mut prices = HashMap::with_capacity(table.rows.len());

    for row in &table.rows {
        let Some(code) = row.get(idx.code).map(|s| s.trim()) else {
            continue;
        };
        if code.is_empty() {
            continue;
        }

        let close = row
            .get(idx.close)
            .and_then(|s| parse_decimal(s))
            .unwrap_or(0.0);

        let mut vwap = close;
        let volume = row.get(idx.volume).and_then(|s| parse_unsigned(s));
        let value = row.get(idx.value).and_then(|s| parse_unsigned(s));
        match (volume, value) {
            (Some(volume), Some(value)) if volume > 0 => {
                vwap = value as f64 / volume as f64;
            }
            _ => {
                if let Some(avg) = idx
                    .avg_price
                    .and_then(|col| row.get(col))
                    .and_then(|s| parse_decimal(s))
                {
                    vwap = avg;
                }
            }
        }

        prices.insert(code.to_string(), PriceQuote { close, vwap });
    }

    prices
}

/// Reconcile one market's feeds into security records.
///
/// A failed feed (empty table or unresolvable header) contributes nothing;
/// the sibling market is unaffected.
pub fn reconcile_market(feeds: &MarketFeeds) -> Vec<SecurityRecord> {
    let spec = MarketSpec::for_market(feeds.market);

    if feeds.flow.is_empty() {
        return Vec::new();
    }
    let flow_idx = match spec.resolve_flow(&feeds.flow.fields) {
        Ok(idx) => idx,
        Err(e) => {
            warn!("{} flow feed: {}", feeds.market.label(), e);
            return Vec::new();
        }
    };

    let prices = if feeds.prices.is_empty() {
        HashMap::new()
    } else {
        match spec.resolve_price(&feeds.prices.fields) {
            Ok(idx) => build_price_map(&feeds.prices, &idx),
            Err(e) => {
                warn!("{} price feed: {}", feeds.market.label(), e);
                HashMap::new()
            }
        }
    };

    let mut records = Vec::new();
    for row in &feeds.flow.rows {
        let Some(code) = row.get(flow_idx.code).map(|s| s.trim()) else {
            continue;
        };

        // No price information means the monetary value cannot be derived.
        let Some(quote) = prices.get(code) else {
            continue;
        };
        if quote.close == 0.0 {
            continue;
        }

        if !is_common_stock(code) {
            continue;
        }

        let Some(name) = row.get(flow_idx.name).map(|s| s.trim()) else {
            continue;
        };

        let foreign_shares = row.get(flow_idx.foreign).and_then(|s| parse_shares(s));
        let trust_shares = row.get(flow_idx.trust).and_then(|s| parse_shares(s));
        let (Some(foreign_shares), Some(trust_shares)) = (foreign_shares, trust_shares) else {
            continue;
        };

        records.push(SecurityRecord {
            market: feeds.market,
            code: code.to_string(),
            name: name.to_string(),
            close: quote.close,
            vwap: quote.vwap,
            foreign_shares,
            trust_shares,
            foreign_value: foreign_shares as f64 * quote.vwap,
            trust_value: trust_shares as f64 * quote.vwap,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flowrank_core::Market;

    fn table(fields: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            fields: fields.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn twse_price_table(rows: &[&[&str]]) -> RawTable {
        table(&["證券代號", "證券名稱", "成交股數", "成交筆數", "成交金額", "開盤價", "最高價", "最低價", "收盤價"], rows)
    }

    fn twse_flow_table(rows: &[&[&str]]) -> RawTable {
        table(
            &[
                "證券代號",
                "證券名稱",
                "外陸資買賣超股數(不含外資自營商)",
                "投信買賣超股數",
            ],
            rows,
        )
    }

    fn twse_feeds(flow: RawTable, prices: RawTable) -> MarketFeeds {
        MarketFeeds {
            market: Market::Twse,
            flow,
            prices,
        }
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("600.00"), Some(600.0));
        assert_eq!(parse_decimal("1,234.50"), Some(1234.5));
        assert_eq!(parse_decimal("--"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_parse_shares() {
        assert_eq!(parse_shares("1,000,000"), Some(1_000_000));
        assert_eq!(parse_shares("-500,000"), Some(-500_000));
        assert_eq!(parse_shares("N/A"), None);
        assert_eq!(parse_shares(""), None);
    }

    #[test]
    fn test_common_stock_filter() {
        assert!(is_common_stock("2330"));
        assert!(!is_common_stock("0050")); // ETF
        assert!(!is_common_stock("911616")); // TDR-style long code
        assert!(!is_common_stock("00878B"));
    }

    #[test]
    fn test_vwap_from_volume_and_value() {
        let prices = twse_price_table(&[&[
            "2330", "台積電", "100,000,000", "1", "60,000,000,000", "0", "0", "0", "600.00",
        ]]);
        let idx = MarketSpec::for_market(Market::Twse)
            .resolve_price(&prices.fields)
            .unwrap();
        let map = build_price_map(&prices, &idx);
        let quote = map.get("2330").unwrap();
        assert_relative_eq!(quote.close, 600.0);
        assert_relative_eq!(quote.vwap, 600.0);
    }

    #[test]
    fn test_vwap_falls_back_to_close() {
        // Zero volume and non-numeric value both leave vwap == close.
        let prices = twse_price_table(&[
            &["1101", "台泥", "0", "0", "0", "0", "0", "0", "35.50"],
            &["1102", "亞泥", "abc", "0", "xyz", "0", "0", "0", "40.00"],
        ]);
        let idx = MarketSpec::for_market(Market::Twse)
            .resolve_price(&prices.fields)
            .unwrap();
        let map = build_price_map(&prices, &idx);
        assert_relative_eq!(map.get("1101").unwrap().vwap, 35.5);
        assert_relative_eq!(map.get("1102").unwrap().vwap, 40.0);
    }

    #[test]
    fn test_vwap_avg_price_fallback_for_tpex() {
        let prices = table(
            &["代號", "名稱", "收盤", "漲跌", "開盤", "最高", "最低", "均價", "成交股數", "成交金額(仟元)"],
            &[
                // Usable volume/value: vwap = value / volume.
                &["5483", "中美晶", "100.00", "0", "0", "0", "0", "99.00", "1,000", "101,000"],
                // Zero volume: falls to the average-price column.
                &["6488", "環球晶", "400.00", "0", "0", "0", "0", "398.50", "0", "0"],
                // Nothing usable: falls to close.
                &["8069", "元太", "250.00", "0", "0", "0", "0", "--", "--", "--"],
            ],
        );
        let idx = MarketSpec::for_market(Market::Tpex)
            .resolve_price(&prices.fields)
            .unwrap();
        let map = build_price_map(&prices, &idx);
        assert_relative_eq!(map.get("5483").unwrap().vwap, 101.0);
        assert_relative_eq!(map.get("6488").unwrap().vwap, 398.5);
        assert_relative_eq!(map.get("8069").unwrap().vwap, 250.0);
    }

    #[test]
    fn test_unparseable_close_means_no_usable_price() {
        let prices = twse_price_table(&[&["2330", "台積電", "0", "0", "0", "0", "0", "0", "--"]]);
        let flow = twse_flow_table(&[&["2330", "台積電", "1,000", "1,000"]]);
        let records = reconcile_market(&twse_feeds(flow, prices));
        assert!(records.is_empty());
    }

    #[test]
    fn test_reconcile_scenario() {
        let prices = twse_price_table(&[&[
            "2330", "台積電", "100,000,000", "1", "60,000,000,000", "0", "0", "0", "600.00",
        ]]);
        let flow = twse_flow_table(&[&["2330", "台積電", "1,000,000", "-500,000"]]);
        let records = reconcile_market(&twse_feeds(flow, prices));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.code, "2330");
        assert_eq!(record.foreign_shares, 1_000_000);
        assert_eq!(record.trust_shares, -500_000);
        assert_relative_eq!(record.vwap, 600.0);
        assert_relative_eq!(record.foreign_value, 600_000_000.0);
        assert_relative_eq!(record.trust_value, -300_000_000.0);
    }

    #[test]
    fn test_etf_code_is_excluded() {
        let prices = twse_price_table(&[&[
            "0050", "元大台灣50", "1,000", "1", "150,000", "0", "0", "0", "150.00",
        ]]);
        let flow = twse_flow_table(&[&["0050", "元大台灣50", "1,000,000", "500,000"]]);
        let records = reconcile_market(&twse_feeds(flow, prices));
        assert!(records.is_empty());
    }

    #[test]
    fn test_non_numeric_flow_skips_the_row() {
        let prices = twse_price_table(&[
            &["2330", "台積電", "0", "0", "0", "0", "0", "0", "600.00"],
            &["2317", "鴻海", "0", "0", "0", "0", "0", "0", "100.00"],
        ]);
        let flow = twse_flow_table(&[
            &["2330", "台積電", "N/A", "1,000"],
            &["2317", "鴻海", "2,000", "3,000"],
        ]);
        let records = reconcile_market(&twse_feeds(flow, prices));
        // The N/A row vanishes entirely instead of appearing as zero flow.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "2317");
    }

    #[test]
    fn test_code_missing_from_price_feed_is_skipped() {
        let prices = twse_price_table(&[&["2330", "台積電", "0", "0", "0", "0", "0", "0", "600.00"]]);
        let flow = twse_flow_table(&[&["2317", "鴻海", "2,000", "3,000"]]);
        assert!(reconcile_market(&twse_feeds(flow, prices)).is_empty());
    }

    #[test]
    fn test_empty_feeds_contribute_nothing() {
        let feeds = twse_feeds(RawTable::empty(), RawTable::empty());
        assert!(reconcile_market(&feeds).is_empty());
    }

    #[test]
    fn test_unresolvable_flow_header_contributes_nothing() {
        let prices = twse_price_table(&[&["2330", "台積電", "0", "0", "0", "0", "0", "0", "600.00"]]);
        let flow = table(&["甲", "乙"], &[&["2330", "台積電"]]);
        assert!(reconcile_market(&twse_feeds(flow, prices)).is_empty());
    }
}
