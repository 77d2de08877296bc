//! Concurrent feed retrieval.
//!
//! The two feeds within one market are independent, and so are the two
//! markets, so both levels fan out with `tokio::join!` and total latency is
//! bounded by roughly one round trip instead of four. Each task owns its
//! own result; the caller joins them after both complete.

use crate::client::get_json;
use crate::markets::MarketSpec;
use crate::table::{RawTable, TableLocator};
use chrono::NaiveDate;
use flowrank_core::config::FetchConfig;
use flowrank_core::Market;
use reqwest::Client;
use tracing::{debug, warn};

/// Raw feed pair for one market. Either table may be empty when its fetch
/// failed; partial results are acceptable.
#[derive(Debug, Clone)]
pub struct MarketFeeds {
    pub market: Market,
    /// Institutional net-flow table.
    pub flow: RawTable,
    /// Closing price/volume table.
    pub prices: RawTable,
}

/// Fetch one feed, absorbing any failure into an empty table so a broken
/// feed never takes down its siblings.
async fn fetch_table(
    client: &Client,
    url: &str,
    referer: Option<&str>,
    locator: TableLocator,
    market: Market,
    feed_name: &str,
) -> RawTable {
    let result = match get_json(client, url, referer).await {
        Ok(body) => locator.extract(&body),
        Err(e) => Err(e),
    };
    match result {
        Ok(table) => {
            debug!(
                "{} {} feed: {} columns, {} rows",
                market.label(),
                feed_name,
                table.fields.len(),
                table.rows.len()
            );
            table
        }
        Err(e) => {
            warn!("{} {} feed unusable: {}", market.label(), feed_name, e);
            RawTable::empty()
        }
    }
}

/// Fetch the flow and price feeds for one market concurrently.
pub async fn fetch_market(
    client: &Client,
    config: &FetchConfig,
    market: Market,
    date: NaiveDate,
) -> MarketFeeds {
    let spec = MarketSpec::for_market(market);
    let referer = config.referer(market);

    let flow_url = spec.flow_url(config, date);
    let price_url = spec.price_url(config, date);
    let (flow, prices) = tokio::join!(
        fetch_table(
            client,
            &flow_url,
            referer,
            spec.flow_locator,
            market,
            "flow",
        ),
        fetch_table(
            client,
            &price_url,
            referer,
            spec.price_locator,
            market,
            "price",
        ),
    );

    MarketFeeds {
        market,
        flow,
        prices,
    }
}

/// Fetch both markets' feed pairs in parallel.
pub async fn fetch_all(client: &Client, config: &FetchConfig, date: NaiveDate) -> Vec<MarketFeeds> {
    let (twse, tpex) = tokio::join!(
        fetch_market(client, config, Market::Twse, date),
        fetch_market(client, config, Market::Tpex, date),
    );
    vec![twse, tpex]
}
