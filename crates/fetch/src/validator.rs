//! Trading-day pre-check.
//!
//! The TWSE market-summary endpoint (`MI_INDEX` with `type=MS`) returns a
//! tiny payload, which makes it a cheap probe before committing to the full
//! four-feed fetch.

use crate::client::get_json;
use chrono::NaiveDate;
use flowrank_core::config::FetchConfig;
use flowrank_core::Market;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Whether the exchange reports trade data for the date.
///
/// True iff the summary response carries `stat == "OK"`. A transport error,
/// a malformed body, or any other status value reads as "not a trading
/// day"; an ordinary closed-market response is never an error.
pub async fn is_trading_day(client: &Client, config: &FetchConfig, date: NaiveDate) -> bool {
    let url = format!(
        "{}/exchangeReport/MI_INDEX?response=json&date={}&type=MS",
        config.base_url(Market::Twse),
        date.format("%Y%m%d")
    );

    match get_json(client, &url, None).await {
        Ok(body) => body.get("stat").and_then(Value::as_str) == Some("OK"),
        Err(e) => {
            debug!("trading-day probe for {} failed: {}", date, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_reads_as_closed() {
        let config = FetchConfig {
            twse_base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
            ..FetchConfig::default()
        };
        let client = crate::client::build_client(&config).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        assert!(!is_trading_day(&client, &config, date).await);
    }
}
