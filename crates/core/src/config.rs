//! Configuration structures for the flowrank system.

use crate::types::Market;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Feed fetching configuration.
    pub fetch: FetchConfig,
    /// Trading-day backward search configuration.
    pub search: SearchConfig,
    /// Report output configuration.
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            search: SearchConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// HTTP fetching configuration: request headers, endpoints, and timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Accept header.
    pub accept: String,
    /// Accept-Language header.
    pub accept_language: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// TWSE base URL.
    pub twse_base_url: String,
    /// TPEx base URL.
    pub tpex_base_url: String,
    /// Referer header for TPEx requests; TPEx rejects requests without it.
    pub tpex_referer: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            accept: "application/json, text/javascript, */*; q=0.01".to_string(),
            accept_language: "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            timeout_secs: 30,
            twse_base_url: "https://www.twse.com.tw".to_string(),
            tpex_base_url: "https://www.tpex.org.tw".to_string(),
            tpex_referer: "https://www.tpex.org.tw/".to_string(),
        }
    }
}

impl FetchConfig {
    /// Base URL for a market's endpoints.
    pub fn base_url(&self, market: Market) -> &str {
        match market {
            Market::Twse => &self.twse_base_url,
            Market::Tpex => &self.tpex_base_url,
        }
    }

    /// Referer header for a market's requests, if any.
    pub fn referer(&self, market: Market) -> Option<&str> {
        match market {
            Market::Twse => None,
            Market::Tpex => Some(&self.tpex_referer),
        }
    }
}

/// Backward search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of calendar days to walk back from the start date.
    pub max_lookback_days: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_lookback_days: 10,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory where report files are written, one per date.
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.max_lookback_days, 10);
        assert!(config.fetch.twse_base_url.starts_with("https://"));
    }

    #[test]
    fn test_referer_per_market() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.referer(Market::Twse), None);
        assert_eq!(fetch.referer(Market::Tpex), Some("https://www.tpex.org.tw/"));
    }
}
