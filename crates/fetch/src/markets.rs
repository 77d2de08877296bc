//! Per-market feed endpoints and header vocabulary.
//!
//! The two exchanges shape their feeds differently: different URL schemes,
//! different date calendars (TWSE uses western `YYYYMMDD`, TPEx the ROC
//! calendar), different payload nesting, and different header wording for
//! the same logical columns. All of that is configuration data here, not
//! logic.

use crate::resolver::{FieldMatcher, FieldSpec};
use crate::table::TableLocator;
use chrono::{Datelike, NaiveDate};
use flowrank_core::{config::FetchConfig, Market, Result};

/// Resolved column positions for an institutional-flow feed.
#[derive(Debug, Clone, Copy)]
pub struct FlowIndexMap {
    pub code: usize,
    pub name: usize,
    pub foreign: usize,
    pub trust: usize,
}

/// Resolved column positions for a closing-price feed.
#[derive(Debug, Clone, Copy)]
pub struct PriceIndexMap {
    pub code: usize,
    pub close: usize,
    pub volume: usize,
    pub value: usize,
    /// Secondary session-average-price column, used as a VWAP fallback
    /// when volume/value are unusable. Only TPEx publishes one.
    pub avg_price: Option<usize>,
}

/// Everything market-specific about the two feeds: endpoints, payload
/// shape, and header vocabulary.
#[derive(Debug)]
pub struct MarketSpec {
    pub market: Market,
    flow_path: &'static str,
    price_path: &'static str,
    pub flow_locator: TableLocator,
    pub price_locator: TableLocator,
    code: FieldSpec,
    name: FieldSpec,
    foreign: FieldSpec,
    trust: FieldSpec,
    price_code: FieldSpec,
    close: FieldSpec,
    volume: FieldSpec,
    value: FieldSpec,
    avg_price: Option<FieldSpec>,
}

static TWSE_SPEC: MarketSpec = MarketSpec {
    market: Market::Twse,
    flow_path: "/fund/T86?response=json&date={date}&selectType=ALL",
    price_path: "/exchangeReport/MI_INDEX?response=json&date={date}&type=ALLBUT0999",
    flow_locator: TableLocator::Flat,
    price_locator: TableLocator::TitleContains("每日收盤行情"),
    code: FieldSpec {
        name: "code",
        matchers: &[FieldMatcher::Exact("證券代號")],
    },
    name: FieldSpec {
        name: "name",
        matchers: &[FieldMatcher::Exact("證券名稱")],
    },
    foreign: FieldSpec {
        name: "foreign net",
        matchers: &[
            FieldMatcher::ContainsAll(&["外陸資買賣超股數(不含外資自營商)"]),
            FieldMatcher::ContainsAll(&["外資", "買賣超"]),
        ],
    },
    trust: FieldSpec {
        name: "trust net",
        matchers: &[
            FieldMatcher::Exact("投信買賣超股數"),
            FieldMatcher::ContainsAll(&["投信", "買賣超"]),
        ],
    },
    price_code: FieldSpec {
        name: "code",
        matchers: &[FieldMatcher::Exact("證券代號")],
    },
    close: FieldSpec {
        name: "close",
        matchers: &[
            FieldMatcher::Exact("收盤價"),
            FieldMatcher::ContainsAll(&["收盤"]),
        ],
    },
    volume: FieldSpec {
        name: "volume",
        matchers: &[FieldMatcher::Exact("成交股數")],
    },
    value: FieldSpec {
        name: "value",
        matchers: &[FieldMatcher::Exact("成交金額")],
    },
    avg_price: None,
};

static TPEX_SPEC: MarketSpec = MarketSpec {
    market: Market::Tpex,
    flow_path: "/web/stock/3insti/daily_trade/3itrade_hedge_result.php?l=zh-tw&se=EW&t=D&d={date}",
    price_path: "/web/stock/aftertrading/daily_close_quotes/stk_quote_result.php?l=zh-tw&d={date}",
    flow_locator: TableLocator::First,
    price_locator: TableLocator::First,
    code: FieldSpec {
        name: "code",
        matchers: &[
            FieldMatcher::Exact("代號"),
            FieldMatcher::ContainsAll(&["代號"]),
        ],
    },
    name: FieldSpec {
        name: "name",
        matchers: &[
            FieldMatcher::Exact("名稱"),
            FieldMatcher::ContainsAll(&["名稱"]),
        ],
    },
    foreign: FieldSpec {
        name: "foreign net",
        matchers: &[
            FieldMatcher::ContainsAll(&["不含外資自營商", "買賣超"]),
            FieldMatcher::ContainsAll(&["外資", "買賣超"]),
        ],
    },
    trust: FieldSpec {
        name: "trust net",
        matchers: &[FieldMatcher::ContainsAll(&["投信", "買賣超"])],
    },
    price_code: FieldSpec {
        name: "code",
        matchers: &[
            FieldMatcher::Exact("代號"),
            FieldMatcher::ContainsAll(&["代號"]),
        ],
    },
    close: FieldSpec {
        name: "close",
        matchers: &[FieldMatcher::ContainsAll(&["收盤"])],
    },
    volume: FieldSpec {
        name: "volume",
        matchers: &[FieldMatcher::ContainsAll(&["成交股數"])],
    },
    value: FieldSpec {
        name: "value",
        matchers: &[FieldMatcher::ContainsAll(&["成交金額"])],
    },
    avg_price: Some(FieldSpec {
        name: "average price",
        matchers: &[FieldMatcher::ContainsAll(&["均價"])],
    }),
};

impl MarketSpec {
    /// The static spec for a market.
    pub fn for_market(market: Market) -> &'static MarketSpec {
        match market {
            Market::Twse => &TWSE_SPEC,
            Market::Tpex => &TPEX_SPEC,
        }
    }

    /// Institutional-flow feed URL for a date.
    pub fn flow_url(&self, config: &FetchConfig, date: NaiveDate) -> String {
        self.url(config, self.flow_path, date)
    }

    /// Closing-price feed URL for a date.
    pub fn price_url(&self, config: &FetchConfig, date: NaiveDate) -> String {
        self.url(config, self.price_path, date)
    }

    fn url(&self, config: &FetchConfig, path: &str, date: NaiveDate) -> String {
        let date_param = market_date_param(self.market, date);
        format!(
            "{}{}",
            config.base_url(self.market),
            path.replace("{date}", &date_param)
        )
    }

    /// Resolve the flow feed's required columns against its header row.
    pub fn resolve_flow(&self, fields: &[String]) -> Result<FlowIndexMap> {
        Ok(FlowIndexMap {
            code: self.code.resolve(fields)?,
            name: self.name.resolve(fields)?,
            foreign: self.foreign.resolve(fields)?,
            trust: self.trust.resolve(fields)?,
        })
    }

    /// Resolve the price feed's required columns against its header row.
    /// The average-price column is optional and resolved leniently.
    pub fn resolve_price(&self, fields: &[String]) -> Result<PriceIndexMap> {
        Ok(PriceIndexMap {
            code: self.price_code.resolve(fields)?,
            close: self.close.resolve(fields)?,
            volume: self.volume.resolve(fields)?,
            value: self.value.resolve(fields)?,
            avg_price: self
                .avg_price
                .as_ref()
                .and_then(|spec| spec.resolve(fields).ok()),
        })
    }
}

/// Render a date the way the market's endpoints expect it.
/// TWSE takes `YYYYMMDD`; TPEx takes the ROC calendar (`year - 1911`) as
/// `YYY/MM/DD`.
pub fn market_date_param(market: Market, date: NaiveDate) -> String {
    match market {
        Market::Twse => date.format("%Y%m%d").to_string(),
        Market::Tpex => format!(
            "{:03}/{:02}/{:02}",
            date.year() - 1911,
            date.month(),
            date.day()
        ),
    }
}
