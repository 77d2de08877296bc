//! Header-based column resolution with ordered fallback matchers.
//!
//! Feed layouts drift from year to year and differ between the two
//! exchanges, so columns are located by matching header text instead of
//! assuming fixed positions. Each logical field carries an ordered list of
//! candidate matchers; the first matcher with a hit wins, and within a
//! matcher the leftmost matching column wins.

use flowrank_core::{Error, Result};

/// A single candidate rule for locating a column by its header label.
#[derive(Debug, Clone, Copy)]
pub enum FieldMatcher {
    /// Label equals the text exactly, after trimming.
    Exact(&'static str),
    /// Label contains every listed fragment.
    ContainsAll(&'static [&'static str]),
}

impl FieldMatcher {
    /// Whether a header label satisfies this matcher.
    pub fn matches(&self, label: &str) -> bool {
        let label = label.trim();
        match self {
            FieldMatcher::Exact(want) => label == *want,
            FieldMatcher::ContainsAll(fragments) => {
                fragments.iter().all(|fragment| label.contains(fragment))
            }
        }
    }
}

/// A logically required column and its candidate matchers, tried in order.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Logical field name, for diagnostics.
    pub name: &'static str,
    /// Candidate matchers in priority order.
    pub matchers: &'static [FieldMatcher],
}

impl FieldSpec {
    /// Resolve this field's physical column index against a header row.
    pub fn resolve(&self, fields: &[String]) -> Result<usize> {
        for matcher in self.matchers {
            if let Some(index) = fields.iter().position(|label| matcher.matches(label)) {
                return Ok(index);
            }
        }
        Err(Error::field_resolution(format!(
            "no column matched '{}'",
            self.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        let spec = FieldSpec {
            name: "trust net",
            matchers: &[FieldMatcher::Exact("投信買賣超股數")],
        };
        let fields = headers(&["證券代號", "投信買賣超股數"]);
        assert_eq!(spec.resolve(&fields).unwrap(), 1);
    }

    #[test]
    fn test_exact_match_trims_labels() {
        let spec = FieldSpec {
            name: "close",
            matchers: &[FieldMatcher::Exact("收盤")],
        };
        let fields = headers(&["代號", "收盤 "]);
        assert_eq!(spec.resolve(&fields).unwrap(), 1);
    }

    #[test]
    fn test_fallback_matcher_after_exact_miss() {
        // Wording drifted: the canonical label is gone, but a label with
        // both keywords still resolves.
        let spec = FieldSpec {
            name: "trust net",
            matchers: &[
                FieldMatcher::Exact("投信買賣超股數"),
                FieldMatcher::ContainsAll(&["投信", "買賣超"]),
            ],
        };
        let fields = headers(&["證券代號", "投信-買賣超股數(仟股)"]);
        assert_eq!(spec.resolve(&fields).unwrap(), 1);
    }

    #[test]
    fn test_first_matcher_wins_over_later_columns() {
        // The exact label wins even though an earlier column would satisfy
        // the fallback matcher.
        let spec = FieldSpec {
            name: "foreign net",
            matchers: &[
                FieldMatcher::ContainsAll(&["不含外資自營商", "買賣超"]),
                FieldMatcher::ContainsAll(&["外資", "買賣超"]),
            ],
        };
        let fields = headers(&[
            "外資及陸資-買賣超股數",
            "外資及陸資(不含外資自營商)-買賣超股數",
        ]);
        assert_eq!(spec.resolve(&fields).unwrap(), 1);
    }

    #[test]
    fn test_leftmost_column_wins_within_a_matcher() {
        let spec = FieldSpec {
            name: "foreign net",
            matchers: &[FieldMatcher::ContainsAll(&["外資", "買賣超"])],
        };
        let fields = headers(&["外資買賣超股數", "外資及陸資-買賣超股數"]);
        assert_eq!(spec.resolve(&fields).unwrap(), 0);
    }

    #[test]
    fn test_unresolved_field_is_an_error() {
        let spec = FieldSpec {
            name: "close",
            matchers: &[FieldMatcher::Exact("收盤價")],
        };
        let fields = headers(&["代號", "名稱"]);
        assert!(matches!(
            spec.resolve(&fields),
            Err(Error::FieldResolution(_))
        ));
    }
}
