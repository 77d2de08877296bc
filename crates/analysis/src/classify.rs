//! Per-code highlight classification.

use flowrank_core::{ClassificationState, SecurityRecord};
use std::collections::HashMap;

/// Compute the classification once per code so the same security gets a
/// consistent highlight in every report quadrant that shows it.
pub fn classify_records(records: &[SecurityRecord]) -> HashMap<String, ClassificationState> {
    records
        .iter()
        .map(|record| {
            (
                record.code.clone(),
                ClassificationState::from_shares(record.foreign_shares, record.trust_shares),
            )
        })
        .collect()
}
