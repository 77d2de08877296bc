//! Ranked console summary.
//!
//! The summary stays valid even when the spreadsheet fails to write, so it
//! prints straight to stdout rather than going through the report file.

use flowrank_analysis::{DailyAnalysis, Rankings};
use flowrank_core::SecurityRecord;

/// Format a monetary value in units of 100 million (億元), sign-prefixed.
pub fn format_value(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}億元", value / 100_000_000.0)
    } else {
        format!("{:.2}億元", value / 100_000_000.0)
    }
}

fn print_ranked(title: &str, list: &[SecurityRecord], value: impl Fn(&SecurityRecord) -> f64) {
    println!("\n### {}", title);
    for (i, record) in Rankings::top(list).iter().enumerate() {
        println!(
            "{:2}. {:<6} {:<10} : {}",
            i + 1,
            record.code,
            record.name,
            format_value(value(record))
        );
    }
}

fn print_aligned(title: &str, list: &[SecurityRecord]) {
    println!("\n### {}", title);
    for (i, record) in Rankings::top(list).iter().enumerate() {
        println!(
            "{:2}. {:<6} {:<10} : 總計 {} (外資 {}, 投信 {})",
            i + 1,
            record.code,
            record.name,
            format_value(record.combined_value()),
            format_value(record.foreign_value),
            format_value(record.trust_value)
        );
    }
}

fn print_divergent(title: &str, list: &[SecurityRecord]) {
    println!("\n### {}", title);
    for (i, record) in Rankings::top(list).iter().enumerate() {
        println!(
            "{:2}. {:<6} {:<10} : 外資 {}, 投信 {}",
            i + 1,
            record.code,
            record.name,
            format_value(record.foreign_value),
            format_value(record.trust_value)
        );
    }
}

/// Print the full ranked summary for one day's analysis.
pub fn print_summary(analysis: &DailyAnalysis) {
    let rankings = &analysis.rankings;

    println!(
        "{} — {} securities processed",
        analysis.date,
        analysis.records.len()
    );
    println!("{}", "=".repeat(60));

    print_ranked("外資買超排名 (依成交值)", &rankings.foreign_buy, |r| {
        r.foreign_value
    });
    print_ranked("外資賣超排名 (依成交值)", &rankings.foreign_sell, |r| {
        r.foreign_value
    });
    print_ranked("投信買超排名 (依成交值)", &rankings.trust_buy, |r| {
        r.trust_value
    });
    print_ranked("投信賣超排名 (依成交值)", &rankings.trust_sell, |r| {
        r.trust_value
    });

    println!("\n{}", "=".repeat(60));
    print_aligned(
        "土洋同買超 (外資與投信皆買超，依總買超金額排序)",
        &rankings.aligned_buy,
    );
    print_aligned(
        "土洋同賣超 (外資與投信皆賣超，依總賣超金額排序)",
        &rankings.aligned_sell,
    );

    println!("\n{}", "=".repeat(60));
    print_divergent(
        "土洋對作: 外資買超、投信賣超 (依對作規模排序)",
        &rankings.divergent_foreign_buy,
    );
    print_divergent(
        "土洋對作: 外資賣超、投信買超 (依對作規模排序)",
        &rankings.divergent_foreign_sell,
    );

    println!("\n{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flowrank_core::Market;

    #[test]
    fn test_format_value_signs() {
        assert_eq!(format_value(600_000_000.0), "+6.00億元");
        assert_eq!(format_value(-300_000_000.0), "-3.00億元");
        assert_eq!(format_value(0.0), "+0.00億元");
    }

    #[test]
    fn test_print_summary_runs() {
        let record = SecurityRecord {
            market: Market::Twse,
            code: "2330".to_string(),
            name: "台積電".to_string(),
            close: 600.0,
            vwap: 600.0,
            foreign_shares: 1_000_000,
            trust_shares: -500_000,
            foreign_value: 600_000_000.0,
            trust_value: -300_000_000.0,
        };
        let date = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let analysis = DailyAnalysis::from_records(date, vec![record]).unwrap();
        print_summary(&analysis);
    }
}
