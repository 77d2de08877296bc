//! Four-quadrant spreadsheet report.
//!
//! One sheet per market, four side-by-side ranked quadrants (foreign buy,
//! foreign sell, trust buy, trust sell) separated by narrow gap columns.
//! Name cells carry the highlight classification: red fills for aligned
//! flow, green for divergent, darker on the dominant institution's side.

use chrono::{Datelike, NaiveDate};
use flowrank_analysis::{classify_records, DailyAnalysis, MarketQuadrants};
use flowrank_core::{Alignment, ClassificationState, Dominant, Error, Market, Result, SecurityRecord};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const LIGHT_RED: Color = Color::RGB(0xFFCCCC);
const DARK_RED: Color = Color::RGB(0xFF8080);
const LIGHT_GREEN: Color = Color::RGB(0xE6FFE6);
const DARK_GREEN: Color = Color::RGB(0x80FF80);
const HEADER_BLUE: Color = Color::RGB(0x4F81BD);
const SUB_HEADER_BLUE: Color = Color::RGB(0xDCE6F1);

const FONT_NAME: &str = "微軟正黑體";

/// First column of each quadrant; the columns between are gaps.
const QUADRANT_OFFSETS: [u16; 4] = [0, 7, 14, 21];
const QUADRANT_TITLES: [&str; 4] = ["外資買超", "外資賣超", "投信買超", "投信賣超"];
const SUB_HEADERS: [&str; 6] = ["證券代號", "證券名稱", "收盤價", "均價", "股數", "估價(百萬)"];
const COLUMN_WIDTHS: [f64; 6] = [10.0, 12.0, 10.0, 11.0, 16.0, 13.0];
const GAP_WIDTH: f64 = 3.0;

/// Rows occupied by the date line and the two header rows.
const HEADER_ROWS: u32 = 3;

/// Report file name for a date.
pub fn report_filename(date: NaiveDate) -> String {
    format!("market_analysis_{}.xlsx", date.format("%Y%m%d"))
}

/// Pick the name-cell fill for one quadrant. Dark goes to the quadrant of
/// the dominant institution, light to the other; neutral gets no fill.
fn name_fill(state: Option<&ClassificationState>, foreign_quadrant: bool) -> Option<Color> {
    let state = state?;
    let (dark, light) = match state.alignment {
        Alignment::Aligned => (DARK_RED, LIGHT_RED),
        Alignment::Divergent => (DARK_GREEN, LIGHT_GREEN),
        Alignment::Neutral => return None,
    };
    let dominant_is_foreign = state.dominant == Some(Dominant::Foreign);
    Some(if dominant_is_foreign == foreign_quadrant {
        dark
    } else {
        light
    })
}

struct SheetFormats {
    date: Format,
    header: Format,
    sub_header: Format,
    text: Format,
    code: Format,
    price: Format,
    shares: Format,
    millions: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let base = Format::new().set_font_name(FONT_NAME).set_font_size(11.0);
        Self {
            date: Format::new()
                .set_font_name(FONT_NAME)
                .set_font_size(12.0)
                .set_bold()
                .set_align(FormatAlign::Left),
            header: Format::new()
                .set_font_name(FONT_NAME)
                .set_font_size(12.0)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(HEADER_BLUE)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            sub_header: base
                .clone()
                .set_bold()
                .set_background_color(SUB_HEADER_BLUE)
                .set_align(FormatAlign::Center),
            text: base.clone().set_align(FormatAlign::Center),
            code: base.clone().set_align(FormatAlign::Right),
            price: base
                .clone()
                .set_align(FormatAlign::Right)
                .set_num_format("#,##0.00"),
            shares: base
                .clone()
                .set_align(FormatAlign::Right)
                .set_num_format("#,##0"),
            millions: base
                .set_align(FormatAlign::Right)
                .set_num_format("#,##0.00"),
        }
    }

    /// Name-cell format for a record in one quadrant.
    fn name(&self, state: Option<&ClassificationState>, foreign_quadrant: bool) -> Format {
        match name_fill(state, foreign_quadrant) {
            Some(fill) => self.text.clone().set_background_color(fill),
            None => self.text.clone(),
        }
    }
}

/// Write the report for one date: one styled sheet per market.
///
/// Returns the path of the written file. Emission failure does not
/// invalidate the in-memory analysis; the caller decides how to surface it.
pub fn write_report(analysis: &DailyAnalysis, output_dir: &Path) -> Result<PathBuf> {
    let mut workbook = Workbook::new();

    for market in Market::ALL {
        let market_records: Vec<SecurityRecord> = analysis
            .records
            .iter()
            .filter(|r| r.market == market)
            .cloned()
            .collect();
        let states = classify_records(&market_records);
        let quadrants = MarketQuadrants::build(&analysis.records, market);

        let worksheet = workbook
            .add_worksheet()
            .set_name(market.sheet_name())
            .map_err(report_error)?;
        write_sheet(worksheet, analysis.date, &quadrants, &states)?;
    }

    let path = output_dir.join(report_filename(analysis.date));
    workbook.save(&path).map_err(report_error)?;
    Ok(path)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    date: NaiveDate,
    quadrants: &MarketQuadrants,
    states: &HashMap<String, ClassificationState>,
) -> Result<()> {
    let formats = SheetFormats::new();

    let report_date = format!("{}/{:02}/{:02}", date.year(), date.month(), date.day());
    worksheet
        .write_with_format(0, 0, &report_date, &formats.date)
        .map_err(report_error)?;

    let lists = [
        (&quadrants.foreign_buy, true),
        (&quadrants.foreign_sell, true),
        (&quadrants.trust_buy, false),
        (&quadrants.trust_sell, false),
    ];

    for (quadrant, (offset, title)) in QUADRANT_OFFSETS.iter().zip(QUADRANT_TITLES).enumerate() {
        let offset = *offset;
        worksheet
            .merge_range(1, offset, 1, offset + 5, title, &formats.header)
            .map_err(report_error)?;
        for (col, label) in SUB_HEADERS.iter().enumerate() {
            worksheet
                .write_with_format(2, offset + col as u16, *label, &formats.sub_header)
                .map_err(report_error)?;
        }
        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet
                .set_column_width(offset + col as u16, *width)
                .map_err(report_error)?;
        }
        if quadrant < QUADRANT_OFFSETS.len() - 1 {
            worksheet
                .set_column_width(offset + 6, GAP_WIDTH)
                .map_err(report_error)?;
        }

        let (list, foreign_quadrant) = lists[quadrant];
        write_quadrant(worksheet, &formats, offset, list, states, foreign_quadrant)?;
    }

    Ok(())
}

fn write_quadrant(
    worksheet: &mut Worksheet,
    formats: &SheetFormats,
    offset: u16,
    list: &[SecurityRecord],
    states: &HashMap<String, ClassificationState>,
    foreign_quadrant: bool,
) -> Result<()> {
    for (i, record) in list.iter().enumerate() {
        let row = HEADER_ROWS + i as u32;
        let (shares, value) = if foreign_quadrant {
            (record.foreign_shares, record.foreign_value)
        } else {
            (record.trust_shares, record.trust_value)
        };

        // Numeric codes are written as numbers so spreadsheet sorting works.
        match record.code.parse::<f64>() {
            Ok(code) => worksheet.write_with_format(row, offset, code, &formats.code),
            Err(_) => worksheet.write_with_format(row, offset, record.code.as_str(), &formats.text),
        }
        .map_err(report_error)?;

        let name_format = formats.name(states.get(&record.code), foreign_quadrant);
        worksheet
            .write_with_format(row, offset + 1, record.name.as_str(), &name_format)
            .map_err(report_error)?;
        worksheet
            .write_with_format(row, offset + 2, record.close, &formats.price)
            .map_err(report_error)?;
        worksheet
            .write_with_format(row, offset + 3, record.vwap, &formats.price)
            .map_err(report_error)?;
        worksheet
            .write_with_format(row, offset + 4, shares as f64, &formats.shares)
            .map_err(report_error)?;
        worksheet
            .write_with_format(row, offset + 5, value / 1_000_000.0, &formats.millions)
            .map_err(report_error)?;
    }
    Ok(())
}

fn report_error(e: XlsxError) -> Error {
    Error::report(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(
        market: Market,
        code: &str,
        foreign_shares: i64,
        trust_shares: i64,
    ) -> SecurityRecord {
        SecurityRecord {
            market,
            code: code.to_string(),
            name: format!("股{}", code),
            close: 100.0,
            vwap: 101.5,
            foreign_shares,
            trust_shares,
            foreign_value: foreign_shares as f64 * 101.5,
            trust_value: trust_shares as f64 * 101.5,
        }
    }

    fn aligned(dominant: Dominant) -> ClassificationState {
        ClassificationState {
            alignment: Alignment::Aligned,
            dominant: Some(dominant),
        }
    }

    #[test]
    fn test_report_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        assert_eq!(report_filename(date), "market_analysis_20260223.xlsx");
    }

    #[test]
    fn test_name_fill_tiers() {
        let state = aligned(Dominant::Foreign);
        assert_eq!(name_fill(Some(&state), true), Some(DARK_RED));
        assert_eq!(name_fill(Some(&state), false), Some(LIGHT_RED));

        let divergent = ClassificationState {
            alignment: Alignment::Divergent,
            dominant: Some(Dominant::Trust),
        };
        assert_eq!(name_fill(Some(&divergent), true), Some(LIGHT_GREEN));
        assert_eq!(name_fill(Some(&divergent), false), Some(DARK_GREEN));
    }

    #[test]
    fn test_name_fill_neutral_and_unknown() {
        let neutral = ClassificationState {
            alignment: Alignment::Neutral,
            dominant: None,
        };
        assert_eq!(name_fill(Some(&neutral), true), None);
        assert_eq!(name_fill(None, true), None);
    }

    #[test]
    fn test_fill_swaps_with_dominance() {
        // Fixed sign pattern, swapped dominance: the dark tier swaps sides.
        let foreign_led = aligned(Dominant::Foreign);
        let trust_led = aligned(Dominant::Trust);
        assert_eq!(name_fill(Some(&foreign_led), true), Some(DARK_RED));
        assert_eq!(name_fill(Some(&trust_led), true), Some(LIGHT_RED));
    }

    #[test]
    fn test_write_report_creates_dated_file() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let records = vec![
            make_record(Market::Twse, "2330", 1_000_000, -500_000),
            make_record(Market::Twse, "2317", -200_000, -300_000),
            make_record(Market::Tpex, "5483", 100_000, 50_000),
        ];
        let analysis = DailyAnalysis::from_records(date, records).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&analysis, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "market_analysis_20260223.xlsx"
        );
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
