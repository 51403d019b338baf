//! CSV normalizer: uploaded text to ordered, typed records
//!
//! Expected input:
//! ```text
//! Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4
//! 2024-01-01,10,5,3,8,12
//! 2024-02-01,12,6,4,9,14
//! ```
//!
//! Parsing never fails on bad content. Unparseable dates become `None` and
//! non-numeric fields become NaN, so a single bad cell cannot stop the rows
//! after it from being processed.

use crate::data::{NormalizedRecord, RawRecord, DATE_COLUMN};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Day-resolution formats tried in order by [`parse_date`]
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%a %b %d %Y",
    "%a, %d %b %Y",
];

/// Date-time formats whose date part is kept
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Month-resolution formats, parsed as the first day of the month
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%b %Y", "%B %Y"];

/// Split CSV text into raw records keyed by the header row
pub fn parse_raw(text: &str) -> Result<Vec<RawRecord>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    debug!("CSV header has {} columns", headers.len());

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based
        let line = idx + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable CSV row at line {}: {}", line, e);
                continue;
            }
        };

        // Fields beyond the header are dropped; missing trailing fields stay absent.
        // A repeated column name keeps its first position and its last value.
        let mut fields: Vec<(String, String)> = Vec::with_capacity(headers.len());
        for (name, value) in headers.iter().zip(row.iter()) {
            match fields.iter_mut().find(|(seen, _)| seen == name) {
                Some(field) => field.1 = value.to_string(),
                None => fields.push((name.to_string(), value.to_string())),
            }
        }
        records.push(RawRecord::new(fields));
    }

    Ok(records)
}

/// Convert a raw record: "Date" to a date, every other column to a number
pub fn normalize(record: RawRecord) -> NormalizedRecord {
    let mut date = None;
    let mut values = Vec::with_capacity(record.len());

    for (name, value) in record.into_fields() {
        if name == DATE_COLUMN {
            date = parse_date(&value);
        } else {
            values.push((name, coerce_number(&value)));
        }
    }

    NormalizedRecord { date, values }
}

/// Parse and normalize CSV text, preserving row order
pub fn parse_from_string(text: &str) -> Result<Vec<NormalizedRecord>> {
    let records: Vec<NormalizedRecord> = parse_raw(text)?.into_iter().map(normalize).collect();

    let undated = records.iter().filter(|r| r.date.is_none()).count();
    if undated > 0 {
        debug!("{} of {} rows have no parseable date", undated, records.len());
    }

    Ok(records)
}

/// Parse and normalize a CSV file
pub fn parse_from_file(path: &std::path::Path) -> Result<Vec<NormalizedRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_from_string(&content)
}

/// Permissive date parsing
///
/// Accepts ISO dates and date-times, slash/dash US dates, written month
/// names, month-only (`2024-03`, `Mar 2024`) and year-only values. Anything
/// else is `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    for format in MONTH_FORMATS {
        let with_day = format!("{} 1", s);
        let format_with_day = format!("{} %d", format);
        if let Ok(date) = NaiveDate::parse_from_str(&with_day, &format_with_day) {
            return Some(date);
        }
    }

    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

/// Numeric coercion with unary-plus semantics
///
/// Whitespace is trimmed and an empty field is 0. Decimal, exponent,
/// `0x`/`0o`/`0b` and `Infinity` forms are accepted; anything else is NaN.
pub fn coerce_number(input: &str) -> f64 {
    let s = input.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u128::from_str_radix(&s[2..], radix).map_or(f64::NAN, |v| v as f64);
    }

    // f64::from_str also takes "inf" and "nan", which must stay NaN here
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }

    s.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_two_rows() {
        let text = "Date,LLaMA-3.1,Claude,PaLM-2,Gemini,GPT-4\n\
                    2024-01-01,10,5,3,8,12\n\
                    2024-02-01,12,6,4,9,14\n";

        let records = parse_from_string(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, Some(ymd(2024, 1, 1)));
        assert_eq!(records[1].date, Some(ymd(2024, 2, 1)));
        assert_eq!(records[0].value("GPT-4"), 12.0);
        assert_eq!(records[1].value("GPT-4"), 14.0);
        assert_eq!(records[1].value("LLaMA-3.1"), 12.0);
        assert_eq!(records[0].values.len(), 5);
    }

    #[test]
    fn test_non_numeric_value_is_nan_and_later_rows_survive() {
        let text = "Date,GPT-4,Claude\n\
                    2024-01-01,N/A,5\n\
                    2024-02-01,14,6\n";

        let records = parse_from_string(text).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].value("GPT-4").is_nan());
        assert_eq!(records[0].value("Claude"), 5.0);
        assert_eq!(records[1].value("GPT-4"), 14.0);
    }

    #[test]
    fn test_short_row_leaves_trailing_columns_missing() {
        let text = "Date,GPT-4,Claude\n2024-01-01,7\n";

        let raw = parse_raw(text).unwrap();
        assert_eq!(raw[0].get("Claude"), None);

        let records = parse_from_string(text).unwrap();
        assert_eq!(records[0].value("GPT-4"), 7.0);
        assert!(records[0].value("Claude").is_nan());
    }

    #[test]
    fn test_duplicate_column_takes_last_value() {
        let raw = parse_raw("Date,GPT-4,Claude,GPT-4\n2024-01-01,1,5,9\n").unwrap();

        assert_eq!(raw[0].len(), 3);
        assert_eq!(raw[0].get("GPT-4"), Some("9"));

        let records = parse_from_string("Date,GPT-4,Claude,GPT-4\n2024-01-01,1,5,9\n").unwrap();
        assert_eq!(records[0].value("GPT-4"), 9.0);
        assert_eq!(records[0].values[0].0, "GPT-4");
    }

    #[test]
    fn test_blank_lines_produce_no_record() {
        let text = "Date,GPT-4\n2024-01-01,1\n\n2024-02-01,2\n\n";
        let records = parse_from_string(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date, Some(ymd(2024, 2, 1)));
        assert_eq!(records[1].value("GPT-4"), 2.0);
    }

    #[test]
    fn test_extra_fields_beyond_header_are_dropped() {
        let raw = parse_raw("Date,GPT-4\n2024-01-01,7,99,100\n").unwrap();
        assert_eq!(raw[0].len(), 2);
    }

    #[test]
    fn test_row_order_preserved_for_unsorted_input() {
        let text = "Date,GPT-4\n2024-03-01,3\n2024-01-01,1\n2024-02-01,2\n";
        let records = parse_from_string(text).unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date.unwrap()).collect();
        assert_eq!(
            dates,
            vec![ymd(2024, 3, 1), ymd(2024, 1, 1), ymd(2024, 2, 1)]
        );
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(parse_from_string("").unwrap().is_empty());
        assert!(parse_from_string("Date,GPT-4\n").unwrap().is_empty());
    }

    #[test]
    fn test_bom_is_stripped_from_header() {
        let records = parse_from_string("\u{feff}Date,GPT-4\n2024-01-01,1\n").unwrap();
        assert_eq!(records[0].date, Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_missing_date_column() {
        let records = parse_from_string("When,GPT-4\n2024-01-01,1\n").unwrap();
        assert_eq!(records[0].date, None);
        assert!(records[0].value("When").is_nan());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date(" 2024-01-15 "), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024/01/15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("01/15/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("1/5/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("Jan 15, 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("January 15, 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15 Jan 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T10:30:00Z"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T10:30"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("Mar 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024"), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("12"), 12.0);
        assert_eq!(coerce_number(" 12.5 "), 12.5);
        assert_eq!(coerce_number("-3"), -3.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("0x1A"), 26.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_coerce_number_nan_cases() {
        assert!(coerce_number("N/A").is_nan());
        assert!(coerce_number("12abc").is_nan());
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("NaN").is_nan());
        assert!(coerce_number("1,000").is_nan());
        assert!(coerce_number("-0x10").is_nan());
        assert!(coerce_number("0xZZ").is_nan());
    }

    #[test]
    fn test_parse_from_missing_file() {
        let result = parse_from_file(std::path::Path::new("/nonexistent/data.csv"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
