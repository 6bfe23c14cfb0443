//! CSV parsing for OHLCV quote files.
//!
//! Columns are matched by header name, case-insensitively and in any order:
//!
//! - a date column: `date`, `time`, `datetime`, `timestamp` or `dt`
//! - `open`, `high`, `low`, `close` (or `price`, `adj close`)
//! - optionally `volume` (or `vol`); missing volume reads as zero
//!
//! Dates are RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` or plain
//! `YYYY-MM-DD` (midnight UTC).
//!
//! # Example
//!
//! ```
//! use reactive_ta_cli::csv_parser::parse_quotes_from_reader;
//!
//! let csv = "Date,Open,High,Low,Close,Volume\n\
//!            2024-01-02,10,11,9,10.5,1000\n\
//!            2024-01-03,10.5,12,10,11.5,1200\n";
//! let quotes = parse_quotes_from_reader(csv.as_bytes()).unwrap();
//! assert_eq!(quotes.len(), 2);
//! assert_eq!(quotes[1].close(), 11.5);
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use reactive_ta::quote::Quote;

use crate::error::{CliError, Result};

/// Positions of the quote fields within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteColumns {
    /// Date column index.
    pub date: usize,
    /// Open column index.
    pub open: usize,
    /// High column index.
    pub high: usize,
    /// Low column index.
    pub low: usize,
    /// Close column index.
    pub close: usize,
    /// Volume column index, if present.
    pub volume: Option<usize>,
}

impl QuoteColumns {
    /// Locates the quote columns in a header row.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CsvParseError` naming the first missing column.
    pub fn detect(headers: &[String]) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&normalize_header(h).as_str()))
        };
        let require = |names: &[&str], label: &str| {
            find(names).ok_or_else(|| CliError::CsvParseError {
                message: format!("no '{label}' column found"),
                line: Some(1),
            })
        };

        Ok(Self {
            date: headers
                .iter()
                .position(|h| is_date_column(h))
                .ok_or_else(|| CliError::CsvParseError {
                    message: "no date column found (expected 'date' or 'timestamp')".to_string(),
                    line: Some(1),
                })?,
            open: require(&["open"], "open")?,
            high: require(&["high"], "high")?,
            low: require(&["low"], "low")?,
            close: require(&["close", "price", "adj close", "adjusted close"], "close")?,
            volume: find(&["volume", "vol"]),
        })
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

fn is_date_column(header: &str) -> bool {
    let normalized = normalize_header(header);
    matches!(
        normalized.as_str(),
        "date" | "time" | "datetime" | "timestamp" | "dt"
    )
}

/// Parses a timestamp in one of the accepted date formats.
///
/// # Errors
///
/// Returns `CliError::CsvParseError` if no format matches.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::CsvParseError {
            message: format!("cannot parse '{trimmed}' as a date"),
            line: None,
        })
}

fn parse_value(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    trimmed.parse::<f64>().map_err(|_| CliError::CsvParseError {
        message: format!("cannot parse '{trimmed}' as number"),
        line: None,
    })
}

fn parse_record(record: &StringRecord, columns: &QuoteColumns) -> Result<Quote> {
    let field = |idx: usize| record.get(idx).unwrap_or("");
    let date = parse_date(field(columns.date))?;
    let volume = match columns.volume {
        Some(idx) if !field(idx).trim().is_empty() => parse_value(field(idx))?,
        _ => 0.0,
    };
    Quote::new(
        date,
        parse_value(field(columns.open))?,
        parse_value(field(columns.high))?,
        parse_value(field(columns.low))?,
        parse_value(field(columns.close))?,
        volume,
    )
    .map_err(|e| CliError::CsvParseError {
        message: e.to_string(),
        line: None,
    })
}

/// Parses quotes from a CSV file.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be opened, or
/// `CliError::CsvParseError` for malformed content.
pub fn parse_quotes<P: AsRef<Path>>(path: P) -> Result<Vec<Quote>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    parse_quotes_from_reader(BufReader::new(file))
}

/// Parses quotes from any reader producing CSV text.
///
/// Rows are returned in file order; sorting is left to the quote series.
///
/// # Errors
///
/// Returns `CliError::CsvParseError` carrying the offending line number.
pub fn parse_quotes_from_reader<R: Read>(reader: R) -> Result<Vec<Quote>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(1),
        })?
        .iter()
        .map(String::from)
        .collect();
    let columns = QuoteColumns::detect(&headers)?;

    let mut quotes = Vec::new();
    for (line_idx, result) in csv_reader.records().enumerate() {
        let line = line_idx + 2; // header plus one-based lines
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;
        let quote = parse_record(&record, &columns).map_err(|e| match e {
            CliError::CsvParseError { message, .. } => CliError::CsvParseError {
                message,
                line: Some(line),
            },
            other => other,
        })?;
        quotes.push(quote);
    }

    if quotes.is_empty() {
        return Err(CliError::CsvParseError {
            message: "CSV file contains no quotes".to_string(),
            line: None,
        });
    }
    Ok(quotes)
}
