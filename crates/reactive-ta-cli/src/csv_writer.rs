//! CSV output for computed series.
//!
//! Output has a `date` column followed by one column per series. NaN values
//! (indicator warm-up) are written as empty cells so downstream tools read
//! them as missing.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use chrono::{DateTime, Timelike, Utc};

use crate::error::{CliError, Result};

/// Where output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Standard output.
    Stdout,
    /// A file path, created or truncated.
    File(String),
}

impl OutputDest {
    /// `File` for `Some(path)`, `Stdout` otherwise.
    #[must_use]
    pub fn from_option(path: Option<&str>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_string()))
    }

    /// Opens a writer for this destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IoError` if the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Formats a date as `YYYY-MM-DD` at midnight, RFC 3339 otherwise.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    if date.num_seconds_from_midnight() == 0 && date.nanosecond() == 0 {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.to_rfc3339()
    }
}

/// Writes `dates` alongside each named column.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if a column's length differs from the
/// number of dates, or `CliError::IoError` on write failure.
pub fn write_columns<W: Write>(
    mut writer: W,
    dates: &[DateTime<Utc>],
    columns: &[(&str, &[f64])],
) -> Result<()> {
    if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != dates.len()) {
        return Err(CliError::InvalidArgument {
            argument: (*name).to_string(),
            reason: format!("{} values for {} dates", values.len(), dates.len()),
            suggestion: None,
        });
    }

    write!(writer, "date")?;
    for (name, _) in columns {
        write!(writer, ",{name}")?;
    }
    writeln!(writer)?;

    for (i, date) in dates.iter().enumerate() {
        write!(writer, "{}", format_date(date))?;
        for (_, values) in columns {
            if values[i].is_nan() {
                write!(writer, ",")?;
            } else {
                write!(writer, ",{}", values[i])?;
            }
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the columns to `dest`.
///
/// # Errors
///
/// Same as [`write_columns`].
pub fn write_output(
    dest: &OutputDest,
    dates: &[DateTime<Utc>],
    columns: &[(&str, &[f64])],
) -> Result<()> {
    write_columns(dest.writer()?, dates, columns)
}
