//! CLI argument parsing module.
//!
//! The CLI follows the pattern:
//! `reactive-ta <indicator> <quotes.csv> [params] [-p part] [-o output.csv]`
//!
//! # Examples
//!
//! ```bash
//! # Simple Moving Average of the close with default period (20)
//! reactive-ta sma quotes.csv
//!
//! # SMA of the typical price (HLC3) over 10 bars, written to a file
//! reactive-ta sma quotes.csv 10 -p hlc3 -o sma.csv
//!
//! # ALMA with custom period, offset and sigma
//! reactive-ta alma quotes.csv 9,0.85,6
//!
//! # Rolling standard deviation, replaying bars one at a time
//! reactive-ta stddev quotes.csv 20 --stream
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand};
use reactive_ta::indicators::AlmaConfig;
use reactive_ta::quote::CandlePart;
use reactive_ta::quotes::DEFAULT_HISTORY_CAPACITY;

use crate::error::{CliError, Result};

/// reactive-ta: streaming technical analysis over quote files
#[derive(Parser, Debug)]
#[command(name = "reactive-ta")]
#[command(author, version, about = "Streaming technical analysis indicators")]
#[command(long_about = "reactive-ta loads OHLCV quotes from a CSV file into a versioned \
    quote series, projects one candle part through an incrementally maintained view, and \
    streams it through an indicator. Output is CSV, to a file or stdout.")]
pub struct Args {
    /// The indicator to compute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every indicator command.
#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct CommonOpts {
    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Candle part to read: open, high, low, close, volume, hl2, hlc3, oc2, ohl3, ohlc4
    #[arg(short, long, default_value = "close")]
    pub part: String,

    /// Diff history retained by the quote series
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history: usize,

    /// Replay bars one at a time through the series instead of loading them at once
    #[arg(long)]
    pub stream: bool,
}

/// Available indicator commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Simple Moving Average
    #[command(about = "Simple Moving Average (SMA)")]
    Sma {
        /// Input CSV file
        input: String,

        /// Period for the moving average
        #[arg(default_value = "20")]
        period: usize,

        #[command(flatten)]
        opts: CommonOpts,
    },

    /// Arnaud Legoux Moving Average
    #[command(about = "Arnaud Legoux Moving Average (ALMA)")]
    Alma {
        /// Input CSV file
        input: String,

        /// Parameters: period[,offset[,sigma]] (e.g., 20,0.85,6)
        #[arg(default_value = "20,0.85,6")]
        params: String,

        #[command(flatten)]
        opts: CommonOpts,
    },

    /// Rolling population standard deviation
    #[command(about = "Rolling standard deviation")]
    Stddev {
        /// Input CSV file
        input: String,

        /// Window length
        #[arg(default_value = "20")]
        period: usize,

        #[command(flatten)]
        opts: CommonOpts,
    },
}

impl Args {
    /// Parses the process arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The input file path.
    pub fn input_path(&self) -> &str {
        match &self.command {
            Command::Sma { input, .. } | Command::Alma { input, .. } | Command::Stddev { input, .. } => {
                input
            }
        }
    }

    /// The options shared by every command.
    pub fn opts(&self) -> &CommonOpts {
        match &self.command {
            Command::Sma { opts, .. } | Command::Alma { opts, .. } | Command::Stddev { opts, .. } => {
                opts
            }
        }
    }
}

/// Parses a candle part name.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` listing the accepted names.
pub fn parse_part(part: &str) -> Result<CandlePart> {
    part.parse::<CandlePart>().map_err(|_| {
        let names: Vec<&str> = CandlePart::ALL.iter().map(|p| p.as_str()).collect();
        CliError::InvalidArgument {
            argument: "part".to_string(),
            reason: format!("unknown candle part '{part}'"),
            suggestion: Some(format!("Use one of: {}", names.join(", "))),
        }
    })
}

/// Validates a window length.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for zero.
pub fn check_period(period: usize) -> Result<usize> {
    if period == 0 {
        return Err(CliError::InvalidArgument {
            argument: "period".to_string(),
            reason: "period must be positive".to_string(),
            suggestion: Some("Use a positive integer like 20".to_string()),
        });
    }
    Ok(period)
}

/// Parses `period[,offset[,sigma]]` into an ALMA configuration.
///
/// Missing trailing values keep their defaults.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for unparsable or out-of-range values.
pub fn parse_alma_params(params: &str) -> Result<AlmaConfig> {
    let parts: Vec<&str> = params.split(',').collect();
    if parts.len() > 3 {
        return Err(CliError::InvalidArgument {
            argument: "params".to_string(),
            reason: format!("ALMA takes at most 3 parameters, got {}", parts.len()),
            suggestion: Some("Use format: period,offset,sigma (e.g., 20,0.85,6)".to_string()),
        });
    }

    let period = parts[0].trim().parse::<usize>().map_err(|_| CliError::InvalidArgument {
        argument: "period".to_string(),
        reason: format!("cannot parse '{}' as integer", parts[0]),
        suggestion: Some("Use a positive integer like 20".to_string()),
    })?;
    let mut config = AlmaConfig::new().period(check_period(period)?);

    if let Some(raw) = parts.get(1) {
        let offset = raw.trim().parse::<f64>().map_err(|_| CliError::InvalidArgument {
            argument: "offset".to_string(),
            reason: format!("cannot parse '{raw}' as number"),
            suggestion: Some("Use a number between 0 and 1 like 0.85".to_string()),
        })?;
        if !(0.0..=1.0).contains(&offset) {
            return Err(CliError::InvalidArgument {
                argument: "offset".to_string(),
                reason: "offset must be between 0 and 1".to_string(),
                suggestion: Some("Use a number between 0 and 1 like 0.85".to_string()),
            });
        }
        config = config.offset(offset);
    }

    if let Some(raw) = parts.get(2) {
        let sigma = raw.trim().parse::<f64>().map_err(|_| CliError::InvalidArgument {
            argument: "sigma".to_string(),
            reason: format!("cannot parse '{raw}' as number"),
            suggestion: Some("Use a positive number like 6".to_string()),
        })?;
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(CliError::InvalidArgument {
                argument: "sigma".to_string(),
                reason: "sigma must be positive".to_string(),
                suggestion: Some("Use a positive number like 6".to_string()),
            });
        }
        config = config.sigma(sigma);
    }

    Ok(config)
}
