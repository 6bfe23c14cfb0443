//! Command execution: load quotes, project a candle part, run an indicator.

use chrono::{DateTime, Utc};
use reactive_ta::indicators::{std_dev, Sma, StreamingIndicator};
use reactive_ta::kernels::CircularBuffer;
use reactive_ta::quote::{CandlePart, Quote};
use reactive_ta::quotes::Quotes;
use tracing::{debug, info};

use crate::args::{check_period, parse_alma_params, parse_part, Args, Command};
use crate::csv_parser::parse_quotes;
use crate::csv_writer::{write_output, OutputDest};
use crate::error::Result;

/// Rolling population standard deviation over a fixed window.
#[derive(Debug, Clone)]
pub struct RollingStdDev {
    window: CircularBuffer<f64>,
}

impl RollingStdDev {
    /// Creates a rolling standard deviation over `period` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero period.
    pub fn new(period: usize) -> reactive_ta::Result<Self> {
        Ok(Self {
            window: CircularBuffer::new(period)?,
        })
    }
}

impl StreamingIndicator<f64> for RollingStdDev {
    fn next(&mut self, value: f64) -> f64 {
        self.window.push(value);
        if self.window.is_full() {
            std_dev(self.window.values()).unwrap_or(f64::NAN)
        } else {
            f64::NAN
        }
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn period(&self) -> usize {
        self.window.capacity()
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }
}

/// The indicator selected on the command line, with its output column name.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for bad parameters.
pub fn build_indicator(command: &Command) -> Result<(String, Box<dyn StreamingIndicator<f64>>)> {
    let built: (String, Box<dyn StreamingIndicator<f64>>) = match command {
        Command::Sma { period, .. } => {
            let period = check_period(*period)?;
            (format!("sma_{period}"), Box::new(Sma::<f64>::new(period)?))
        }
        Command::Alma { params, .. } => {
            let alma = parse_alma_params(params)?.build::<f64>()?;
            (format!("alma_{}", alma.period()), Box::new(alma))
        }
        Command::Stddev { period, .. } => {
            let period = check_period(*period)?;
            (format!("stddev_{period}"), Box::new(RollingStdDev::new(period)?))
        }
    };
    Ok(built)
}

/// Projected prices and indicator values, one per quote in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed {
    /// Quote dates.
    pub dates: Vec<DateTime<Utc>>,
    /// The projected candle part.
    pub prices: Vec<f64>,
    /// Indicator output; NaN during warm-up.
    pub values: Vec<f64>,
}

/// Loads every quote at once, then runs the indicator over the price view.
///
/// # Errors
///
/// Returns an error for duplicate dates.
pub fn compute_batch(
    quotes: Vec<Quote>,
    part: CandlePart,
    history: usize,
    indicator: &mut dyn StreamingIndicator<f64>,
) -> Result<Computed> {
    let series = Quotes::new(quotes, history)?;
    let mut view = series.price_view(part);
    let prices = view.value(&series)?.to_vec();
    let values = prices.iter().map(|&p| indicator.next(p)).collect();

    Ok(Computed {
        dates: series.value().iter().map(Quote::date).collect(),
        prices,
        values,
    })
}

/// Appends quotes one by one, reading the price view after each append and
/// feeding the newest price to the indicator.
///
/// # Errors
///
/// Returns an error for duplicate dates.
pub fn compute_stream(
    mut quotes: Vec<Quote>,
    part: CandlePart,
    history: usize,
    indicator: &mut dyn StreamingIndicator<f64>,
) -> Result<Computed> {
    quotes.sort_by_key(Quote::date);
    let mut series = Quotes::new(Vec::new(), history)?;
    let mut view = series.price_view(part);
    let mut values = Vec::with_capacity(quotes.len());

    for quote in quotes {
        let epoch = series.append(quote)?;
        let latest = view.value(&series)?.last().copied().unwrap_or(f64::NAN);
        debug!(epoch, latest, "appended quote");
        values.push(indicator.next(latest));
    }

    Ok(Computed {
        dates: series.value().iter().map(Quote::date).collect(),
        prices: view.value(&series)?.to_vec(),
        values,
    })
}

/// Runs the parsed command end to end.
///
/// # Errors
///
/// Any argument, I/O, parse or computation error.
pub fn run(args: &Args) -> Result<()> {
    let opts = args.opts();
    let part = parse_part(&opts.part)?;
    let (name, mut indicator) = build_indicator(&args.command)?;

    let quotes = parse_quotes(args.input_path())?;
    info!(
        input = args.input_path(),
        quotes = quotes.len(),
        %part,
        indicator = %name,
        stream = opts.stream,
        "loaded quotes"
    );

    let computed = if opts.stream {
        compute_stream(quotes, part, opts.history, indicator.as_mut())?
    } else {
        compute_batch(quotes, part, opts.history, indicator.as_mut())?
    };

    write_output(
        &OutputDest::from_option(opts.output.as_deref()),
        &computed.dates,
        &[(part.as_str(), &computed.prices[..]), (name.as_str(), &computed.values[..])],
    )
}
