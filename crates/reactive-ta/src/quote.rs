//! OHLCV quotes and candle-part projection.
//!
//! A [`Quote`] is one validated bar of price data. Indicators consume a
//! single number per bar, chosen with a [`CandlePart`]: one of the raw
//! prices, the volume, or one of the usual composite prices.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use reactive_ta::quote::{CandlePart, Quote};
//!
//! let date = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
//! let quote = Quote::new(date, 10.0, 12.0, 9.0, 11.0, 1_000.0).unwrap();
//!
//! assert_eq!(quote.price(CandlePart::Close), 11.0);
//! assert_eq!(quote.price(CandlePart::HL2), 10.5);
//! assert_eq!("ohlc4".parse::<CandlePart>().unwrap(), CandlePart::OHLC4);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Which value of a quote an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CandlePart {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// Traded volume.
    Volume,
    /// (High + Low) / 2.
    HL2,
    /// (High + Low + Close) / 3.
    HLC3,
    /// (Open + Close) / 2.
    OC2,
    /// (Open + High + Low) / 3.
    OHL3,
    /// (Open + High + Low + Close) / 4.
    OHLC4,
}

impl CandlePart {
    /// Every candle part, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
        Self::HL2,
        Self::HLC3,
        Self::OC2,
        Self::OHL3,
        Self::OHLC4,
    ];

    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::HL2 => "hl2",
            Self::HLC3 => "hlc3",
            Self::OC2 => "oc2",
            Self::OHL3 => "ohl3",
            Self::OHLC4 => "ohlc4",
        }
    }
}

impl fmt::Display for CandlePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandlePart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|part| part.as_str() == normalized)
            .ok_or(Error::InvalidParameter {
                name: "candle part",
                reason: "expected one of open, high, low, close, volume, hl2, hlc3, oc2, ohl3, ohlc4",
            })
    }
}

/// A single dated value projected from a quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceData {
    /// Timestamp of the quote.
    pub date: DateTime<Utc>,
    /// The projected value.
    pub value: f64,
}

/// A projected value together with the quote's volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceDataWithVolume {
    /// Timestamp of the quote.
    pub date: DateTime<Utc>,
    /// The projected value.
    pub value: f64,
    /// Traded volume.
    pub volume: f64,
}

/// High, low and close of a quote, as used by range-based indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hlc {
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

/// One validated OHLCV bar.
///
/// Invariants, checked on construction and on every setter:
/// all values are finite, `low ≤ min(open, close)`, `high ≥ max(open, close)`,
/// and `volume ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    date: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Quote {
    /// Creates a quote, validating the OHLCV constraints.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidQuote` naming the violated constraint.
    pub fn new(
        date: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self> {
        let quote = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        quote.validate()?;
        Ok(quote)
    }

    fn validate(&self) -> Result<()> {
        let values = [self.open, self.high, self.low, self.close, self.volume];
        let reason = if values.iter().any(|v| !v.is_finite()) {
            "prices and volume must be finite"
        } else if self.low > self.open || self.low > self.close {
            "low cannot be greater than open or close"
        } else if self.high < self.open || self.high < self.close {
            "high cannot be less than open or close"
        } else if self.volume < 0.0 {
            "volume must not be negative"
        } else {
            return Ok(());
        };
        Err(Error::InvalidQuote {
            reason: format!(
                "{reason} (open: {}, high: {}, low: {}, close: {}, volume: {})",
                self.open, self.high, self.low, self.close, self.volume
            ),
        })
    }

    /// Timestamp of the bar.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Opening price.
    #[must_use]
    pub const fn open(&self) -> f64 {
        self.open
    }

    /// Highest price.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Lowest price.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Closing price.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    /// Traded volume.
    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// (High + Low) / 2.
    #[must_use]
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// (High + Low + Close) / 3.
    #[must_use]
    pub fn hlc3(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// (Open + Close) / 2.
    #[must_use]
    pub fn oc2(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    /// (Open + High + Low) / 3.
    #[must_use]
    pub fn ohl3(&self) -> f64 {
        (self.open + self.high + self.low) / 3.0
    }

    /// (Open + High + Low + Close) / 4.
    #[must_use]
    pub fn ohlc4(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// High, low and close.
    #[must_use]
    pub const fn hlc(&self) -> Hlc {
        Hlc {
            high: self.high,
            low: self.low,
            close: self.close,
        }
    }

    /// The value selected by `part`.
    #[must_use]
    pub fn price(&self, part: CandlePart) -> f64 {
        match part {
            CandlePart::Open => self.open,
            CandlePart::High => self.high,
            CandlePart::Low => self.low,
            CandlePart::Close => self.close,
            CandlePart::Volume => self.volume,
            CandlePart::HL2 => self.hl2(),
            CandlePart::HLC3 => self.hlc3(),
            CandlePart::OC2 => self.oc2(),
            CandlePart::OHL3 => self.ohl3(),
            CandlePart::OHLC4 => self.ohlc4(),
        }
    }

    /// The value selected by `part`, with the bar's date.
    #[must_use]
    pub fn price_data(&self, part: CandlePart) -> PriceData {
        PriceData {
            date: self.date,
            value: self.price(part),
        }
    }

    /// The value selected by `part`, with the bar's date and volume.
    #[must_use]
    pub fn price_data_with_volume(&self, part: CandlePart) -> PriceDataWithVolume {
        PriceDataWithVolume {
            date: self.date,
            value: self.price(part),
            volume: self.volume,
        }
    }

    /// Replaces the closing price; the new close must lie within `[low, high]`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidQuote` and leaves the quote unchanged if the
    /// result would violate the OHLCV constraints.
    pub fn set_close(&mut self, close: f64) -> Result<()> {
        let candidate = Self {
            close,
            ..self.clone()
        };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Replaces the volume.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidQuote` and leaves the quote unchanged if the
    /// volume is negative or not finite.
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        let candidate = Self {
            volume,
            ..self.clone()
        };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
}
