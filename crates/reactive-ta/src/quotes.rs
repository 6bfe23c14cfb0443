//! A versioned, date-ordered series of quotes.
//!
//! [`Quotes`] keeps its bars sorted by date with no duplicate dates, and
//! records every change as diffs so price views over it stay incremental.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use reactive_ta::quote::{CandlePart, Quote};
//! use reactive_ta::quotes::{Quotes, DEFAULT_HISTORY_CAPACITY};
//!
//! let day = |d| Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap();
//! let mut quotes = Quotes::new(
//!     vec![
//!         Quote::new(day(3), 11.0, 12.0, 10.0, 11.5, 900.0).unwrap(),
//!         Quote::new(day(2), 10.0, 11.0, 9.5, 10.5, 800.0).unwrap(),
//!     ],
//!     DEFAULT_HISTORY_CAPACITY,
//! )
//! .unwrap();
//! let mut closes = quotes.price_view(CandlePart::Close);
//! assert_eq!(closes.value(&quotes).unwrap(), &[10.5, 11.5]);
//!
//! quotes.amend_close(1, 11.8).unwrap();
//! assert_eq!(closes.value(&quotes).unwrap(), &[10.5, 11.8]);
//! ```

use crate::error::{Error, Result};
use crate::quote::{CandlePart, Quote};
use crate::reactive::{DiffSource, DiffsSince, Draft, Epoch, MappedView, SourceId, VersionedVec};

/// History capacity used when none is given.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Date-ordered, duplicate-free quote series with diff history.
#[derive(Debug)]
pub struct Quotes {
    series: VersionedVec<Quote>,
}

impl Quotes {
    /// Sorts `quotes` by date and wraps them in a versioned series.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateDate` if two quotes share a date.
    pub fn new(mut quotes: Vec<Quote>, history_capacity: usize) -> Result<Self> {
        quotes.sort_by_key(Quote::date);
        ensure_ordered(&quotes)?;
        Ok(Self {
            series: VersionedVec::new(quotes, history_capacity),
        })
    }

    /// The quotes, oldest first.
    #[must_use]
    pub fn value(&self) -> &[Quote] {
        self.series.value()
    }

    /// Number of quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True when the series has no quotes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The current epoch of the series.
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.series.epoch()
    }

    /// Applies `transform` and commits it if the series is still ordered.
    ///
    /// # Errors
    ///
    /// - whatever `transform` returns
    /// - `Error::DuplicateDate` if the result has two quotes on one date
    /// - `Error::InvalidTransform` if the result is out of date order
    ///
    /// Nothing is committed on error.
    pub fn update<F>(&mut self, transform: F) -> Result<Epoch>
    where
        F: FnOnce(&mut Draft<Quote>) -> Result<()>,
    {
        self.series.update(|draft| {
            transform(draft)?;
            ensure_ordered(draft.as_slice())
        })
    }

    /// Appends a quote dated after every existing one.
    ///
    /// # Errors
    ///
    /// Same as [`update`](Self::update).
    pub fn append(&mut self, quote: Quote) -> Result<Epoch> {
        self.update(|draft| {
            draft.push(quote);
            Ok(())
        })
    }

    /// Replaces the quote with the same date, or inserts it in date order.
    ///
    /// # Errors
    ///
    /// Same as [`update`](Self::update).
    pub fn upsert(&mut self, quote: Quote) -> Result<Epoch> {
        self.update(|draft| {
            let date = quote.date();
            match draft.as_slice().binary_search_by_key(&date, Quote::date) {
                Ok(index) => draft.set(index, quote).map(drop),
                Err(index) => draft.insert(index, quote),
            }
        })
    }

    /// Changes the closing price of the quote at `index`.
    ///
    /// Recorded as a nested change to the `close` field.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidTransform` if `index` is out of range
    /// - `Error::InvalidQuote` if the new close falls outside the bar's range
    pub fn amend_close(&mut self, index: usize, close: f64) -> Result<Epoch> {
        self.update(|draft| draft.modify(index, &["close"], |quote| quote.set_close(close)))
    }

    /// Builds an unevaluated view of `part` for every quote.
    ///
    /// The view's own history matches the series' history capacity.
    #[must_use]
    pub fn price_view(&self, part: CandlePart) -> MappedView<Quote, f64> {
        MappedView::new(
            &self.series,
            move |quote: &Quote| quote.price(part),
            self.series.history_capacity(),
        )
    }
}

impl TryFrom<Vec<Quote>> for Quotes {
    type Error = Error;

    fn try_from(quotes: Vec<Quote>) -> Result<Self> {
        Self::new(quotes, DEFAULT_HISTORY_CAPACITY)
    }
}

impl DiffSource for Quotes {
    type Item = Quote;

    fn source_id(&self) -> SourceId {
        self.series.source_id()
    }

    fn current_epoch(&self) -> Epoch {
        self.series.current_epoch()
    }

    fn current_value(&self) -> &[Quote] {
        self.series.current_value()
    }

    fn diffs_since(&self, epoch: Epoch) -> DiffsSince<'_, Quote> {
        self.series.diffs_since(epoch)
    }

    fn history_capacity(&self) -> usize {
        self.series.history_capacity()
    }
}

fn ensure_ordered(quotes: &[Quote]) -> Result<()> {
    for (index, pair) in quotes.windows(2).enumerate() {
        let (prev, next) = (pair[0].date(), pair[1].date());
        if prev == next {
            return Err(Error::DuplicateDate {
                date: next.to_rfc3339(),
            });
        }
        if prev > next {
            return Err(Error::invalid_transform(format!(
                "quote at index {} is dated before its predecessor",
                index + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
    }

    fn bar(d: u32, close: f64) -> Quote {
        Quote::new(day(d), close, close + 1.0, close - 1.0, close, 100.0).unwrap()
    }

    fn closes(quotes: &Quotes) -> Vec<f64> {
        quotes.value().iter().map(Quote::close).collect()
    }

    #[test]
    fn test_new_sorts_by_date() {
        let quotes = Quotes::new(vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)], 4).unwrap();
        assert_eq!(closes(&quotes), vec![1.0, 2.0, 3.0]);
        assert_eq!(quotes.epoch(), 0);
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let err = Quotes::new(vec![bar(1, 1.0), bar(2, 2.0), bar(1, 5.0)], 4).unwrap_err();
        assert!(matches!(err, Error::DuplicateDate { ref date } if date.starts_with("2023-01-01")));
    }

    #[test]
    fn test_try_from_uses_default_history() {
        let quotes = Quotes::try_from(vec![bar(1, 1.0)]).unwrap();
        assert_eq!(quotes.history_capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_append_rejects_older_bar() {
        let mut quotes = Quotes::new(vec![bar(5, 5.0)], 4).unwrap();
        assert_eq!(quotes.append(bar(6, 6.0)).unwrap(), 1);

        let err = quotes.append(bar(4, 4.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidTransform { .. }));
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes.epoch(), 1);

        let err = quotes.append(bar(6, 7.0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateDate { .. }));
    }

    #[test]
    fn test_upsert_replaces_or_inserts() {
        let mut quotes = Quotes::new(vec![bar(1, 1.0), bar(3, 3.0)], 4).unwrap();
        quotes.upsert(bar(2, 2.0)).unwrap();
        quotes.upsert(bar(3, 30.0)).unwrap();
        assert_eq!(closes(&quotes), vec![1.0, 2.0, 30.0]);
    }

    #[test]
    fn test_amend_close_is_validated() {
        let mut quotes = Quotes::new(vec![bar(1, 10.0)], 4).unwrap();
        quotes.amend_close(0, 10.5).unwrap();
        assert_eq!(closes(&quotes), vec![10.5]);

        let err = quotes.amend_close(0, 50.0).unwrap_err();
        assert!(matches!(err, Error::InvalidQuote { .. }));
        assert!(quotes.amend_close(3, 10.0).is_err());
        assert_eq!(quotes.epoch(), 1);
    }

    #[test]
    fn test_price_view_tracks_updates() {
        let mut quotes = Quotes::new(vec![bar(1, 10.0), bar(2, 20.0)], 4).unwrap();
        let mut hl2 = quotes.price_view(CandlePart::HL2);
        assert_eq!(hl2.value(&quotes).unwrap(), &[10.0, 20.0]);

        quotes.append(bar(3, 30.0)).unwrap();
        quotes.amend_close(0, 10.5).unwrap();
        quotes.update(|draft| draft.remove(1).map(drop)).unwrap();

        assert_eq!(hl2.value(&quotes).unwrap(), &[10.0, 30.0]);
        let mut close = quotes.price_view(CandlePart::Close);
        assert_eq!(close.value(&quotes).unwrap(), &[10.5, 30.0]);
    }
}
