//! Versioned sequences that record every mutation as diffs.
//!
//! A [`VersionedVec`] owns a sequence and a bounded [`HistoryBuffer`] of the
//! diff batches that produced its recent states. The only way to change it is
//! [`VersionedVec::update`], whose transform edits a [`Draft`]: every draft
//! mutation is recorded as the equivalent [`Diff`], and the new sequence plus
//! its batch are committed together once the transform succeeds.
//!
//! # Example
//!
//! ```
//! use reactive_ta::reactive::{Diff, DiffSource, DiffsSince, VersionedVec};
//!
//! let mut prices = VersionedVec::new(vec![1.0, 2.0, 3.0], 8);
//! let epoch = prices.update(|draft| {
//!     draft.insert(1, 10.0)?;
//!     Ok(())
//! }).unwrap();
//!
//! assert_eq!(epoch, 1);
//! assert_eq!(prices.value(), &[1.0, 10.0, 2.0, 3.0]);
//! match prices.diffs_since(0) {
//!     DiffsSince::Diffs(diffs) => assert_eq!(diffs, vec![&Diff::Add { index: 1, value: 10.0 }]),
//!     DiffsSince::Exhausted => unreachable!(),
//! }
//! ```

use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::error::{Error, Result};
use crate::reactive::diff::{Diff, DiffBatch, Epoch, Op};
use crate::reactive::history::HistoryBuffer;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a diff source.
///
/// Mapped views remember the identity of the source they were built for and
/// refuse to be evaluated against any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The answer to [`DiffSource::diffs_since`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiffsSince<'a, T> {
    /// Every diff recorded after the requested epoch, flattened in epoch order.
    Diffs(Vec<&'a Diff<T>>),
    /// The requested epoch is outside the retained history.
    Exhausted,
}

impl<'a, T> DiffsSince<'a, T> {
    /// True when the history could not answer.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// The diffs, or `None` when the history was exhausted.
    #[must_use]
    pub fn into_diffs(self) -> Option<Vec<&'a Diff<T>>> {
        match self {
            Self::Diffs(diffs) => Some(diffs),
            Self::Exhausted => None,
        }
    }
}

/// A sequence whose recent changes can be replayed as diffs.
///
/// Implemented by [`VersionedVec`] and by
/// [`MappedView`](crate::reactive::MappedView), so views can be stacked on
/// either.
pub trait DiffSource {
    /// Element type of the sequence.
    type Item;

    /// Identity used to bind views to this source.
    fn source_id(&self) -> SourceId;

    /// Epoch of the current sequence state.
    fn current_epoch(&self) -> Epoch;

    /// The current sequence state.
    fn current_value(&self) -> &[Self::Item];

    /// Diffs for every epoch after `epoch`, or [`DiffsSince::Exhausted`].
    fn diffs_since(&self, epoch: Epoch) -> DiffsSince<'_, Self::Item>;

    /// How many past batches are retained.
    fn history_capacity(&self) -> usize;
}

/// An owned sequence with epoch tracking and bounded diff history.
///
/// Epoch 0 is the initial value; each successful [`update`](Self::update)
/// advances the epoch by exactly one, even if it changed nothing.
#[derive(Debug)]
pub struct VersionedVec<T> {
    id: SourceId,
    value: Vec<T>,
    epoch: Epoch,
    history: HistoryBuffer<Diff<T>>,
}

impl<T> VersionedVec<T> {
    /// Creates a source at epoch 0 retaining the batches of the last
    /// `history_capacity` updates.
    #[must_use]
    pub fn new(initial: Vec<T>, history_capacity: usize) -> Self {
        Self {
            id: SourceId::next(),
            value: initial,
            epoch: 0,
            history: HistoryBuffer::new(history_capacity, 0),
        }
    }

    /// The current sequence.
    #[must_use]
    pub fn value(&self) -> &[T] {
        &self.value
    }

    /// The current epoch.
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// This source's identity.
    #[must_use]
    pub const fn id(&self) -> SourceId {
        self.id
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// True when the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<T: Clone> VersionedVec<T> {
    /// Applies `transform` to a draft of the sequence and commits the result.
    ///
    /// Returns the new epoch.
    ///
    /// # Errors
    ///
    /// Whatever `transform` returns. Draft operations that cannot be recorded
    /// fail with `Error::InvalidTransform`; errors produced by the caller's
    /// own code are passed through unchanged. On any error the sequence,
    /// epoch and history are left exactly as they were.
    pub fn update<F>(&mut self, transform: F) -> Result<Epoch>
    where
        F: FnOnce(&mut Draft<T>) -> Result<()>,
    {
        let mut draft = Draft::new(self.value.clone());
        transform(&mut draft)?;
        let (value, batch) = draft.into_parts();

        self.epoch += 1;
        trace!(
            source = self.id.0,
            epoch = self.epoch,
            diffs = batch.len(),
            len = value.len(),
            "source updated"
        );
        self.history.push(self.epoch, batch);
        self.value = value;
        Ok(self.epoch)
    }
}

impl<T> DiffSource for VersionedVec<T> {
    type Item = T;

    fn source_id(&self) -> SourceId {
        self.id
    }

    fn current_epoch(&self) -> Epoch {
        self.epoch
    }

    fn current_value(&self) -> &[T] {
        &self.value
    }

    fn diffs_since(&self, epoch: Epoch) -> DiffsSince<'_, T> {
        self.history
            .since(epoch)
            .map_or(DiffsSince::Exhausted, DiffsSince::Diffs)
    }

    fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
}

/// A recording working copy of a [`VersionedVec`]'s sequence.
///
/// Indices passed to mutating methods refer to the draft as it is at the
/// moment of the call, after every earlier mutation.
#[derive(Debug)]
pub struct Draft<T> {
    items: Vec<T>,
    diffs: DiffBatch<T>,
}

impl<T: Clone> Draft<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            items,
            diffs: Vec::new(),
        }
    }

    fn into_parts(self) -> (Vec<T>, DiffBatch<T>) {
        (self.items, self.diffs)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the draft has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterates the elements in order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The diffs recorded so far.
    #[must_use]
    pub fn diffs(&self) -> &[Diff<T>] {
        &self.diffs
    }

    /// Appends `value`.
    pub fn push(&mut self, value: T) {
        self.diffs.push(Diff::Add {
            index: self.items.len(),
            value: value.clone(),
        });
        self.items.push(value);
    }

    /// Inserts `value` at `index`, shifting later elements up.
    ///
    /// # Errors
    ///
    /// `Error::InvalidTransform` if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.items.len() {
            return Err(self.out_of_bounds("insert", index));
        }
        self.diffs.push(Diff::Add {
            index,
            value: value.clone(),
        });
        self.items.insert(index, value);
        Ok(())
    }

    /// Overwrites the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// `Error::InvalidTransform` if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds("set", index));
        }
        self.diffs.push(Diff::Replace {
            index,
            value: value.clone(),
        });
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidTransform` if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds("remove", index));
        }
        self.diffs.push(Diff::Remove { index });
        Ok(self.items.remove(index))
    }

    /// Removes and returns the last element, if any.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.items.len().checked_sub(1)?;
        self.diffs.push(Diff::Remove { index: last });
        self.items.pop()
    }

    /// Shortens the draft to `len` elements; no-op if already that short.
    pub fn truncate(&mut self, len: usize) {
        if len < self.items.len() {
            self.diffs.push(Diff::Length { len });
            self.items.truncate(len);
        }
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends every value from `values`.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.push(value);
        }
    }

    /// Keeps only the elements for which `keep` returns true.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        let mut index = 0;
        while index < self.items.len() {
            if keep(&self.items[index]) {
                index += 1;
            } else {
                self.diffs.push(Diff::Remove { index });
                self.items.remove(index);
            }
        }
    }

    /// Edits a field inside the element at `index` in place.
    ///
    /// `path` names the field being changed and is recorded as a nested
    /// replace. The edit runs on a copy of the element which is written back
    /// only if `edit` succeeds.
    ///
    /// # Errors
    ///
    /// `Error::InvalidTransform` for an out-of-range index or an empty path,
    /// or whatever `edit` returns.
    pub fn modify<R, F>(&mut self, index: usize, path: &[&str], edit: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        self.modify_with(index, path, Op::Replace, edit)
    }

    /// Like [`modify`](Self::modify), recording `op` as the nested operation.
    ///
    /// # Errors
    ///
    /// Same as [`modify`](Self::modify).
    pub fn modify_with<R, F>(&mut self, index: usize, path: &[&str], op: Op, edit: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        if path.is_empty() {
            return Err(Error::invalid_transform(
                "nested modification requires a non-empty field path",
            ));
        }
        let Some(current) = self.items.get(index) else {
            return Err(self.out_of_bounds("modify", index));
        };

        let mut element = current.clone();
        let out = edit(&mut element)?;
        self.items[index] = element;
        self.diffs.push(Diff::Nested {
            index,
            path: path.iter().map(|segment| (*segment).to_string()).collect(),
            op,
        });
        Ok(out)
    }

    fn out_of_bounds(&self, action: &str, index: usize) -> Error {
        Error::invalid_transform(format!(
            "{action} index {index} out of bounds for length {}",
            self.items.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diffs(source: &VersionedVec<i32>, epoch: Epoch) -> Option<Vec<Diff<i32>>> {
        source
            .diffs_since(epoch)
            .into_diffs()
            .map(|diffs| diffs.into_iter().cloned().collect())
    }

    #[test]
    fn test_new_source_starts_at_epoch_zero() {
        let source = VersionedVec::new(vec![1, 2, 3], 4);
        assert_eq!(source.epoch(), 0);
        assert_eq!(source.value(), &[1, 2, 3]);
        assert_eq!(source.history_capacity(), 4);
        assert_eq!(diffs(&source, 0), Some(vec![]));
    }

    #[test]
    fn test_source_ids_are_unique() {
        let a = VersionedVec::new(vec![1], 1);
        let b = VersionedVec::new(vec![1], 1);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_update_records_diffs() {
        let mut source = VersionedVec::new(vec![1, 2, 3], 4);
        let epoch = source
            .update(|draft| {
                draft.push(4);
                draft.set(0, 9)?;
                draft.remove(1)?;
                Ok(())
            })
            .unwrap();

        assert_eq!(epoch, 1);
        assert_eq!(source.value(), &[9, 3, 4]);
        assert_eq!(
            diffs(&source, 0),
            Some(vec![
                Diff::Add { index: 3, value: 4 },
                Diff::Replace { index: 0, value: 9 },
                Diff::Remove { index: 1 },
            ])
        );
    }

    #[test]
    fn test_diffs_since_concatenates_epochs() {
        let mut source = VersionedVec::new(vec![], 4);
        source.update(|d| Ok(d.push(1))).unwrap();
        source.update(|d| Ok(d.push(2))).unwrap();

        assert_eq!(
            diffs(&source, 0),
            Some(vec![
                Diff::Add { index: 0, value: 1 },
                Diff::Add { index: 1, value: 2 },
            ])
        );
        assert_eq!(diffs(&source, 1), Some(vec![Diff::Add { index: 1, value: 2 }]));
        assert_eq!(diffs(&source, 2), Some(vec![]));
        assert!(source.diffs_since(3).is_exhausted());
    }

    #[test]
    fn test_history_evicts_oldest_batch() {
        let mut source = VersionedVec::new(vec![0], 1);
        for v in 1..=3 {
            source.update(|d| d.set(0, v).map(drop)).unwrap();
        }
        assert!(source.diffs_since(0).is_exhausted());
        assert!(source.diffs_since(1).is_exhausted());
        assert_eq!(diffs(&source, 2), Some(vec![Diff::Replace { index: 0, value: 3 }]));
    }

    #[test]
    fn test_zero_history_capacity() {
        let mut source = VersionedVec::new(vec![0], 0);
        source.update(|d| Ok(d.push(1))).unwrap();
        assert!(source.diffs_since(0).is_exhausted());
        assert_eq!(diffs(&source, 1), Some(vec![]));
    }

    #[test]
    fn test_empty_update_advances_epoch() {
        let mut source = VersionedVec::new(vec![1], 2);
        assert_eq!(source.update(|_| Ok(())).unwrap(), 1);
        assert_eq!(source.value(), &[1]);
        assert_eq!(diffs(&source, 0), Some(vec![]));
    }

    #[test]
    fn test_failed_update_commits_nothing() {
        let mut source = VersionedVec::new(vec![1, 2], 2);
        let err = source
            .update(|draft| {
                draft.push(3);
                draft.remove(7)?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, Error::InvalidTransform { .. }));
        assert_eq!(source.epoch(), 0);
        assert_eq!(source.value(), &[1, 2]);
        assert_eq!(diffs(&source, 0), Some(vec![]));
    }

    #[test]
    fn test_caller_error_passes_through() {
        let mut source = VersionedVec::new(vec![1], 2);
        let err = source
            .update(|draft| {
                draft.push(2);
                Err(Error::EmptyInput)
            })
            .unwrap_err();
        assert_eq!(err, Error::EmptyInput);
        assert_eq!(source.value(), &[1]);
    }

    #[test]
    fn test_draft_bounds_checks() {
        let mut source = VersionedVec::new(vec![1, 2], 2);
        source
            .update(|draft| {
                assert!(draft.insert(3, 0).is_err());
                assert!(draft.set(2, 0).is_err());
                assert!(draft.remove(2).is_err());
                assert!(draft.modify(2, &["x"], |_| Ok(())).is_err());
                assert!(draft.modify(0, &[], |_| Ok(())).is_err());
                assert!(draft.diffs().is_empty());
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_truncate_and_clear_record_length() {
        let mut source = VersionedVec::new(vec![1, 2, 3, 4], 4);
        source
            .update(|draft| {
                draft.truncate(10);
                draft.truncate(2);
                Ok(())
            })
            .unwrap();
        assert_eq!(source.value(), &[1, 2]);
        assert_eq!(diffs(&source, 0), Some(vec![Diff::Length { len: 2 }]));

        source.update(|draft| Ok(draft.clear())).unwrap();
        assert!(source.is_empty());
        assert_eq!(diffs(&source, 1), Some(vec![Diff::Length { len: 0 }]));

        source.update(|draft| Ok(draft.clear())).unwrap();
        assert_eq!(diffs(&source, 2), Some(vec![]));
    }

    #[test]
    fn test_pop_and_extend() {
        let mut source = VersionedVec::new(vec![1], 4);
        source
            .update(|draft| {
                draft.extend([2, 3]);
                assert_eq!(draft.pop(), Some(3));
                Ok(())
            })
            .unwrap();
        assert_eq!(source.value(), &[1, 2]);
        assert_eq!(
            diffs(&source, 0),
            Some(vec![
                Diff::Add { index: 1, value: 2 },
                Diff::Add { index: 2, value: 3 },
                Diff::Remove { index: 2 },
            ])
        );

        let mut empty: VersionedVec<i32> = VersionedVec::new(vec![], 1);
        empty
            .update(|draft| {
                assert_eq!(draft.pop(), None);
                Ok(())
            })
            .unwrap();
        assert_eq!(diffs(&empty, 0), Some(vec![]));
    }

    #[test]
    fn test_retain_records_evolving_indices() {
        let mut source = VersionedVec::new(vec![1, 2, 3, 4, 5], 2);
        source.update(|draft| Ok(draft.retain(|v| v % 2 == 1))).unwrap();
        assert_eq!(source.value(), &[1, 3, 5]);
        assert_eq!(
            diffs(&source, 0),
            Some(vec![Diff::Remove { index: 1 }, Diff::Remove { index: 2 }])
        );
    }

    #[test]
    fn test_modify_records_nested_diff() {
        let mut source = VersionedVec::new(vec![(1, 1), (2, 2)], 2);
        source
            .update(|draft| {
                let old = draft.modify(1, &["0"], |pair| Ok(std::mem::replace(&mut pair.0, 20)))?;
                assert_eq!(old, 2);
                Ok(())
            })
            .unwrap();
        assert_eq!(source.value(), &[(1, 1), (20, 2)]);

        match source.diffs_since(0) {
            DiffsSince::Diffs(d) => assert_eq!(
                d,
                vec![&Diff::Nested {
                    index: 1,
                    path: vec!["0".to_string()],
                    op: Op::Replace
                }]
            ),
            DiffsSince::Exhausted => panic!("history should be retained"),
        }
    }

    #[test]
    fn test_failed_modify_leaves_element() {
        let mut source = VersionedVec::new(vec![5], 2);
        source
            .update(|draft| {
                let result: Result<()> = draft.modify(0, &["v"], |v| {
                    *v = 99;
                    Err(Error::EmptyInput)
                });
                assert!(result.is_err());
                assert_eq!(draft.get(0), Some(&5));
                assert!(draft.diffs().is_empty());
                Ok(())
            })
            .unwrap();
        assert_eq!(source.value(), &[5]);
    }

    #[test]
    fn test_modify_with_records_op() {
        let mut source = VersionedVec::new(vec![0], 2);
        source
            .update(|draft| draft.modify_with(0, &["extra"], Op::Add, |_| Ok(())))
            .unwrap();
        let recorded = diffs(&source, 0).unwrap();
        assert_eq!(recorded[0].op(), Op::Add);
        assert_eq!(recorded[0].pointer(), "/0/extra");
    }
}
