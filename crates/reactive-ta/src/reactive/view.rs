//! Incrementally maintained mapped views.
//!
//! A [`MappedView`] keeps `source.map(mapper)` up to date by replaying the
//! source's diffs onto its previous value instead of remapping every element.
//! Evaluation is lazy: nothing happens until [`MappedView::value`] is called.
//!
//! # Recompute
//!
//! 1. Never evaluated: map every source element.
//! 2. Source unchanged since the last evaluation: return the cached value.
//! 3. Otherwise ask the source for the diffs since the last evaluated epoch.
//!    If its history no longer reaches that far, remap everything. If not,
//!    apply the diffs in emission order to a working copy:
//!    - `Add`/`Replace` map the diff's payload;
//!    - `Remove` drops the slot;
//!    - `Length` truncates, or extends with stale slots;
//!    - `Nested` marks the slot stale.
//!
//!    Stale slots move with later inserts and removes, and are remapped from
//!    the live source element at their final index once the whole batch is
//!    applied. The working copy is committed only if every mapper call
//!    succeeded. A mapper failure while replaying is retried as a full
//!    remap, so a payload that was overwritten later in the history cannot
//!    fail the evaluation.
//!
//! # Chaining
//!
//! Each evaluation that changes the view records the equivalent batch of
//! derived diffs, so a view is itself a [`DiffSource`] and another view can
//! be built on top of it. Evaluate the upstream view before the downstream
//! one.
//!
//! ```
//! use reactive_ta::reactive::{MappedView, VersionedVec};
//!
//! let mut source = VersionedVec::new(vec![1, 2, 3], 16);
//! let mut doubled = MappedView::new(&source, |v: &i32| v * 2, 16);
//! let mut labels = MappedView::new(&doubled, |v: &i32| format!("#{v}"), 16);
//!
//! assert_eq!(doubled.value(&source).unwrap(), &[2, 4, 6]);
//!
//! source.update(|draft| draft.insert(1, 10)).unwrap();
//! assert_eq!(doubled.value(&source).unwrap(), &[2, 20, 4, 6]);
//! assert_eq!(labels.value(&doubled).unwrap(), &["#2", "#20", "#4", "#6"]);
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::reactive::diff::{Diff, DiffBatch, Epoch};
use crate::reactive::history::HistoryBuffer;
use crate::reactive::source::{DiffSource, DiffsSince, SourceId};

type Mapper<T, U> = Box<dyn Fn(&T) -> std::result::Result<U, String>>;

/// A derived sequence maintained from a [`DiffSource`] through a mapper.
pub struct MappedView<T, U> {
    id: SourceId,
    source: SourceId,
    mapper: Mapper<T, U>,
    value: Vec<U>,
    computed: Option<Epoch>,
    epoch: Epoch,
    history: HistoryBuffer<Diff<U>>,
}

/// A working-copy slot during incremental application.
enum Slot<U> {
    Mapped(U),
    Stale,
}

/// Outcome of replaying one batch onto the working copy.
enum Applied<U> {
    Updated { value: Vec<U>, batch: DiffBatch<U>, stale: usize },
    Diverged(&'static str),
}

impl<T, U: Clone> MappedView<T, U> {
    /// Creates an unevaluated view of `source` through an infallible mapper.
    ///
    /// `history_capacity` bounds the view's own diff history, used by views
    /// chained on top of this one.
    pub fn new<S, F>(source: &S, mapper: F, history_capacity: usize) -> Self
    where
        S: DiffSource<Item = T> + ?Sized,
        F: Fn(&T) -> U + 'static,
    {
        Self::with_mapper(
            source.source_id(),
            Box::new(move |item| Ok(mapper(item))),
            history_capacity,
        )
    }

    /// Creates an unevaluated view of `source` through a fallible mapper.
    ///
    /// A mapper error surfaces from [`value`](Self::value) as
    /// `Error::MapperFailure`, carrying the error's display text.
    pub fn try_new<S, F, E>(source: &S, mapper: F, history_capacity: usize) -> Self
    where
        S: DiffSource<Item = T> + ?Sized,
        F: Fn(&T) -> std::result::Result<U, E> + 'static,
        E: fmt::Display,
    {
        Self::with_mapper(
            source.source_id(),
            Box::new(move |item| mapper(item).map_err(|e| e.to_string())),
            history_capacity,
        )
    }

    fn with_mapper(source: SourceId, mapper: Mapper<T, U>, history_capacity: usize) -> Self {
        Self {
            id: SourceId::next(),
            source,
            mapper,
            value: Vec::new(),
            computed: None,
            epoch: 0,
            history: HistoryBuffer::new(history_capacity, 0),
        }
    }

    /// Brings the view up to date with `source` and returns it.
    ///
    /// Calling this again without a source update returns the cached value.
    ///
    /// # Errors
    ///
    /// - `Error::SourceMismatch` if `source` is not the one the view was built for
    /// - `Error::MapperFailure` if the mapper fails; the view keeps its
    ///   previous value and epoch
    pub fn value<S>(&mut self, source: &S) -> Result<&[U]>
    where
        S: DiffSource<Item = T> + ?Sized,
    {
        if source.source_id() != self.source {
            return Err(Error::SourceMismatch);
        }

        let current = source.current_epoch();
        match self.computed {
            Some(epoch) if epoch == current => {}
            Some(epoch) => self.recompute(source, epoch, current)?,
            None => self.remap(source, current)?,
        }
        Ok(&self.value)
    }

    /// The source epoch the view was last evaluated at.
    #[must_use]
    pub const fn last_computed_epoch(&self) -> Option<Epoch> {
        self.computed
    }

    /// True once the view has been evaluated at least once.
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        self.computed.is_some()
    }

    /// The view's own epoch, advanced by every evaluation that changed it.
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn recompute<S>(&mut self, source: &S, from: Epoch, current: Epoch) -> Result<()>
    where
        S: DiffSource<Item = T> + ?Sized,
    {
        let DiffsSince::Diffs(diffs) = source.diffs_since(from) else {
            warn!(
                requested_epoch = from,
                current_epoch = current,
                history_capacity = source.history_capacity(),
                "diff history exhausted, remapping view"
            );
            return self.remap(source, current);
        };

        let applied = match self.apply(&diffs, source.current_value()) {
            Ok(applied) => applied,
            Err(err) => {
                debug!(%err, "incremental recompute failed, retrying as full remap");
                return self.remap(source, current);
            }
        };
        match applied {
            Applied::Updated { value, batch, stale } => {
                debug!(
                    from_epoch = from,
                    to_epoch = current,
                    diffs = diffs.len(),
                    stale,
                    "incremental recompute"
                );
                self.value = value;
                self.computed = Some(current);
                self.epoch += 1;
                self.history.push(self.epoch, batch);
                Ok(())
            }
            Applied::Diverged(reason) => {
                warn!(
                    from_epoch = from,
                    to_epoch = current,
                    reason,
                    "diffs do not match source, remapping view"
                );
                self.remap(source, current)
            }
        }
    }

    /// Replays `diffs` onto a copy of the current value.
    fn apply(&self, diffs: &[&Diff<T>], live: &[T]) -> Result<Applied<U>> {
        let mut work: Vec<Slot<U>> = self.value.iter().cloned().map(Slot::Mapped).collect();
        let mut batch = Vec::with_capacity(diffs.len());

        for diff in diffs {
            match diff {
                Diff::Add { index, value } => {
                    if *index > work.len() {
                        return Ok(Applied::Diverged("add index out of range"));
                    }
                    let mapped = self.map(*index, value)?;
                    batch.push(Diff::Add {
                        index: *index,
                        value: mapped.clone(),
                    });
                    work.insert(*index, Slot::Mapped(mapped));
                }
                Diff::Replace { index, value } => {
                    if *index >= work.len() {
                        return Ok(Applied::Diverged("replace index out of range"));
                    }
                    let mapped = self.map(*index, value)?;
                    batch.push(Diff::Replace {
                        index: *index,
                        value: mapped.clone(),
                    });
                    work[*index] = Slot::Mapped(mapped);
                }
                Diff::Remove { index } => {
                    if *index >= work.len() {
                        return Ok(Applied::Diverged("remove index out of range"));
                    }
                    work.remove(*index);
                    batch.push(Diff::Remove { index: *index });
                }
                Diff::Length { len } => {
                    work.resize_with(*len, || Slot::Stale);
                    batch.push(Diff::Length { len: *len });
                }
                Diff::Nested { index, .. } => {
                    if *index >= work.len() {
                        return Ok(Applied::Diverged("nested index out of range"));
                    }
                    work[*index] = Slot::Stale;
                }
            }
        }

        if work.len() != live.len() {
            return Ok(Applied::Diverged("final length differs from source"));
        }

        let mut stale = 0;
        let mut value = Vec::with_capacity(work.len());
        for (index, slot) in work.into_iter().enumerate() {
            match slot {
                Slot::Mapped(mapped) => value.push(mapped),
                Slot::Stale => {
                    let mapped = self.map(index, &live[index])?;
                    batch.push(Diff::Replace {
                        index,
                        value: mapped.clone(),
                    });
                    value.push(mapped);
                    stale += 1;
                }
            }
        }

        Ok(Applied::Updated { value, batch, stale })
    }

    fn remap<S>(&mut self, source: &S, current: Epoch) -> Result<()>
    where
        S: DiffSource<Item = T> + ?Sized,
    {
        let value = source
            .current_value()
            .iter()
            .enumerate()
            .map(|(index, item)| self.map(index, item))
            .collect::<Result<Vec<U>>>()?;

        debug!(epoch = current, len = value.len(), "full remap");
        self.value = value;
        self.computed = Some(current);
        self.epoch += 1;
        self.history.clear(self.epoch);
        Ok(())
    }

    fn map(&self, index: usize, item: &T) -> Result<U> {
        (self.mapper)(item).map_err(|reason| Error::MapperFailure { index, reason })
    }
}

impl<T, U> DiffSource for MappedView<T, U> {
    type Item = U;

    fn source_id(&self) -> SourceId {
        self.id
    }

    fn current_epoch(&self) -> Epoch {
        self.epoch
    }

    fn current_value(&self) -> &[U] {
        &self.value
    }

    fn diffs_since(&self, epoch: Epoch) -> DiffsSince<'_, U> {
        self.history
            .since(epoch)
            .map_or(DiffsSince::Exhausted, DiffsSince::Diffs)
    }

    fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
}

impl<T, U: fmt::Debug> fmt::Debug for MappedView<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedView")
            .field("source", &self.source)
            .field("computed", &self.computed)
            .field("epoch", &self.epoch)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
