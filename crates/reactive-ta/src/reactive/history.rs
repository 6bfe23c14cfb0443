//! Bounded history of diff batches.
//!
//! [`HistoryBuffer`] keeps the batches of the most recent `capacity` epochs
//! in a fixed array addressed by `epoch % capacity`. Pushing a batch once
//! the array is full overwrites the oldest one, which is then gone for good.
//!
//! # Example
//!
//! ```
//! use reactive_ta::reactive::HistoryBuffer;
//!
//! let mut history: HistoryBuffer<char> = HistoryBuffer::new(2, 0);
//! history.push(1, vec!['a']);
//! history.push(2, vec!['b', 'c']);
//! history.push(3, vec!['d']);
//!
//! // Epoch 1's batch was evicted, so diffs since epoch 0 are unavailable.
//! assert!(history.since(0).is_none());
//! let since_1: Vec<char> = history.since(1).unwrap().into_iter().copied().collect();
//! assert_eq!(since_1, vec!['b', 'c', 'd']);
//! ```

use crate::reactive::diff::Epoch;

/// Fixed-capacity ring of per-epoch batches.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<D> {
    slots: Vec<Option<Vec<D>>>,
    newest: Epoch,
    retained: usize,
}

impl<D> HistoryBuffer<D> {
    /// Creates an empty history whose newest known epoch is `baseline`.
    ///
    /// A capacity of zero keeps no batches at all.
    #[must_use]
    pub fn new(capacity: usize, baseline: Epoch) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            newest: baseline,
            retained: 0,
        }
    }

    /// Maximum number of batches retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of batches currently retained.
    #[must_use]
    pub const fn retained(&self) -> usize {
        self.retained
    }

    /// The epoch of the most recent batch (or the baseline).
    #[must_use]
    pub const fn newest_epoch(&self) -> Epoch {
        self.newest
    }

    /// The oldest epoch from which [`since`](Self::since) can still answer.
    #[must_use]
    pub const fn oldest_epoch(&self) -> Epoch {
        self.newest - self.retained as Epoch
    }

    /// Records the batch that produced `epoch`, evicting the oldest if full.
    ///
    /// `epoch` must be exactly one past the newest epoch.
    pub fn push(&mut self, epoch: Epoch, batch: Vec<D>) {
        debug_assert_eq!(epoch, self.newest + 1, "history epochs must be consecutive");
        self.newest = epoch;
        if let Some(slot) = self.slot_index(epoch) {
            self.slots[slot] = Some(batch);
            self.retained = (self.retained + 1).min(self.slots.len());
        }
    }

    /// Flattened batches for every epoch in `(epoch, newest]`, oldest first.
    ///
    /// Returns an empty list when `epoch` is the newest epoch, and `None`
    /// when `epoch` is older than the retained window or newer than the
    /// newest epoch.
    #[must_use]
    pub fn since(&self, epoch: Epoch) -> Option<Vec<&D>> {
        if epoch > self.newest || epoch < self.oldest_epoch() {
            return None;
        }
        let mut flat = Vec::new();
        for e in epoch + 1..=self.newest {
            let batch = self.slot_index(e).and_then(|slot| self.slots[slot].as_ref())?;
            flat.extend(batch.iter());
        }
        Some(flat)
    }

    /// Drops every retained batch and restarts the history at `baseline`.
    pub fn clear(&mut self, baseline: Epoch) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.newest = baseline;
        self.retained = 0;
    }

    fn slot_index(&self, epoch: Epoch) -> Option<usize> {
        let capacity = self.slots.len() as Epoch;
        (capacity > 0).then(|| (epoch % capacity) as usize)
    }
}
