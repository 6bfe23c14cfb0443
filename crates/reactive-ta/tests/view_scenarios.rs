//! Scenario tests for incremental mapped views.
//!
//! Each test drives a source through a fixed sequence of updates and checks
//! the view against a fresh `map` of the source.

#![allow(clippy::float_cmp)]

mod common;

use chrono::{TimeZone, Utc};
use common::{apply_edit, project, recs, Edit, Rec};
use reactive_ta::prelude::*;

fn full_remap<T, U>(source: &[T], mapper: impl Fn(&T) -> U) -> Vec<U> {
    source.iter().map(mapper).collect()
}

// ==================== Equivalence ====================

#[test]
fn test_view_matches_full_remap_after_every_update() {
    let mut source = VersionedVec::new(recs(&[5, 1, 4]), 8);
    let mut view = MappedView::new(&source, project, 8);

    let script = [
        Edit::Push(7),
        Edit::Insert(0, 2),
        Edit::ModifyB(2, 9),
        Edit::Remove(1),
        Edit::RetainEven,
        Edit::Set(0, 11),
        Edit::Truncate(1),
        Edit::Clear,
        Edit::Push(3),
    ];
    for edit in &script {
        source.update(|draft| apply_edit(draft, edit)).unwrap();
        assert_eq!(
            view.value(&source).unwrap(),
            full_remap(source.value(), project).as_slice(),
            "after {edit:?}"
        );
    }
}

// ==================== Idempotence ====================

#[test]
fn test_value_is_idempotent() {
    let mut source = VersionedVec::new(vec![1, 2, 3], 4);
    let mut view = MappedView::new(&source, |v: &i32| v * v, 4);
    source.update(|draft| draft.set(2, 5).map(drop)).unwrap();

    let first = view.value(&source).unwrap().to_vec();
    let computed = view.last_computed_epoch();
    let epoch = view.epoch();

    let second = view.value(&source).unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(view.last_computed_epoch(), computed);
    assert_eq!(view.epoch(), epoch);
    assert_eq!(source.epoch(), 1);
}

// ==================== History Exhaustion ====================

#[test]
fn test_history_of_one_forces_full_remap() {
    let mut source = VersionedVec::new(vec![1, 2, 3], 1);
    let mut view = MappedView::new(&source, |v: &i32| v * 10, 1);
    view.value(&source).unwrap();

    source.update(|draft| draft.insert(0, 0)).unwrap();
    source.update(|draft| draft.remove(3).map(drop)).unwrap();
    source.update(|draft| draft.set(1, 7).map(drop)).unwrap();

    assert!(source.diffs_since(0).is_exhausted());
    assert_eq!(view.value(&source).unwrap(), &[0, 70, 20]);
    assert_eq!(view.last_computed_epoch(), Some(3));
}

#[test]
fn test_history_of_zero_always_remaps() {
    let mut source = VersionedVec::new(vec![1], 0);
    let mut view = MappedView::new(&source, |v: &i32| v + 1, 0);
    for v in 2..6 {
        source
            .update(|draft| {
                draft.push(v);
                Ok(())
            })
            .unwrap();
        assert_eq!(
            view.value(&source).unwrap(),
            full_remap(source.value(), |v| v + 1).as_slice()
        );
    }
}

// ==================== Insertion and Removal ====================

#[test]
fn test_insertion_ordering() {
    let mut source = VersionedVec::new(vec![1, 2, 3], 4);
    let mut view = MappedView::new(&source, |v: &i32| v * 2, 4);
    view.value(&source).unwrap();

    source.update(|draft| draft.insert(1, 10)).unwrap();
    assert_eq!(source.value(), &[1, 10, 2, 3]);
    assert_eq!(view.value(&source).unwrap(), &[2, 20, 4, 6]);
}

#[test]
fn test_consecutive_inserts_in_one_batch() {
    let mut source = VersionedVec::new(vec![1, 2, 3], 4);
    let mut view = MappedView::new(&source, |v: &i32| v * 2, 4);
    view.value(&source).unwrap();

    source
        .update(|draft| {
            draft.insert(1, 10)?;
            draft.insert(1, 20)?;
            draft.insert(5, 30)
        })
        .unwrap();
    assert_eq!(view.value(&source).unwrap(), &[2, 40, 20, 4, 6, 60]);
}

#[test]
fn test_removal() {
    let mut source = VersionedVec::new(vec![1, 2, 3], 4);
    let mut view = MappedView::new(&source, |v: &i32| *v, 4);
    view.value(&source).unwrap();

    source.update(|draft| draft.remove(0).map(drop)).unwrap();
    assert_eq!(view.value(&source).unwrap(), &[2, 3]);
}

// ==================== Deep Replace ====================

#[test]
fn test_deep_replace_reads_live_element() {
    let mut source = VersionedVec::new(recs(&[1, 1]), 4);
    let mut view = MappedView::new(&source, |r: &Rec| r.a, 4);
    view.value(&source).unwrap();

    source
        .update(|draft| {
            draft.modify(1, &["a"], |rec| {
                rec.a = 5;
                Ok(())
            })
        })
        .unwrap();
    assert_eq!(view.value(&source).unwrap(), &[1, 5]);
}

#[test]
fn test_deep_replace_across_epochs() {
    let mut source = VersionedVec::new(recs(&[1, 2, 3]), 4);
    let mut view = MappedView::new(&source, project, 4);
    view.value(&source).unwrap();

    // A nested edit followed, in a later epoch, by a removal before it.
    source
        .update(|draft| {
            draft.modify(2, &["b"], |rec| {
                rec.b = 4;
                Ok(())
            })
        })
        .unwrap();
    source.update(|draft| draft.remove(0).map(drop)).unwrap();

    assert_eq!(view.value(&source).unwrap(), &[6, 5]);
}

// ==================== No-op Batch ====================

#[test]
fn test_noop_batch_keeps_value_and_advances_epoch() {
    let mut source = VersionedVec::new(vec![4, 5], 4);
    let mut view = MappedView::new(&source, |v: &i32| -v, 4);
    let before = view.value(&source).unwrap().to_vec();

    let epoch = source.update(|_| Ok(())).unwrap();
    assert_eq!(epoch, 1);
    assert_eq!(view.value(&source).unwrap(), before.as_slice());
    assert_eq!(view.last_computed_epoch(), Some(1));
}

// ==================== Failures ====================

#[test]
fn test_failed_update_is_invisible_to_views() {
    let mut source = VersionedVec::new(vec![1, 2], 4);
    let mut view = MappedView::new(&source, |v: &i32| *v, 4);
    view.value(&source).unwrap();

    let result = source.update(|draft| {
        draft.push(3);
        draft.set(9, 0).map(drop)
    });
    assert!(matches!(result, Err(Error::InvalidTransform { .. })));
    assert_eq!(view.value(&source).unwrap(), &[1, 2]);
    assert_eq!(view.last_computed_epoch(), Some(0));
}

#[test]
fn test_mapper_failure_surfaces_and_recovers() {
    let mut source = VersionedVec::new(vec![4.0_f64, 9.0], 4);
    let mut roots = MappedView::try_new(
        &source,
        |v: &f64| {
            if *v < 0.0 {
                Err(format!("cannot take the root of {v}"))
            } else {
                Ok(v.sqrt())
            }
        },
        4,
    );
    assert_eq!(roots.value(&source).unwrap(), &[2.0, 3.0]);

    source
        .update(|draft| {
            draft.push(-1.0);
            Ok(())
        })
        .unwrap();
    let err = roots.value(&source).unwrap_err();
    assert_eq!(
        err,
        Error::MapperFailure {
            index: 2,
            reason: "cannot take the root of -1".to_string()
        }
    );
    assert_eq!(roots.current_value(), &[2.0, 3.0]);

    source.update(|draft| draft.set(2, 16.0).map(drop)).unwrap();
    assert_eq!(roots.value(&source).unwrap(), &[2.0, 3.0, 4.0]);
}

#[test]
fn test_view_rejects_foreign_source() {
    let source = VersionedVec::new(vec![1], 4);
    let other = VersionedVec::new(vec![1], 4);
    let mut view = MappedView::new(&source, |v: &i32| *v, 4);
    assert_eq!(view.value(&other).unwrap_err(), Error::SourceMismatch);
}

// ==================== Chaining ====================

#[test]
fn test_chained_view_with_short_upstream_history() {
    let mut source = VersionedVec::new(vec![1, 2, 3], 8);
    let mut doubled = MappedView::new(&source, |v: &i32| v * 2, 1);
    let mut plus_one = MappedView::new(&doubled, |v: &i32| v + 1, 8);
    doubled.value(&source).unwrap();
    plus_one.value(&doubled).unwrap();

    // Two upstream evaluations between downstream reads overflow a history of one.
    for v in [4, 5] {
        source
            .update(|draft| {
                draft.push(v);
                Ok(())
            })
            .unwrap();
        doubled.value(&source).unwrap();
    }
    assert_eq!(plus_one.value(&doubled).unwrap(), &[3, 5, 7, 9, 11]);
}

// ==================== Quotes ====================

#[test]
fn test_quote_price_views() {
    let day = |d| Utc.with_ymd_and_hms(2024, 2, d, 0, 0, 0).unwrap();
    let bars = vec![
        Quote::new(day(1), 10.0, 12.0, 9.0, 11.0, 100.0).unwrap(),
        Quote::new(day(2), 11.0, 13.0, 10.0, 12.0, 150.0).unwrap(),
        Quote::new(day(5), 12.0, 12.5, 11.0, 11.5, 120.0).unwrap(),
    ];
    let mut quotes = Quotes::new(bars, DEFAULT_HISTORY_CAPACITY).unwrap();
    let mut closes = quotes.price_view(CandlePart::Close);
    let mut volumes = quotes.price_view(CandlePart::Volume);
    assert_eq!(closes.value(&quotes).unwrap(), &[11.0, 12.0, 11.5]);

    quotes
        .upsert(Quote::new(day(3), 12.0, 12.2, 11.8, 12.1, 90.0).unwrap())
        .unwrap();
    quotes.amend_close(0, 11.5).unwrap();

    assert_eq!(closes.value(&quotes).unwrap(), &[11.5, 12.0, 12.1, 11.5]);
    assert_eq!(volumes.value(&quotes).unwrap(), &[100.0, 150.0, 90.0, 120.0]);

    let mut sma: Sma<f64> = Sma::new(2).unwrap();
    let smoothed = sma.feed(closes.value(&quotes).unwrap().iter().copied());
    assert!(smoothed[0].is_nan());
    assert!(common::approx_eq(smoothed[1], 11.75, common::EPSILON));
    assert!(common::approx_eq(smoothed[3], 11.8, common::EPSILON));
}
