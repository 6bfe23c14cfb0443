//! Shared test utilities for reactive-ta tests.
//!
//! Provides a small record type with nested fields, a set of draft edits
//! that can be generated randomly, and float comparison helpers.

use reactive_ta::reactive::Draft;
use reactive_ta::Result;

/// A source element with two fields that can be edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Rec {
    pub a: i64,
    pub b: i64,
}

impl Rec {
    #[allow(dead_code)]
    pub const fn new(a: i64) -> Self {
        Self { a, b: 0 }
    }
}

/// The mapper used by most view tests; depends on both fields.
#[allow(dead_code)]
pub fn project(rec: &Rec) -> i64 {
    rec.a * 3 - rec.b
}

/// One mutation applied through a draft.
///
/// Index arguments are reduced modulo the draft length when applied, so any
/// generated edit is valid against any non-empty draft.
#[derive(Debug, Clone)]
pub enum Edit {
    Push(i64),
    Insert(usize, i64),
    Set(usize, i64),
    Remove(usize),
    Pop,
    Truncate(usize),
    Clear,
    RetainEven,
    ModifyA(usize, i64),
    ModifyB(usize, i64),
}

/// Applies `edit` to `draft`; index-based edits on an empty draft do nothing.
#[allow(dead_code)]
pub fn apply_edit(draft: &mut Draft<Rec>, edit: &Edit) -> Result<()> {
    let len = draft.len();
    match *edit {
        Edit::Push(v) => draft.push(Rec::new(v)),
        Edit::Insert(i, v) => draft.insert(i % (len + 1), Rec::new(v))?,
        Edit::Pop => {
            draft.pop();
        }
        Edit::Truncate(n) => draft.truncate(n),
        Edit::Clear => draft.clear(),
        Edit::RetainEven => draft.retain(|rec| rec.a % 2 == 0),
        _ if len == 0 => {}
        Edit::Set(i, v) => {
            draft.set(i % len, Rec::new(v))?;
        }
        Edit::Remove(i) => {
            draft.remove(i % len)?;
        }
        Edit::ModifyA(i, v) => draft.modify(i % len, &["a"], |rec| {
            rec.a = v;
            Ok(())
        })?,
        Edit::ModifyB(i, v) => draft.modify(i % len, &["b"], |rec| {
            rec.b = v;
            Ok(())
        })?,
    }
    Ok(())
}

/// Records built from plain values.
#[allow(dead_code)]
pub fn recs(values: &[i64]) -> Vec<Rec> {
    values.iter().copied().map(Rec::new).collect()
}

/// Approximate equality check for floating-point values.
///
/// Two NaN values are considered equal for testing purposes.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;
    use reactive_ta::reactive::VersionedVec;

    #[test]
    fn test_apply_edit_on_empty_draft() {
        let mut source: VersionedVec<Rec> = VersionedVec::new(vec![], 1);
        source
            .update(|draft| {
                apply_edit(draft, &Edit::Set(3, 1))?;
                apply_edit(draft, &Edit::ModifyA(0, 1))?;
                apply_edit(draft, &Edit::Insert(9, 4))
            })
            .unwrap();
        assert_eq!(source.value(), recs(&[4]).as_slice());
    }

    #[test]
    fn test_approx_eq_nan() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
    }
}
