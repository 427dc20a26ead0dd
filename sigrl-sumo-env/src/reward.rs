//! Reward of a decision.

/// Decrease of the total queue: `sum(before) - sum(after)`.
///
/// # Panics
///
/// Panics if the lengths of `before` and `after` differ.
pub fn reward<T: Copy + Into<f32>>(before: &[T], after: &[T]) -> f32 {
    assert_eq!(
        before.len(),
        after.len(),
        "observations of different lengths"
    );
    let total = |v: &[T]| v.iter().map(|&x| x.into()).sum::<f32>();
    total(before) - total(after)
}
