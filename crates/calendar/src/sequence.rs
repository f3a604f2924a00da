//! Month sequence generation.

use crate::month::ModelMonth;

/// Generates a contiguous sequence of model months.
///
/// Starting from `start`, produces exactly `n_months` consecutive months.
/// Year boundaries are handled automatically (December wraps to January of
/// the following year).
///
/// # Example
///
/// ```ignore
/// let start = ModelMonth::new(1, 11).unwrap();
/// let months = month_sequence(start, 3);
/// // 0001-11, 0001-12, 0002-01
/// ```
pub fn month_sequence(start: ModelMonth, n_months: usize) -> Vec<ModelMonth> {
    let mut months = Vec::with_capacity(n_months);
    if n_months == 0 {
        return months;
    }
    months.push(start);
    let mut current = start;
    for _ in 1..n_months {
        current = current.next();
        months.push(current);
    }
    months
}
