//! Input cleaning for numeric samples.
//!
//! Missing values arrive as `NaN` and are dropped. Infinite values cannot be
//! binned or scaled, so they are rejected instead.

use crate::{DriftError, Side};

/// Returns the finite values of `values` sorted in ascending order.
///
/// `NaN` entries are treated as missing and skipped.
///
/// # Errors
///
/// - [`DriftError::NonFiniteValue`] if an infinite value is present
/// - [`DriftError::EmptyInput`] if no value remains
///
/// # Examples
///
/// ```
/// use driftwise_stats::{Side, sample::sorted_finite};
///
/// let sorted = sorted_finite(&[3.0, f64::NAN, 1.0, 2.0], Side::Train).unwrap();
/// assert_eq!(sorted, vec![1.0, 2.0, 3.0]);
/// assert!(sorted_finite(&[f64::NAN], Side::Test).is_err());
/// ```
pub fn sorted_finite(values: &[f64], side: Side) -> Result<Vec<f64>, DriftError> {
    let mut sorted = Vec::with_capacity(values.len());
    for &value in values {
        if value.is_nan() {
            continue;
        }
        if value.is_infinite() {
            return Err(DriftError::NonFiniteValue { side, value });
        }
        sorted.push(value);
    }
    if sorted.is_empty() {
        return Err(DriftError::EmptyInput { side });
    }
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}
