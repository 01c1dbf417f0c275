/// Computes a quantile from sorted data.
///
/// Uses linear interpolation between the two closest ranks: for `n` values the
/// quantile `q` sits at position `q * (n - 1)`, and fractional positions blend
/// the neighbouring values.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `quantile` - The quantile to compute (0.0 to 1.0)
///
/// # Returns
///
/// The interpolated value. Returns `f64::NAN` if the input is empty.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order.
///
/// # Examples
///
/// ```
/// use driftwise_stats::percentiles::compute_quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_quantile(&values, 0.5), 3.0);
/// assert_eq!(compute_quantile(&values, 0.125), 1.5);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_quantile(sorted_values: &[f64], quantile: f64) -> f64 {
    assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return f64::NAN;
    };

    let position = quantile.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}

/// Returns the `(margin, 1 - margin)` quantile pair of sorted data.
///
/// # Examples
///
/// ```
/// use driftwise_stats::percentiles::margin_bounds;
///
/// let values: Vec<f64> = (0..=100).map(f64::from).collect();
/// assert_eq!(margin_bounds(&values, 0.05), (5.0, 95.0));
/// ```
#[must_use]
pub fn margin_bounds(sorted_values: &[f64], margin: f64) -> (f64, f64) {
    (
        compute_quantile(sorted_values, margin),
        compute_quantile(sorted_values, 1.0 - margin),
    )
}
