use std::ops::Range;

use crate::{DriftError, Side, sample};

/// A histogram representation of a sample's distribution.
///
/// The histogram divides a fixed range into equal-width bins and counts the
/// values falling into each bin. Two histograms built over the same range and
/// bin count share their support and can be compared bin by bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    /// The last bin's end is nudged past the upper bound so that it is included.
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates an equal-width histogram over `[min, max]`.
    ///
    /// Values outside the bounds are clamped into the first or last bin. When
    /// `min == max` a single bin holds every value, whatever `num_bins` says.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to count
    /// * `num_bins` - The number of bins to create
    /// * `min` - Lower bound of the first bin
    /// * `max` - Upper bound of the last bin (inclusive)
    ///
    /// # Examples
    ///
    /// ```
    /// # use driftwise_stats::histogram::Histogram;
    /// let histogram = Histogram::with_bounds(&[0.0, 0.5, 1.0, 1.5, 2.0], 2, 0.0, 2.0);
    /// let counts: Vec<_> = histogram.bins.iter().map(|bin| bin.count).collect();
    /// assert_eq!(counts, vec![2, 3]);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn with_bounds(values: &[f64], num_bins: usize, min: f64, max: f64) -> Self {
        assert!(num_bins > 0, "num_bins must be positive");
        assert!(min <= max, "min must not exceed max");

        let range = max - min;
        if range < f64::EPSILON * max.abs().max(1.0) {
            // All values collapse onto one point
            return Self {
                bins: vec![HistogramBin {
                    range: min..max.next_up(),
                    count: values.len() as u64,
                }],
            };
        }

        let bin_width = range / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|bin_idx| {
                // Recompute boundaries from the origin to avoid accumulation errors
                let start = min + range * (bin_idx as f64) / num_bins as f64;
                let end = if bin_idx == num_bins - 1 {
                    max.next_up()
                } else {
                    min + range * ((bin_idx + 1) as f64) / num_bins as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        for &val in values {
            let normalized_position = (val - min) / bin_width;
            let idx = if normalized_position <= 0.0 {
                0
            } else {
                (normalized_position.floor() as usize).min(num_bins - 1)
            };
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Total number of values counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Bin counts divided by the total, or all zeros for an empty histogram.
    ///
    /// # Examples
    ///
    /// ```
    /// # use driftwise_stats::histogram::Histogram;
    /// let histogram = Histogram::with_bounds(&[0.0, 0.0, 0.0, 1.0], 2, 0.0, 1.0);
    /// assert_eq!(histogram.probabilities(), vec![0.75, 0.25]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.bins.len()];
        }
        self.bins
            .iter()
            .map(|bin| bin.count as f64 / total as f64)
            .collect()
    }
}

/// A pair of histograms binned over the combined range of two samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedHistogram {
    pub train: Histogram,
    pub test: Histogram,
}

impl SharedHistogram {
    /// Bins both samples over `[min(train ∪ test), max(train ∪ test)]`.
    ///
    /// Missing values (`NaN`) are ignored.
    ///
    /// # Errors
    ///
    /// - [`DriftError::ZeroBins`] if `num_bins` is zero
    /// - [`DriftError::EmptyInput`] / [`DriftError::NonFiniteValue`] from
    ///   [`sample::sorted_finite`]
    ///
    /// # Examples
    ///
    /// ```
    /// # use driftwise_stats::histogram::SharedHistogram;
    /// let shared = SharedHistogram::new(&[0.0, 1.0], &[2.0, 3.0], 3).unwrap();
    /// assert_eq!(shared.train.bins.len(), 3);
    /// assert_eq!(shared.test.bins[2].count, 2);
    /// ```
    pub fn new(train: &[f64], test: &[f64], num_bins: usize) -> Result<Self, DriftError> {
        if num_bins == 0 {
            return Err(DriftError::ZeroBins);
        }
        let train = sample::sorted_finite(train, Side::Train)?;
        let test = sample::sorted_finite(test, Side::Test)?;
        Ok(Self::from_sorted(&train, &test, num_bins))
    }

    /// Bins two pre-cleaned, pre-sorted, non-empty samples.
    ///
    /// # Panics
    ///
    /// Panics if either sample is empty or `num_bins` is zero.
    #[must_use]
    pub fn from_sorted(train: &[f64], test: &[f64], num_bins: usize) -> Self {
        let min = f64::min(train[0], test[0]);
        let max = f64::max(train[train.len() - 1], test[test.len() - 1]);
        Self {
            train: Histogram::with_bounds(train, num_bins, min, max),
            test: Histogram::with_bounds(test, num_bins, min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(histogram: &Histogram) -> Vec<u64> {
        histogram.bins.iter().map(|bin| bin.count).collect()
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let histogram = Histogram::with_bounds(&[0.0, 10.0], 5, 0.0, 10.0);
        assert_eq!(counts(&histogram), vec![1, 0, 0, 0, 1]);
        assert!(histogram.bins[4].range.contains(&10.0));
    }

    #[test]
    fn test_bins_are_contiguous() {
        let histogram = Histogram::with_bounds(&[], 4, -1.0, 3.0);
        for pair in histogram.bins.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }
        assert_eq!(histogram.bins[0].range.start, -1.0);
    }

    #[test]
    fn test_each_value_in_its_bin() {
        let values = [0.1, 0.25, 0.5, 0.75, 0.9, 0.99];
        let histogram = Histogram::with_bounds(&values, 4, 0.0, 1.0);
        assert_eq!(histogram.total(), 6);
        for &value in &values {
            let containing = histogram
                .bins
                .iter()
                .filter(|bin| bin.range.contains(&value))
                .count();
            assert_eq!(containing, 1, "value {value} should be in exactly one bin");
        }
    }

    #[test]
    fn test_zero_range_single_bin() {
        let histogram = Histogram::with_bounds(&[3.0, 3.0, 3.0], 10, 3.0, 3.0);
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.probabilities(), vec![1.0]);
    }

    #[test]
    fn test_shared_support() {
        let shared = SharedHistogram::new(&[0.0, 1.0, 2.0], &[8.0, 9.0, 10.0], 5).unwrap();
        let train_ranges: Vec<_> = shared.train.bins.iter().map(|b| b.range.clone()).collect();
        let test_ranges: Vec<_> = shared.test.bins.iter().map(|b| b.range.clone()).collect();
        assert_eq!(train_ranges, test_ranges);
        assert_eq!(counts(&shared.train), vec![2, 1, 0, 0, 0]);
        assert_eq!(counts(&shared.test), vec![0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_shared_rejects_zero_bins() {
        assert_eq!(
            SharedHistogram::new(&[1.0], &[2.0], 0),
            Err(DriftError::ZeroBins)
        );
    }

    #[test]
    fn test_shared_names_empty_side() {
        assert_eq!(
            SharedHistogram::new(&[1.0], &[f64::NAN], 3),
            Err(DriftError::EmptyInput { side: Side::Test })
        );
    }
}
