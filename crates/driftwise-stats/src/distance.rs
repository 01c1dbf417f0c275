//! Drift methods and scores
//!
//! Two estimators reduce a pair of samples to one non-negative number, larger
//! meaning more drift:
//!
//! - **PSI** (Population Stability Index) compares binned probabilities:
//!   `Σ (q_i - p_i) · ln(q_i / p_i)` with `p` the train and `q` the test
//!   distribution. Probabilities are floored to a small epsilon so that empty
//!   bins stay finite.
//! - **Earth Mover's Distance** compares numeric samples directly: the area
//!   between their empirical CDFs after trimming the sample margins and
//!   scaling the remaining range to `[0, 1]`.
//!
//! Categorical columns are always scored with PSI. Numeric columns use EMD by
//! default and PSI over a shared equal-width histogram when configured.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    DriftError, Side,
    categorical::{CategoricalDistribution, CategoryBinning},
    histogram::SharedHistogram,
    percentiles, sample,
};

/// Default floor applied to probabilities before the PSI log ratio.
pub const DEFAULT_PSI_EPSILON: f64 = 1e-4;
/// Default number of equal-width bins used when numeric samples are scored with PSI.
pub const DEFAULT_NUM_BINS: usize = 10;
/// Default share trimmed from each end of a sample before computing EMD.
pub const DEFAULT_MARGIN_QUANTILE_FILTER: f64 = 0.025;

/// Distance estimator used to score drift.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize,
)]
pub enum DriftMethod {
    /// Population Stability Index over categories or histogram bins.
    #[display("PSI")]
    #[serde(rename = "PSI", alias = "psi")]
    Psi,
    /// 1-D Earth Mover's Distance (Wasserstein-1) over scaled numeric samples.
    #[display("Earth Mover's Distance")]
    #[serde(
        rename = "Earth Mover's Distance",
        alias = "emd",
        alias = "earth_movers_distance"
    )]
    EarthMoversDistance,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unsupported drift method '{name}' (expected 'psi' or 'emd')")]
pub struct UnknownMethodError {
    pub name: String,
}

impl FromStr for DriftMethod {
    type Err = UnknownMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "psi" => Ok(Self::Psi),
            "emd" | "earth_movers_distance" | "earth mover's distance" => {
                Ok(Self::EarthMoversDistance)
            }
            _ => Err(UnknownMethodError { name: s.to_owned() }),
        }
    }
}

/// Tunable parameters of the distance estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceParams {
    /// Floor applied to probabilities before the PSI log ratio.
    pub psi_epsilon: f64,
    /// Number of bins used when numeric samples are scored with PSI.
    pub num_bins: usize,
    /// Share trimmed from each end of both samples before EMD; `0` disables trimming.
    pub margin_quantile_filter: f64,
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self {
            psi_epsilon: DEFAULT_PSI_EPSILON,
            num_bins: DEFAULT_NUM_BINS,
            margin_quantile_filter: DEFAULT_MARGIN_QUANTILE_FILTER,
        }
    }
}

/// A drift score together with the method that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftScore {
    pub method: DriftMethod,
    pub value: f64,
}

impl DriftScore {
    /// Scores two categorical samples with PSI.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::EmptyInput`] if either sample is empty.
    pub fn from_categorical<S>(
        train: &[S],
        test: &[S],
        binning: &CategoryBinning,
        params: &DistanceParams,
    ) -> Result<Self, DriftError>
    where
        S: AsRef<str>,
    {
        let dist = CategoricalDistribution::new(train, test, binning)?;
        let value = psi(
            &dist.train_probabilities(),
            &dist.test_probabilities(),
            params.psi_epsilon,
        )?;
        Ok(Self {
            method: DriftMethod::Psi,
            value,
        })
    }

    /// Scores two numeric samples with `method`.
    ///
    /// # Errors
    ///
    /// Returns an error if either sample is empty (after dropping `NaN`s),
    /// contains an infinite value, or if `params.num_bins` is zero for PSI.
    pub fn from_numeric(
        method: DriftMethod,
        train: &[f64],
        test: &[f64],
        params: &DistanceParams,
    ) -> Result<Self, DriftError> {
        let value = method.compute(train, test, params)?;
        Ok(Self { method, value })
    }
}

impl DriftMethod {
    /// Computes the distance between two numeric samples.
    ///
    /// # Errors
    ///
    /// See [`DriftScore::from_numeric`].
    ///
    /// # Examples
    ///
    /// ```
    /// use driftwise_stats::distance::{DistanceParams, DriftMethod};
    ///
    /// let train = [0.0, 1.0, 2.0, 3.0];
    /// let test = [1.0, 2.0, 3.0, 4.0];
    /// let params = DistanceParams { margin_quantile_filter: 0.0, ..Default::default() };
    /// let emd = DriftMethod::EarthMoversDistance.compute(&train, &test, &params).unwrap();
    /// assert!((emd - 0.25).abs() < 1e-12);
    /// ```
    pub fn compute(
        self,
        train: &[f64],
        test: &[f64],
        params: &DistanceParams,
    ) -> Result<f64, DriftError> {
        match self {
            Self::Psi => {
                let shared = SharedHistogram::new(train, test, params.num_bins)?;
                psi(
                    &shared.train.probabilities(),
                    &shared.test.probabilities(),
                    params.psi_epsilon,
                )
            }
            Self::EarthMoversDistance => {
                earth_movers_distance(train, test, params.margin_quantile_filter)
            }
        }
    }
}

/// Population Stability Index between two aligned probability vectors.
///
/// `expected` is the baseline (train) distribution, `actual` the comparison
/// (test) one. Each probability is floored to `epsilon` before the log ratio.
///
/// # Errors
///
/// Returns [`DriftError::LengthMismatch`] if the vectors are not aligned.
///
/// # Examples
///
/// ```
/// use driftwise_stats::distance::{DEFAULT_PSI_EPSILON, psi};
///
/// let p = [0.5, 0.5];
/// assert_eq!(psi(&p, &p, DEFAULT_PSI_EPSILON).unwrap(), 0.0);
///
/// let q = [0.9, 0.1];
/// assert!(psi(&p, &q, DEFAULT_PSI_EPSILON).unwrap() > 0.5);
/// ```
pub fn psi(expected: &[f64], actual: &[f64], epsilon: f64) -> Result<f64, DriftError> {
    if expected.len() != actual.len() {
        return Err(DriftError::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    Ok(expected
        .iter()
        .zip(actual)
        .map(|(&e, &a)| {
            let e = e.max(epsilon);
            let a = a.max(epsilon);
            (a - e) * (a / e).ln()
        })
        .sum())
}

/// Earth Mover's Distance between two numeric samples, scaled to `[0, 1]`.
///
/// Both samples are trimmed to `[min(lows), max(highs)]`, where `lows` and
/// `highs` are the `margin_quantile_filter` and `1 - margin_quantile_filter`
/// quantiles of each sample, then scaled by that range. A zero range yields 0.
///
/// # Errors
///
/// - [`DriftError::EmptyInput`] / [`DriftError::NonFiniteValue`] for unusable input
/// - [`DriftError::EmptyAfterFiltering`] if trimming removes a whole sample
pub fn earth_movers_distance(
    train: &[f64],
    test: &[f64],
    margin_quantile_filter: f64,
) -> Result<f64, DriftError> {
    let train = sample::sorted_finite(train, Side::Train)?;
    let test = sample::sorted_finite(test, Side::Test)?;

    let mut min = f64::min(train[0], test[0]);
    let mut max = f64::max(train[train.len() - 1], test[test.len() - 1]);
    if max == min {
        return Ok(0.0);
    }

    let (train, test) = if margin_quantile_filter > 0.0 {
        let (train_low, train_high) = percentiles::margin_bounds(&train, margin_quantile_filter);
        let (test_low, test_high) = percentiles::margin_bounds(&test, margin_quantile_filter);
        min = f64::min(train_low, test_low);
        max = f64::max(train_high, test_high);
        let within = |value: &&f64| (min..=max).contains(*value);
        let train = train.iter().filter(within).copied().collect::<Vec<_>>();
        let test = test.iter().filter(within).copied().collect::<Vec<_>>();
        if train.is_empty() {
            return Err(DriftError::EmptyAfterFiltering { side: Side::Train });
        }
        if test.is_empty() {
            return Err(DriftError::EmptyAfterFiltering { side: Side::Test });
        }
        (train, test)
    } else {
        (train, test)
    };

    let range = max - min;
    if range <= 0.0 {
        return Ok(0.0);
    }
    let scale = |values: &[f64]| values.iter().map(|v| (v - min) / range).collect::<Vec<_>>();
    Ok(wasserstein_sorted(&scale(&train), &scale(&test)))
}

/// Wasserstein-1 distance between two sorted, equally weighted samples.
///
/// Integrates `|F_u(x) - F_v(x)|` over the merged support by sweeping both
/// samples once.
#[expect(clippy::cast_precision_loss)]
fn wasserstein_sorted(u: &[f64], v: &[f64]) -> f64 {
    let (u_len, v_len) = (u.len() as f64, v.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut previous: Option<f64> = None;
    let mut distance = 0.0;

    loop {
        let x = match (u.get(i), v.get(j)) {
            (Some(&a), Some(&b)) => a.min(b),
            (Some(&a), None) => a,
            (None, Some(&b)) => b,
            (None, None) => break,
        };
        if let Some(prev) = previous {
            // CDFs are constant on [prev, x) and equal the share of values <= prev
            let cdf_gap = (i as f64 / u_len - j as f64 / v_len).abs();
            distance += cdf_gap * (x - prev);
        }
        while u.get(i) == Some(&x) {
            i += 1;
        }
        while v.get(j) == Some(&x) {
            j += 1;
        }
        previous = Some(x);
    }

    distance
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn random_distribution(rng: &mut Pcg64Mcg, len: usize) -> Vec<f64> {
        let weights = (0..len)
            .map(|_| rng.random_range(0.0..1.0))
            .collect::<Vec<f64>>();
        let total = weights.iter().sum::<f64>();
        weights.iter().map(|w| w / total).collect()
    }

    fn normal_sample(rng: &mut Pcg64Mcg, mean: f64, len: usize) -> Vec<f64> {
        let normal = Normal::new(mean, 1.0).unwrap();
        (0..len).map(|_| normal.sample(&mut *rng)).collect()
    }

    #[test]
    fn test_psi_non_negative_and_zero_on_self() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        for len in 1..12 {
            let p = random_distribution(&mut rng, len);
            let q = random_distribution(&mut rng, len);
            assert!(psi(&p, &q, DEFAULT_PSI_EPSILON).unwrap() >= 0.0);
            assert_eq!(psi(&p, &p, DEFAULT_PSI_EPSILON).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_psi_is_not_symmetric() {
        let p = [0.7, 0.2, 0.1];
        let q = [0.1, 0.3, 0.6];
        let forward = psi(&p, &q, DEFAULT_PSI_EPSILON).unwrap();
        let backward = psi(&q, &p, DEFAULT_PSI_EPSILON).unwrap();
        assert!(forward > 0.0 && backward > 0.0);
        assert!((forward - backward).abs() > 1e-9);
    }

    #[test]
    fn test_psi_disjoint_support_is_finite() {
        let value = psi(&[1.0, 0.0], &[0.0, 1.0], DEFAULT_PSI_EPSILON).unwrap();
        assert!(value.is_finite());
        assert!(value > 10.0);
    }

    #[test]
    fn test_psi_length_mismatch() {
        assert_eq!(
            psi(&[1.0], &[0.5, 0.5], DEFAULT_PSI_EPSILON),
            Err(DriftError::LengthMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_psi_known_value() {
        // (0.3 - 0.5) ln(0.6) + (0.7 - 0.5) ln(1.4)
        let expected = -0.2 * 0.6_f64.ln() + 0.2 * 1.4_f64.ln();
        let value = psi(&[0.5, 0.5], &[0.3, 0.7], DEFAULT_PSI_EPSILON).unwrap();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_emd_zero_on_self() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let sample = normal_sample(&mut rng, 0.0, 500);
        let emd = earth_movers_distance(&sample, &sample, DEFAULT_MARGIN_QUANTILE_FILTER).unwrap();
        assert_eq!(emd, 0.0);
    }

    #[test]
    fn test_emd_non_negative_and_grows_with_shift() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let train = normal_sample(&mut rng, 0.0, 1000);
        let mut previous = 0.0;
        for shift in [0.1, 0.5, 1.0, 2.0] {
            let test = normal_sample(&mut rng, shift, 1000);
            let emd = earth_movers_distance(&train, &test, DEFAULT_MARGIN_QUANTILE_FILTER).unwrap();
            assert!(emd >= 0.0);
            assert!(emd > previous, "shift {shift}: {emd} <= {previous}");
            previous = emd;
        }
    }

    #[test]
    fn test_emd_without_filter_matches_mean_shift() {
        // Without trimming, shifting a sample by d moves every unit of mass by d / range
        let train = (0..100).map(f64::from).collect::<Vec<_>>();
        let test = train.iter().map(|v| v + 10.0).collect::<Vec<_>>();
        let emd = earth_movers_distance(&train, &test, 0.0).unwrap();
        assert!((emd - 10.0 / 109.0).abs() < 1e-12);
    }

    #[test]
    fn test_emd_constant_samples() {
        let emd =
            earth_movers_distance(&[2.0; 5], &[2.0; 3], DEFAULT_MARGIN_QUANTILE_FILTER).unwrap();
        assert_eq!(emd, 0.0);
    }

    #[test]
    fn test_emd_bounded_by_one() {
        let emd = earth_movers_distance(&[0.0; 10], &[1.0; 10], 0.0).unwrap();
        assert!((emd - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_emd_empty_input() {
        assert_eq!(
            earth_movers_distance(&[], &[1.0], 0.0),
            Err(DriftError::EmptyInput { side: Side::Train })
        );
    }

    #[test]
    fn test_wasserstein_unequal_sizes() {
        // CDF gap is 0.5 on [0, 1) and 0 afterwards
        let value = wasserstein_sorted(&[0.0, 1.0], &[1.0]);
        assert!((value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_psi_uses_shared_bins() {
        let train = (0..100).map(f64::from).collect::<Vec<_>>();
        let score =
            DriftScore::from_numeric(DriftMethod::Psi, &train, &train, &DistanceParams::default())
                .unwrap();
        assert_eq!(score.method, DriftMethod::Psi);
        assert_eq!(score.value, 0.0);

        let shifted = train.iter().map(|v| v + 50.0).collect::<Vec<_>>();
        let score =
            DriftScore::from_numeric(DriftMethod::Psi, &train, &shifted, &DistanceParams::default())
                .unwrap();
        assert!(score.value > 1.0);
    }

    #[test]
    fn test_numeric_psi_zero_bins() {
        let params = DistanceParams {
            num_bins: 0,
            ..Default::default()
        };
        assert_eq!(
            DriftMethod::Psi.compute(&[1.0], &[2.0], &params),
            Err(DriftError::ZeroBins)
        );
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("PSI".parse::<DriftMethod>(), Ok(DriftMethod::Psi));
        assert_eq!(
            "emd".parse::<DriftMethod>(),
            Ok(DriftMethod::EarthMoversDistance)
        );
        assert_eq!(
            "Earth Mover's Distance".parse::<DriftMethod>(),
            Ok(DriftMethod::EarthMoversDistance)
        );
        let err = "kl".parse::<DriftMethod>().unwrap_err();
        assert_eq!(err.name, "kl");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(DriftMethod::Psi.to_string(), "PSI");
        assert_eq!(
            DriftMethod::EarthMoversDistance.to_string(),
            "Earth Mover's Distance"
        );
    }
}
