//! Distribution comparison primitives for drift detection.
//!
//! This crate compares a baseline (train) sample with a comparison (test)
//! sample and reduces the difference to a single non-negative score:
//!
//! - **Categorical binning**: Align two label sequences over the union of their
//!   categories, grouping rare categories into an `Other` bucket
//! - **Histograms**: Equal-width bins shared by two numeric samples
//! - **Quantiles**: Linear-interpolated quantiles used to trim sample margins
//! - **Distances**: Population Stability Index and 1-D Earth Mover's Distance
//!
//! # Modules
//!
//! - [`categorical`]: Aligned categorical distributions
//! - [`histogram`]: Shared-support histograms for numeric samples
//! - [`percentiles`]: Quantile computation
//! - [`sample`]: Input cleaning shared by every numeric estimator
//! - [`distance`]: Drift methods and the [`DriftScore`] they produce
//!
//! # Examples
//!
//! ## Scoring a categorical label
//!
//! ```
//! use driftwise_stats::{
//!     categorical::CategoryBinning,
//!     distance::{DistanceParams, DriftMethod, DriftScore},
//! };
//!
//! let train = ["cat", "dog", "cat", "dog"];
//! let test = ["cat", "cat", "cat", "dog"];
//! let score = DriftScore::from_categorical(
//!     &train,
//!     &test,
//!     &CategoryBinning::default(),
//!     &DistanceParams::default(),
//! )
//! .unwrap();
//! assert_eq!(score.method, DriftMethod::Psi);
//! assert!(score.value > 0.0);
//! ```
//!
//! ## Scoring a numeric label
//!
//! ```
//! use driftwise_stats::distance::{DistanceParams, DriftMethod, DriftScore};
//!
//! let train = [1.0, 2.0, 3.0, 4.0];
//! let score = DriftScore::from_numeric(
//!     DriftMethod::EarthMoversDistance,
//!     &train,
//!     &train,
//!     &DistanceParams::default(),
//! )
//! .unwrap();
//! assert_eq!(score.value, 0.0);
//! ```

pub mod categorical;
pub mod distance;
pub mod histogram;
pub mod percentiles;
pub mod sample;

pub use self::distance::{DistanceParams, DriftMethod, DriftScore};

/// Which of the two compared samples a value or an error belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The baseline sample.
    #[display("train")]
    Train,
    /// The sample compared against the baseline.
    #[display("test")]
    Test,
}

/// Reason a drift score cannot be computed.
///
/// Returned instead of a NaN or infinite score whenever the inputs leave the
/// distance undefined.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DriftError {
    /// No value left once missing values are dropped.
    #[display("{side} sample is empty")]
    EmptyInput { side: Side },
    /// Every value fell outside the quantile margins.
    #[display("{side} sample is empty after trimming its margins")]
    EmptyAfterFiltering { side: Side },
    #[display("{side} sample contains a non-finite value ({value})")]
    NonFiniteValue { side: Side, value: f64 },
    /// Probability vectors do not share the same support.
    #[display("distribution lengths differ: {expected} vs {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[display("number of bins must be positive")]
    ZeroBins,
}
