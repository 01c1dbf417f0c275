//! Check configuration
//!
//! Every tunable knob lives in a plain serde struct so that it can be loaded
//! from a configuration file. Structs are validated once, when a check or a
//! condition is built, never during computation.

use driftwise_stats::{
    DistanceParams, DriftMethod,
    categorical::CategoryBinning,
    distance::{DEFAULT_MARGIN_QUANTILE_FILTER, DEFAULT_NUM_BINS, DEFAULT_PSI_EPSILON},
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How drift is measured on a column.
///
/// # Examples
///
/// ```
/// use driftwise_checks::config::DriftConfig;
/// use driftwise_stats::DriftMethod;
///
/// let config = DriftConfig {
///     numeric_method: DriftMethod::Psi,
///     num_bins: 20,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.distance_params().num_bins, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftConfig {
    /// Method used on numeric columns. Categorical columns always use PSI.
    pub numeric_method: DriftMethod,
    pub psi_epsilon: f64,
    pub num_bins: usize,
    pub margin_quantile_filter: f64,
    pub min_category_size_ratio: f64,
    pub max_num_categories: Option<usize>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        let binning = CategoryBinning::default();
        Self {
            numeric_method: DriftMethod::EarthMoversDistance,
            psi_epsilon: DEFAULT_PSI_EPSILON,
            num_bins: DEFAULT_NUM_BINS,
            margin_quantile_filter: DEFAULT_MARGIN_QUANTILE_FILTER,
            min_category_size_ratio: binning.min_category_size_ratio,
            max_num_categories: binning.max_num_categories,
        }
    }
}

impl DriftConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.psi_epsilon > 0.0 && self.psi_epsilon < 1.0) {
            return Err(ConfigError::InvalidEpsilon {
                value: self.psi_epsilon,
            });
        }
        if self.num_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }
        if !(0.0..0.5).contains(&self.margin_quantile_filter) {
            return Err(ConfigError::InvalidMarginFilter {
                value: self.margin_quantile_filter,
            });
        }
        check_ratio("min_category_size_ratio", self.min_category_size_ratio)?;
        if self.max_num_categories == Some(0) {
            return Err(ConfigError::ZeroMaxCategories);
        }
        Ok(())
    }

    #[must_use]
    pub fn distance_params(&self) -> DistanceParams {
        DistanceParams {
            psi_epsilon: self.psi_epsilon,
            num_bins: self.num_bins,
            margin_quantile_filter: self.margin_quantile_filter,
        }
    }

    #[must_use]
    pub fn category_binning(&self) -> CategoryBinning {
        CategoryBinning {
            min_category_size_ratio: self.min_category_size_ratio,
            max_num_categories: self.max_num_categories,
        }
    }
}

/// Largest drift scores still considered acceptable, one per method.
///
/// The verdict is keyed on the method that produced a score: a PSI score is
/// judged against `max_allowed_categorical_score` even when it was computed on
/// a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftThresholds {
    pub max_allowed_categorical_score: f64,
    pub max_allowed_numeric_score: f64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            max_allowed_categorical_score: 0.2,
            max_allowed_numeric_score: 0.1,
        }
    }
}

impl DriftThresholds {
    /// Builds validated thresholds.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftwise_checks::{config::DriftThresholds, error::ConfigError};
    ///
    /// assert!(DriftThresholds::new(1.0, 1.0).is_ok());
    /// assert!(matches!(
    ///     DriftThresholds::new(-0.1, 1.0),
    ///     Err(ConfigError::InvalidThreshold { .. })
    /// ));
    /// ```
    pub fn new(
        max_allowed_categorical_score: f64,
        max_allowed_numeric_score: f64,
    ) -> Result<Self, ConfigError> {
        let thresholds = Self {
            max_allowed_categorical_score,
            max_allowed_numeric_score,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold(
            "max_allowed_categorical_score",
            self.max_allowed_categorical_score,
        )?;
        check_threshold("max_allowed_numeric_score", self.max_allowed_numeric_score)
    }

    /// Threshold applying to scores produced by `method`.
    #[must_use]
    pub fn max_allowed(&self, method: DriftMethod) -> f64 {
        match method {
            DriftMethod::Psi => self.max_allowed_categorical_score,
            DriftMethod::EarthMoversDistance => self.max_allowed_numeric_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewLabelsConfig {
    /// Largest acceptable share of test samples whose label is unseen in train.
    pub max_new_labels_ratio: f64,
}

impl Default for NewLabelsConfig {
    fn default() -> Self {
        Self {
            max_new_labels_ratio: 0.005,
        }
    }
}

impl NewLabelsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("max_new_labels_ratio", self.max_new_labels_ratio)
    }
}

/// Configuration of the default suite, one table per concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksConfig {
    pub drift: DriftConfig,
    pub thresholds: DriftThresholds,
    pub new_labels: NewLabelsConfig,
}

impl ChecksConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drift.validate()?;
        self.thresholds.validate()?;
        self.new_labels.validate()
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio { name, value })
    }
}
