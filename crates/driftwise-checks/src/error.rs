use driftwise_stats::{DriftError, Side, distance::UnknownMethodError};

use crate::dataset::TaskType;

/// Invalid configuration, rejected before any data is looked at.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("{name} must be a finite non-negative number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[display("{name} must be between 0 and 1, got {value}")]
    InvalidRatio { name: &'static str, value: f64 },
    #[display("psi_epsilon must be in (0, 1), got {value}")]
    InvalidEpsilon { value: f64 },
    #[display("margin_quantile_filter must be in [0, 0.5), got {value}")]
    InvalidMarginFilter { value: f64 },
    #[display("num_bins must be positive")]
    ZeroBins,
    #[display("max_num_categories must be positive")]
    ZeroMaxCategories,
    #[display("{_0}")]
    #[from]
    UnknownMethod(UnknownMethodError),
}

/// Input data that a check cannot be computed on.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display("{side} dataset has no label column")]
    MissingLabel { side: Side },
    #[display("{side} column '{column}' has no values")]
    EmptyColumn { side: Side, column: String },
    #[display("column '{column}' is categorical in one dataset and numeric in the other")]
    ColumnTypeMismatch { column: String },
    #[display("column '{column}' is categorical and cannot be scored as numeric")]
    NonNumericColumn { column: String },
    #[display("train and test datasets have no feature columns in common")]
    NoCommonFeatures,
    #[display("column '{column}': {source}")]
    Drift { column: String, source: DriftError },
}

/// Reason a check could not produce a result.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CheckError {
    #[display("{_0}")]
    #[from]
    Validation(ValidationError),
    #[display("check '{check}' is not applicable to {task_type} tasks")]
    NotApplicable {
        check: &'static str,
        task_type: TaskType,
    },
}
