//! Column-level drift scoring shared by the drift checks.

use std::collections::BTreeMap;

use driftwise_stats::{DriftMethod, DriftScore, Side};
use serde::{Deserialize, Serialize};

use crate::{config::DriftConfig, dataset::Column, error::ValidationError};

/// Drift score of one column, as reported in check results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftValue {
    #[serde(rename = "Drift score")]
    pub drift_score: f64,
    #[serde(rename = "Method")]
    pub method: DriftMethod,
}

impl From<DriftScore> for DriftValue {
    fn from(score: DriftScore) -> Self {
        Self {
            drift_score: score.value,
            method: score.method,
        }
    }
}

/// Drift per feature column, ordered by column name.
pub type FeatureDriftValue = BTreeMap<String, DriftValue>;

/// Scores the drift of `column` between train and test.
///
/// Categorical handling compares the columns category by category with PSI;
/// numeric columns are rendered as categories first. Numeric handling uses
/// `config.numeric_method` and requires both columns to be numeric.
pub(crate) fn column_drift(
    column: &str,
    train: &Column,
    test: &Column,
    categorical: bool,
    config: &DriftConfig,
) -> Result<DriftScore, ValidationError> {
    for (side, values) in [(Side::Train, train), (Side::Test, test)] {
        if values.is_empty() {
            return Err(ValidationError::EmptyColumn {
                side,
                column: column.to_owned(),
            });
        }
    }

    let params = config.distance_params();
    let score = if categorical {
        DriftScore::from_categorical(
            &*train.to_categories(),
            &*test.to_categories(),
            &config.category_binning(),
            &params,
        )
    } else {
        let (Column::Numeric(train_values), Column::Numeric(test_values)) = (train, test) else {
            let column = column.to_owned();
            return Err(if train.kind() == test.kind() {
                ValidationError::NonNumericColumn { column }
            } else {
                ValidationError::ColumnTypeMismatch { column }
            });
        };
        DriftScore::from_numeric(config.numeric_method, train_values, test_values, &params)
    }
    .map_err(|source| ValidationError::Drift {
        column: column.to_owned(),
        source,
    })?;

    tracing::debug!(
        column,
        method = %score.method,
        score = score.value,
        "computed drift score"
    );
    Ok(score)
}

#[cfg(test)]
mod tests {
    use driftwise_stats::DriftError;

    use super::*;

    #[test]
    fn test_numeric_rendered_as_categories() {
        let train = Column::from(vec![1.0, 1.0, 2.0, 2.0]);
        let test = Column::from(vec![1.0, 2.0, 2.0, 2.0]);
        let score = column_drift("x", &train, &test, true, &DriftConfig::default()).unwrap();
        assert_eq!(score.method, DriftMethod::Psi);
        assert!(score.value > 0.0);
    }

    #[test]
    fn test_categorical_column_cannot_be_numeric() {
        let train = Column::from(vec!["a"]);
        let test = Column::from(vec![1.0]);
        assert_eq!(
            column_drift("x", &train, &test, false, &DriftConfig::default()),
            Err(ValidationError::ColumnTypeMismatch {
                column: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_categorical_columns_scored_as_numeric() {
        let train = Column::from(vec!["a", "b"]);
        let test = Column::from(vec!["b", "b"]);
        let err = column_drift("label", &train, &test, false, &DriftConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericColumn {
                column: "label".to_owned()
            }
        );
        assert_eq!(
            err.to_string(),
            "column 'label' is categorical and cannot be scored as numeric"
        );
    }

    #[test]
    fn test_empty_column_names_side() {
        let train = Column::from(vec![1.0]);
        let test = Column::Numeric(Vec::new());
        assert_eq!(
            column_drift("x", &train, &test, false, &DriftConfig::default()),
            Err(ValidationError::EmptyColumn {
                side: Side::Test,
                column: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_all_missing_wraps_drift_error() {
        let train = Column::from(vec![f64::NAN, f64::NAN]);
        let test = Column::from(vec![1.0]);
        let err = column_drift("x", &train, &test, false, &DriftConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Drift {
                column: "x".to_owned(),
                source: DriftError::EmptyInput { side: Side::Train }
            }
        );
        assert_eq!(err.to_string(), "column 'x': train sample is empty");
    }
}
