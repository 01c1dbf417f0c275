//! Train/test feature drift
//!
//! Runs the drift engine on every feature present in both datasets.
//! Categorical features are scored with PSI, numeric ones with the configured
//! numeric method.

use std::collections::BTreeSet;

use driftwise_stats::DriftMethod;

use crate::{
    check::{Check, CheckResult},
    condition::{self, BoxedCondition, Condition, ConditionCategory, ConditionResult},
    config::{DriftConfig, DriftThresholds},
    dataset::Dataset,
    drift::{self, FeatureDriftValue},
    error::{CheckError, ConfigError, ValidationError},
    format::format_number,
};

/// Feature drift check.
///
/// # Examples
///
/// ```
/// use driftwise_checks::{
///     check::Check as _,
///     dataset::Dataset,
///     feature_drift::TrainTestFeatureDrift,
/// };
///
/// let train = Dataset::new()
///     .with_feature("age", vec![20.0, 30.0, 40.0, 50.0])
///     .with_feature("city", vec!["a", "b", "a", "b"]);
/// let test = train.clone();
///
/// let result = TrainTestFeatureDrift::default().run(&train, &test).unwrap();
/// let value = serde_json::to_value(&result.value).unwrap();
/// assert_eq!(value["age"]["Method"], "Earth Mover's Distance");
/// assert_eq!(value["city"]["Method"], "PSI");
/// assert_eq!(value["city"]["Drift score"], 0.0);
/// ```
#[derive(Debug, Default)]
pub struct TrainTestFeatureDrift {
    config: DriftConfig,
    columns: Option<BTreeSet<String>>,
    ignore_columns: BTreeSet<String>,
    conditions: Vec<BoxedCondition<FeatureDriftValue>>,
}

impl TrainTestFeatureDrift {
    pub const NAME: &str = "Train Test Feature Drift";

    pub fn new(config: DriftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Restricts the check to `columns`.
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Excludes `columns` from the check.
    #[must_use]
    pub fn with_ignore_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Fails when any column's drift score exceeds the threshold of its method.
    pub fn add_condition_drift_score_not_greater_than(
        self,
        thresholds: DriftThresholds,
    ) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(self.add_condition(Box::new(FeatureDriftScoreNotGreaterThan { thresholds })))
    }

    #[must_use]
    pub fn add_condition(mut self, condition: BoxedCondition<FeatureDriftValue>) -> Self {
        self.conditions.push(condition);
        self
    }

    fn is_selected(&self, name: &str) -> bool {
        self.columns
            .as_ref()
            .is_none_or(|columns| columns.contains(name))
            && !self.ignore_columns.contains(name)
    }

    /// Computes the drift score of every selected feature shared by both datasets.
    pub fn compute(
        &self,
        train: &Dataset,
        test: &Dataset,
    ) -> Result<FeatureDriftValue, CheckError> {
        let mut value = FeatureDriftValue::new();
        for name in train.feature_names().filter(|name| self.is_selected(name)) {
            let (Some(train_column), Some(test_column)) = (train.feature(name), test.feature(name))
            else {
                continue;
            };
            if train_column.kind() != test_column.kind() {
                return Err(ValidationError::ColumnTypeMismatch {
                    column: name.to_owned(),
                }
                .into());
            }
            let score = drift::column_drift(
                name,
                train_column,
                test_column,
                train.is_categorical_feature(name),
                &self.config,
            )?;
            value.insert(name.to_owned(), score.into());
        }

        if value.is_empty() {
            return Err(ValidationError::NoCommonFeatures.into());
        }
        Ok(value)
    }

    #[must_use]
    pub fn conditions_decision(&self, value: &FeatureDriftValue) -> Vec<ConditionResult> {
        condition::evaluate_all(&self.conditions, value)
    }
}

impl Check for TrainTestFeatureDrift {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, train: &Dataset, test: &Dataset) -> Result<CheckResult, CheckError> {
        let value = self.compute(train, test)?;
        let conditions_results = self.conditions_decision(&value);
        Ok(CheckResult::new(Self::NAME, value).with_conditions_results(conditions_results))
    }
}

#[derive(Debug)]
struct FeatureDriftScoreNotGreaterThan {
    thresholds: DriftThresholds,
}

impl Condition<FeatureDriftValue> for FeatureDriftScoreNotGreaterThan {
    fn name(&self) -> String {
        format!(
            "{} <= {} and {} <= {}",
            DriftMethod::Psi,
            self.thresholds.max_allowed_categorical_score,
            DriftMethod::EarthMoversDistance,
            self.thresholds.max_allowed_numeric_score,
        )
    }

    fn decide(&self, value: &FeatureDriftValue) -> (ConditionCategory, String) {
        let mut lines = Vec::new();
        for method in [DriftMethod::Psi, DriftMethod::EarthMoversDistance] {
            let max_allowed = self.thresholds.max_allowed(method);
            let failed = value
                .iter()
                .filter(|(_, drift)| drift.method == method && drift.drift_score > max_allowed)
                .map(|(column, drift)| (column.as_str(), format_number(drift.drift_score)))
                .collect::<Vec<_>>();
            if !failed.is_empty() {
                lines.push(format!(
                    "Found columns with {method} above threshold: {}",
                    quoted_map(&failed)
                ));
            }
        }

        if lines.is_empty() {
            (
                ConditionCategory::Pass,
                format!("Passed for {} relevant column(s)", value.len()),
            )
        } else {
            (ConditionCategory::Fail, lines.join("\n"))
        }
    }
}

/// Renders `{'column': 'score', ...}`.
fn quoted_map(entries: &[(&str, String)]) -> String {
    let body = entries
        .iter()
        .map(|(key, value)| format!("'{key}': '{value}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

#[cfg(test)]
mod tests {
    use driftwise_stats::{DriftError, Side};

    use super::*;

    fn shifted(values: &[f64], shift: f64) -> Vec<f64> {
        values.iter().map(|v| v + shift).collect()
    }

    fn datasets() -> (Dataset, Dataset) {
        let numbers = (0..1000).map(|i| f64::from(i) / 999.0).collect::<Vec<_>>();
        let mut colors = vec!["red"; 500];
        colors.extend(vec!["blue"; 500]);
        let mut drifted_colors = vec!["red"; 265];
        drifted_colors.extend(vec!["blue"; 735]);

        let train = Dataset::new()
            .with_feature("color", colors)
            .with_feature("stable", numbers.clone())
            .with_feature("moved", numbers.clone())
            .with_feature("train_only", numbers.clone());
        let test = Dataset::new()
            .with_feature("color", drifted_colors)
            .with_feature("stable", numbers.clone())
            .with_feature("moved", shifted(&numbers, 0.52))
            .with_feature("test_only", numbers);
        (train, test)
    }

    #[test]
    fn test_only_common_features_are_scored() {
        let (train, test) = datasets();
        let value = TrainTestFeatureDrift::default().compute(&train, &test).unwrap();
        assert_eq!(
            value.keys().map(String::as_str).collect::<Vec<_>>(),
            ["color", "moved", "stable"]
        );
        assert_eq!(value["color"].method, DriftMethod::Psi);
        assert_eq!(value["stable"].drift_score, 0.0);
        assert!((value["moved"].drift_score - 0.34).abs() < 0.01);
    }

    #[test]
    fn test_condition_lists_failed_columns_per_method() {
        let (train, test) = datasets();
        let check = TrainTestFeatureDrift::default()
            .add_condition_drift_score_not_greater_than(DriftThresholds::default())
            .unwrap();
        let result = check.run(&train, &test).unwrap();
        assert_eq!(
            result.conditions_results,
            vec![ConditionResult::new(
                "PSI <= 0.2 and Earth Mover's Distance <= 0.1",
                ConditionCategory::Fail,
                "Found columns with PSI above threshold: {'color': '0.24'}\n\
                 Found columns with Earth Mover's Distance above threshold: {'moved': '0.34'}",
            )]
        );
    }

    #[test]
    fn test_condition_passes() {
        let (train, test) = datasets();
        let check = TrainTestFeatureDrift::default()
            .with_columns(["stable", "color"])
            .add_condition_drift_score_not_greater_than(DriftThresholds::new(0.5, 0.1).unwrap())
            .unwrap();
        let result = check.run(&train, &test).unwrap();
        assert_eq!(result.conditions_results[0].category, ConditionCategory::Pass);
        assert_eq!(
            result.conditions_results[0].details,
            "Passed for 2 relevant column(s)"
        );
    }

    #[test]
    fn test_ignore_columns() {
        let (train, test) = datasets();
        let value = TrainTestFeatureDrift::default()
            .with_ignore_columns(["color", "moved"])
            .compute(&train, &test)
            .unwrap();
        assert_eq!(value.keys().collect::<Vec<_>>(), ["stable"]);
    }

    #[test]
    fn test_declared_categorical_numeric_feature() {
        let train = Dataset::new()
            .with_feature("zip", vec![1.0, 1.0, 2.0, 2.0])
            .with_cat_features(["zip"]);
        let test = Dataset::new().with_feature("zip", vec![1.0, 2.0, 2.0, 2.0]);
        let value = TrainTestFeatureDrift::default().compute(&train, &test).unwrap();
        assert_eq!(value["zip"].method, DriftMethod::Psi);
    }

    #[test]
    fn test_string_column_stays_categorical_with_cat_features() {
        let train = Dataset::new()
            .with_feature("zip", vec![10001.0, 94105.0, 10001.0, 94105.0])
            .with_feature("city", vec!["NYC", "SF", "NYC", "SF"])
            .with_cat_features(["zip"]);
        let test = Dataset::new()
            .with_feature("zip", vec![10001.0, 10001.0, 10001.0, 94105.0])
            .with_feature("city", vec!["NYC", "SF", "SF", "SF"]);
        let value = TrainTestFeatureDrift::default().compute(&train, &test).unwrap();
        assert_eq!(value["zip"].method, DriftMethod::Psi);
        assert_eq!(value["city"].method, DriftMethod::Psi);
        assert!(value["city"].drift_score > 0.0);
    }

    #[test]
    fn test_no_common_features() {
        let train = Dataset::new().with_feature("a", vec![1.0]);
        let test = Dataset::new().with_feature("b", vec![1.0]);
        assert_eq!(
            TrainTestFeatureDrift::default().run(&train, &test).unwrap_err(),
            CheckError::Validation(ValidationError::NoCommonFeatures)
        );
    }

    #[test]
    fn test_type_mismatch() {
        let train = Dataset::new().with_feature("a", vec![1.0]);
        let test = Dataset::new().with_feature("a", vec!["x"]);
        assert_eq!(
            TrainTestFeatureDrift::default().compute(&train, &test).unwrap_err(),
            CheckError::Validation(ValidationError::ColumnTypeMismatch {
                column: "a".to_owned()
            })
        );
    }

    #[test]
    fn test_column_error_names_column() {
        let train = Dataset::new().with_feature("a", vec![f64::INFINITY]);
        let test = Dataset::new().with_feature("a", vec![1.0]);
        assert_eq!(
            TrainTestFeatureDrift::default().compute(&train, &test).unwrap_err(),
            CheckError::Validation(ValidationError::Drift {
                column: "a".to_owned(),
                source: DriftError::NonFiniteValue {
                    side: Side::Train,
                    value: f64::INFINITY
                }
            })
        );
    }

    #[test]
    fn test_quoted_map() {
        assert_eq!(
            quoted_map(&[("a", "0.3".to_owned()), ("b", "1".to_owned())]),
            "{'a': '0.3', 'b': '1'}"
        );
        assert_eq!(quoted_map(&[]), "{}");
    }
}
