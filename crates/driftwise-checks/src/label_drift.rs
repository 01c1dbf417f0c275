//! Train/test label drift
//!
//! Compares the label distribution of the test dataset with the train one.
//! Classification labels are compared category by category with PSI;
//! regression labels with the configured numeric method (Earth Mover's
//! Distance by default).
//!
//! # Examples
//!
//! ```
//! use driftwise_checks::{
//!     check::Check as _,
//!     config::DriftThresholds,
//!     dataset::Dataset,
//!     label_drift::TrainTestLabelDrift,
//! };
//!
//! let train = Dataset::new().with_label(vec!["a", "b", "a", "b"]);
//! let test = Dataset::new().with_label(vec!["a", "a", "a", "b"]);
//!
//! let check = TrainTestLabelDrift::default()
//!     .add_condition_drift_score_not_greater_than(DriftThresholds::default())
//!     .unwrap();
//! let result = check.run(&train, &test).unwrap();
//! assert_eq!(result.header, "Train Test Label Drift");
//! assert_eq!(result.conditions_results.len(), 1);
//! ```

use driftwise_stats::Side;

use crate::{
    check::{Check, CheckResult},
    condition::{self, BoxedCondition, Condition, ConditionCategory, ConditionResult},
    config::{DriftConfig, DriftThresholds},
    dataset::{Dataset, TaskType},
    drift::{self, DriftValue},
    error::{CheckError, ConfigError, ValidationError},
    format::format_number,
};

/// Column name reported in errors about the label.
const LABEL_COLUMN: &str = "label";

/// Label drift check.
///
/// Holds only its drift configuration and conditions, so the same check can
/// run on any number of dataset pairs.
///
/// # Arguments
///
/// * `config` - How the label is scored; validated by [`Self::new`].
///
/// # Returns
///
/// [`Check::run`] yields a [`CheckResult`] whose value is a [`DriftValue`].
#[derive(Debug)]
pub struct TrainTestLabelDrift {
    config: DriftConfig,
    conditions: Vec<BoxedCondition<DriftValue>>,
}

impl Default for TrainTestLabelDrift {
    fn default() -> Self {
        Self {
            config: DriftConfig::default(),
            conditions: Vec::new(),
        }
    }
}

impl TrainTestLabelDrift {
    pub const NAME: &str = "Train Test Label Drift";

    pub fn new(config: DriftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            conditions: Vec::new(),
        })
    }

    /// Fails when the label drift score exceeds the threshold of its method.
    pub fn add_condition_drift_score_not_greater_than(
        self,
        thresholds: DriftThresholds,
    ) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(self.add_condition(Box::new(LabelDriftScoreNotGreaterThan { thresholds })))
    }

    #[must_use]
    pub fn add_condition(mut self, condition: BoxedCondition<DriftValue>) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Computes the label drift score.
    ///
    /// The task type comes from the train dataset: its explicit task type, or
    /// the one inferred from its label.
    pub fn compute(&self, train: &Dataset, test: &Dataset) -> Result<DriftValue, CheckError> {
        let train_label = train.label().ok_or(ValidationError::MissingLabel { side: Side::Train })?;
        let test_label = test.label().ok_or(ValidationError::MissingLabel { side: Side::Test })?;
        let task_type = train
            .task_type()
            .unwrap_or_else(|| TaskType::infer(train_label));

        let score = drift::column_drift(
            LABEL_COLUMN,
            train_label,
            test_label,
            task_type.is_classification(),
            &self.config,
        )?;
        Ok(score.into())
    }

    #[must_use]
    pub fn conditions_decision(&self, value: &DriftValue) -> Vec<ConditionResult> {
        condition::evaluate_all(&self.conditions, value)
    }
}

impl Check for TrainTestLabelDrift {
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
struct LabelDriftScoreNotGreaterThan {
    thresholds: DriftThresholds,
}

impl Condition<DriftValue> for LabelDriftScoreNotGreaterThan {
    fn name(&self) -> String {
        format!(
            "categorical drift score <= {} and numerical drift score <= {} for label drift",
            self.thresholds.max_allowed_categorical_score,
            self.thresholds.max_allowed_numeric_score,
        )
    }

    fn decide(&self, value: &DriftValue) -> (ConditionCategory, String) {
        let category = if value.drift_score > self.thresholds.max_allowed(value.method) {
            ConditionCategory::Fail
        } else {
            ConditionCategory::Pass
        };
        let details = format!(
            "Label's drift score {} is {}",
            value.method,
            format_number(value.drift_score)
        );
        (category, details)
    }
}
