//! Labels that appear in the test dataset but never in train.

use std::collections::{BTreeMap, BTreeSet};

use driftwise_stats::Side;
use serde::{Deserialize, Serialize};

use crate::{
    check::{Check, CheckResult},
    condition::{self, BoxedCondition, Condition, ConditionCategory, ConditionResult},
    config::NewLabelsConfig,
    dataset::{Dataset, TaskType},
    error::{CheckError, ConfigError, ValidationError},
    format::format_percent,
};

/// Number of new labels listed in condition details.
const MOST_COMMON_SHOWN: usize = 3;

/// Value computed by [`NewLabels`].
///
/// Labels are keyed by their rendered form, so a numeric label `1` and a
/// string label `"1"` are the same label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLabelsValue {
    /// Test samples per label unseen in train.
    pub new_labels: BTreeMap<String, u64>,
    /// Number of non-missing labels in the test dataset.
    pub all_labels_count: u64,
}

impl NewLabelsValue {
    /// Share of test samples carrying a new label.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new_labels_ratio(&self) -> f64 {
        if self.all_labels_count == 0 {
            return 0.0;
        }
        self.new_labels.values().sum::<u64>() as f64 / self.all_labels_count as f64
    }

    /// New labels by descending count, ties broken by name.
    #[must_use]
    pub fn most_common(&self) -> Vec<&str> {
        let mut labels = self.new_labels.iter().collect::<Vec<_>>();
        labels.sort_by(|(a_name, a_count), (b_name, b_count)| {
            b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
        });
        labels.into_iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Finds test labels that never occur in the train dataset.
///
/// Only meaningful for classification; regression datasets are rejected.
///
/// # Returns
///
/// [`NewLabels::compute`] returns a [`NewLabelsValue`], or
/// [`CheckError::NotApplicable`] when the train task type is regression.
///
/// # Examples
///
/// ```
/// use driftwise_checks::{dataset::Dataset, new_labels::NewLabels};
///
/// let train = Dataset::new().with_label(vec!["cat", "dog"]);
/// let test = Dataset::new().with_label(vec!["cat", "bird", "bird", "fox"]);
///
/// let value = NewLabels::default().compute(&train, &test).unwrap();
/// assert_eq!(value.new_labels["bird"], 2);
/// assert_eq!(value.all_labels_count, 4);
/// assert_eq!(value.new_labels_ratio(), 0.75);
/// ```
#[derive(Debug, Default)]
pub struct NewLabels {
    conditions: Vec<BoxedCondition<NewLabelsValue>>,
}

impl NewLabels {
    pub const NAME: &str = "New Labels";

    /// Fails when the share of test samples with a new label exceeds
    /// `config.max_new_labels_ratio`.
    pub fn add_condition_new_label_ratio_not_greater_than(
        self,
        config: NewLabelsConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(self.add_condition(Box::new(NewLabelRatioNotGreaterThan {
            max_ratio: config.max_new_labels_ratio,
        })))
    }

    #[must_use]
    pub fn add_condition(mut self, condition: BoxedCondition<NewLabelsValue>) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn compute(&self, train: &Dataset, test: &Dataset) -> Result<NewLabelsValue, CheckError> {
        let train_label = train.label().ok_or(ValidationError::MissingLabel { side: Side::Train })?;
        let test_label = test.label().ok_or(ValidationError::MissingLabel { side: Side::Test })?;
        if let Some(task_type @ TaskType::Regression) = train.task_type() {
            return Err(CheckError::NotApplicable {
                check: Self::NAME,
                task_type,
            });
        }

        let train_labels = train_label.to_categories();
        let test_labels = test_label.to_categories();
        for (side, values) in [(Side::Train, &train_labels), (Side::Test, &test_labels)] {
            if values.is_empty() {
                return Err(ValidationError::EmptyColumn {
                    side,
                    column: "label".to_owned(),
                }
                .into());
            }
        }
        let known = train_labels.iter().map(String::as_str).collect::<BTreeSet<_>>();

        let mut new_labels = BTreeMap::new();
        for label in test_labels.iter().filter(|label| !known.contains(label.as_str())) {
            *new_labels.entry(String::clone(label)).or_insert(0) += 1;
        }
        tracing::debug!(
            new = new_labels.len(),
            total = test_labels.len(),
            "counted new labels"
        );
        Ok(NewLabelsValue {
            new_labels,
            all_labels_count: test_labels.len() as u64,
        })
    }

    #[must_use]
    pub fn conditions_decision(&self, value: &NewLabelsValue) -> Vec<ConditionResult> {
        condition::evaluate_all(&self.conditions, value)
    }
}

impl Check for NewLabels {
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
struct NewLabelRatioNotGreaterThan {
    max_ratio: f64,
}

impl Condition<NewLabelsValue> for NewLabelRatioNotGreaterThan {
    fn name(&self) -> String {
        format!(
            "Percentage of new labels in the test set not above {}.",
            format_percent(self.max_ratio)
        )
    }

    fn decide(&self, value: &NewLabelsValue) -> (ConditionCategory, String) {
        if value.new_labels.is_empty() {
            return (
                ConditionCategory::Pass,
                "No new labels were found in test set.".to_owned(),
            );
        }

        let ratio = value.new_labels_ratio();
        let shown = value
            .most_common()
            .into_iter()
            .take(MOST_COMMON_SHOWN)
            .map(|label| format!("'{label}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let details = format!(
            "{} of labels found in test set were not in train set. \
             New labels most common in test set: [{shown}]",
            format_percent(ratio)
        );
        let category = if ratio > self.max_ratio {
            ConditionCategory::Fail
        } else {
            ConditionCategory::Pass
        };
        (category, details)
    }
}
