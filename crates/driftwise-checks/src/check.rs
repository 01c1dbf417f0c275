//! Check results and the [`Check`] trait
//!
//! A check computes a value from a train/test dataset pair, then evaluates its
//! registered conditions against that value. The [`CheckResult`] bundles both
//! in a serializable shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    condition::{ConditionCategory, ConditionResult},
    dataset::Dataset,
    drift::{DriftValue, FeatureDriftValue},
    error::CheckError,
    new_labels::NewLabelsValue,
};

/// Check-specific payload of a [`CheckResult`].
#[derive(Debug, Clone, PartialEq, derive_more::From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    LabelDrift(DriftValue),
    FeatureDrift(FeatureDriftValue),
    NewLabels(NewLabelsValue),
}

/// Value and condition verdicts produced by one check run.
///
/// # Examples
///
/// ```
/// use driftwise_checks::{
///     check::CheckResult,
///     condition::{ConditionCategory, ConditionResult},
///     drift::DriftValue,
/// };
/// use driftwise_stats::DriftMethod;
///
/// let value = DriftValue { drift_score: 0.24, method: DriftMethod::Psi };
/// let result = CheckResult::new("Train Test Label Drift", value).with_conditions_results(vec![
///     ConditionResult::new("score <= 0.2", ConditionCategory::Fail, "score is 0.24"),
/// ]);
///
/// assert!(result.have_conditions());
/// assert!(!result.passed_conditions(false));
/// assert_eq!(result.priority(), Some(ConditionCategory::Fail));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub header: String,
    pub value: CheckValue,
    /// In condition insertion order.
    pub conditions_results: Vec<ConditionResult>,
}

impl CheckResult {
    #[must_use]
    pub fn new(header: impl Into<String>, value: impl Into<CheckValue>) -> Self {
        Self {
            header: header.into(),
            value: value.into(),
            conditions_results: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_conditions_results(mut self, conditions_results: Vec<ConditionResult>) -> Self {
        self.conditions_results = conditions_results;
        self
    }

    #[must_use]
    pub fn have_conditions(&self) -> bool {
        !self.conditions_results.is_empty()
    }

    /// Whether no condition failed. Warnings count as failures when
    /// `fail_if_warning` is set.
    #[must_use]
    pub fn passed_conditions(&self, fail_if_warning: bool) -> bool {
        self.conditions_results.iter().all(|result| match result.category {
            ConditionCategory::Pass => true,
            ConditionCategory::Warn => !fail_if_warning,
            ConditionCategory::Fail => false,
        })
    }

    /// Worst category among the condition results, `None` without conditions.
    #[must_use]
    pub fn priority(&self) -> Option<ConditionCategory> {
        self.conditions_results
            .iter()
            .map(|result| result.category)
            .min()
    }
}

/// A diagnostic over a train/test dataset pair.
///
/// Checks hold only configuration and conditions, so running one repeatedly
/// never accumulates state.
pub trait Check: fmt::Debug {
    /// Header used for the results of this check.
    fn name(&self) -> &'static str;

    /// Computes the check value and evaluates every condition in order.
    fn run(&self, train: &Dataset, test: &Dataset) -> Result<CheckResult, CheckError>;
}

pub type BoxedCheck = Box<dyn Check>;
