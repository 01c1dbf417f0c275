//! Running several checks on the same dataset pair
//!
//! A [`Suite`] runs its checks in order and never stops early: a check that
//! cannot produce a result is recorded as a [`CheckFailure`] and the next
//! check runs.

use serde::{Serialize, Serializer};

use crate::{
    check::{BoxedCheck, Check, CheckResult},
    condition::{ConditionCategory, ConditionResult},
    config::ChecksConfig,
    dataset::Dataset,
    error::{CheckError, ConfigError},
    feature_drift::TrainTestFeatureDrift,
    label_drift::TrainTestLabelDrift,
    new_labels::NewLabels,
};

/// Named, ordered list of checks.
///
/// # Examples
///
/// ```
/// use driftwise_checks::{config::ChecksConfig, dataset::Dataset, suite::Suite};
///
/// let train = Dataset::new()
///     .with_label(vec!["a", "b"])
///     .with_feature("x", vec![1.0, 2.0]);
/// let test = train.clone();
///
/// let suite = Suite::train_test_validation(&ChecksConfig::default()).unwrap();
/// let result = suite.run(&train, &test);
/// assert_eq!(result.results.len(), 3);
/// assert!(result.passed(false, true));
/// ```
#[derive(Debug)]
pub struct Suite {
    name: String,
    checks: Vec<BoxedCheck>,
}

impl Suite {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    #[must_use]
    pub fn add<C>(mut self, check: C) -> Self
    where
        C: Check + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Label drift, feature drift and new labels, each with its default
    /// condition configured from `config`.
    pub fn train_test_validation(config: &ChecksConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new("Train Test Validation Suite")
            .add(
                TrainTestLabelDrift::new(config.drift)?
                    .add_condition_drift_score_not_greater_than(config.thresholds)?,
            )
            .add(
                TrainTestFeatureDrift::new(config.drift)?
                    .add_condition_drift_score_not_greater_than(config.thresholds)?,
            )
            .add(
                NewLabels::default()
                    .add_condition_new_label_ratio_not_greater_than(config.new_labels)?,
            ))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn run(&self, train: &Dataset, test: &Dataset) -> SuiteResult {
        let mut results = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            tracing::debug!(suite = %self.name, check = check.name(), "running check");
            let outcome = match check.run(train, test) {
                Ok(result) => CheckOutcome::Result(result),
                Err(error) => {
                    tracing::debug!(check = check.name(), %error, "check failed");
                    CheckOutcome::Failure(CheckFailure {
                        header: check.name().to_owned(),
                        error,
                    })
                }
            };
            results.push(outcome);
        }
        SuiteResult {
            name: self.name.clone(),
            results,
        }
    }
}

/// A check that could not produce a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckFailure {
    pub header: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: CheckError,
}

#[derive(Debug, Clone, PartialEq, derive_more::IsVariant, Serialize)]
#[serde(untagged)]
pub enum CheckOutcome {
    Result(CheckResult),
    Failure(CheckFailure),
}

impl CheckOutcome {
    #[must_use]
    pub fn header(&self) -> &str {
        match self {
            Self::Result(result) => &result.header,
            Self::Failure(failure) => &failure.header,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteResult {
    pub name: String,
    pub results: Vec<CheckOutcome>,
}

impl SuiteResult {
    /// Every `(check header, condition result)` pair, in execution order.
    pub fn conditions_summary(&self) -> impl Iterator<Item = (&str, &ConditionResult)> {
        self.check_results().flat_map(|result| {
            result
                .conditions_results
                .iter()
                .map(move |condition| (result.header.as_str(), condition))
        })
    }

    pub fn check_results(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter_map(|outcome| match outcome {
            CheckOutcome::Result(result) => Some(result),
            CheckOutcome::Failure(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckFailure> {
        self.results.iter().filter_map(|outcome| match outcome {
            CheckOutcome::Result(_) => None,
            CheckOutcome::Failure(failure) => Some(failure),
        })
    }

    /// Whether every condition passed.
    ///
    /// Warnings fail the suite when `fail_if_warning` is set, and checks that
    /// did not run fail it when `fail_if_check_not_run` is set.
    #[must_use]
    pub fn passed(&self, fail_if_warning: bool, fail_if_check_not_run: bool) -> bool {
        if fail_if_check_not_run && self.failures().next().is_some() {
            return false;
        }
        self.check_results()
            .all(|result| result.passed_conditions(fail_if_warning))
    }

    /// Worst condition category across all results.
    #[must_use]
    pub fn priority(&self) -> Option<ConditionCategory> {
        self.check_results().filter_map(CheckResult::priority).min()
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
