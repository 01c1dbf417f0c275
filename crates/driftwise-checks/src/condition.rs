//! Conditions and their verdicts
//!
//! A condition inspects the value computed by a check and decides whether it
//! is acceptable. Conditions only read the value; running the same condition
//! twice on the same value yields the same [`ConditionResult`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict of a condition, ordered from worst to best.
///
/// # Examples
///
/// ```
/// use driftwise_checks::condition::ConditionCategory;
///
/// let worst = [ConditionCategory::Pass, ConditionCategory::Fail, ConditionCategory::Warn]
///     .into_iter()
///     .min();
/// assert_eq!(worst, Some(ConditionCategory::Fail));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionCategory {
    #[display("FAIL")]
    Fail,
    #[display("WARN")]
    Warn,
    #[display("PASS")]
    Pass,
}

/// Outcome of evaluating one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub name: String,
    pub category: ConditionCategory,
    pub details: String,
}

impl ConditionResult {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: ConditionCategory,
        details: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            details: details.into(),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.category.is_pass()
    }
}

/// A named predicate over a check value of type `V`.
pub trait Condition<V>: fmt::Debug {
    /// Human-readable name, including the thresholds it enforces.
    fn name(&self) -> String;

    /// Decides the category of `value` and explains it.
    fn decide(&self, value: &V) -> (ConditionCategory, String);

    fn evaluate(&self, value: &V) -> ConditionResult {
        let (category, details) = self.decide(value);
        ConditionResult::new(self.name(), category, details)
    }
}

pub type BoxedCondition<V> = Box<dyn Condition<V>>;

/// Evaluates `conditions` in order.
pub(crate) fn evaluate_all<V>(conditions: &[BoxedCondition<V>], value: &V) -> Vec<ConditionResult> {
    conditions
        .iter()
        .map(|condition| condition.evaluate(value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct AtMost(u32);

    impl Condition<u32> for AtMost {
        fn name(&self) -> String {
            format!("value <= {}", self.0)
        }

        fn decide(&self, value: &u32) -> (ConditionCategory, String) {
            let category = if *value > self.0 {
                ConditionCategory::Fail
            } else {
                ConditionCategory::Pass
            };
            (category, format!("value is {value}"))
        }
    }

    #[test]
    fn test_evaluate_keeps_order() {
        let conditions: Vec<BoxedCondition<u32>> = vec![Box::new(AtMost(10)), Box::new(AtMost(3))];
        let results = evaluate_all(&conditions, &5);
        assert_eq!(
            results,
            vec![
                ConditionResult::new("value <= 10", ConditionCategory::Pass, "value is 5"),
                ConditionResult::new("value <= 3", ConditionCategory::Fail, "value is 5"),
            ]
        );
        assert!(results[0].is_pass());
        assert!(!results[1].is_pass());
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&ConditionCategory::Warn).unwrap(),
            r#""WARN""#
        );
        assert_eq!(ConditionCategory::Fail.to_string(), "FAIL");
    }
}
