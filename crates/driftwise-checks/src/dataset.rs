//! In-memory datasets consumed by checks
//!
//! Checks never look at raw rows. A [`Dataset`] exposes its label and feature
//! columns as flat sequences, which is all the drift engine needs.

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
};

use serde::{Deserialize, Serialize};

/// Numeric labels with at most this many distinct integral values are
/// treated as classes.
pub const MAX_INFERRED_CLASSES: usize = 30;

/// Kind of prediction task a label belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[display("classification")]
    Classification,
    #[display("regression")]
    Regression,
}

impl TaskType {
    /// Infers the task type from a label column.
    ///
    /// Categorical labels are classification. Numeric labels are
    /// classification when every value is integral and there are at most
    /// [`MAX_INFERRED_CLASSES`] distinct values, and regression otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftwise_checks::dataset::{Column, TaskType};
    ///
    /// assert_eq!(TaskType::infer(&Column::from(vec![0.0, 1.0, 1.0])), TaskType::Classification);
    /// assert_eq!(TaskType::infer(&Column::from(vec![0.5, 1.25])), TaskType::Regression);
    /// assert_eq!(TaskType::infer(&Column::from(vec!["cat", "dog"])), TaskType::Classification);
    /// ```
    #[must_use]
    pub fn infer(label: &Column) -> Self {
        match label {
            Column::Categorical(_) => Self::Classification,
            Column::Numeric(values) => {
                let mut classes = BTreeSet::new();
                for value in values.iter().filter(|v| !v.is_nan()) {
                    if value.fract() != 0.0 {
                        return Self::Regression;
                    }
                    classes.insert(value.to_bits());
                    if classes.len() > MAX_INFERRED_CLASSES {
                        return Self::Regression;
                    }
                }
                Self::Classification
            }
        }
    }
}

/// Whether a column is compared category by category or as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum ColumnKind {
    Categorical,
    Numeric,
}

/// A single column of values. Numeric `NaN`s are missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Categorical(Vec<String>),
    Numeric(Vec<f64>),
}

impl Column {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Categorical(values) => values.len(),
            Self::Numeric(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Categorical(_) => ColumnKind::Categorical,
            Self::Numeric(_) => ColumnKind::Numeric,
        }
    }

    /// Values as category names; numbers are rendered in their shortest form
    /// (`1.0` becomes `"1"`) and missing values are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftwise_checks::dataset::Column;
    ///
    /// let column = Column::from(vec![1.0, f64::NAN, 2.5]);
    /// assert_eq!(column.to_categories().as_ref(), ["1", "2.5"]);
    /// ```
    #[must_use]
    pub fn to_categories(&self) -> Cow<'_, [String]> {
        match self {
            Self::Categorical(values) => Cow::Borrowed(values),
            Self::Numeric(values) => Cow::Owned(
                values
                    .iter()
                    .filter(|v| !v.is_nan())
                    .map(f64::to_string)
                    .collect(),
            ),
        }
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Self::Categorical(values)
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Self::Categorical(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Self::Numeric(values)
    }
}

/// A dataset: an optional label column plus named feature columns.
///
/// # Examples
///
/// ```
/// use driftwise_checks::dataset::{Column, Dataset, TaskType};
///
/// let dataset = Dataset::new()
///     .with_label(vec!["spam", "ham", "ham"])
///     .with_feature("length", vec![120.0, 80.0, 95.0])
///     .with_feature("sender", vec!["a", "b", "a"]);
///
/// assert_eq!(dataset.task_type(), Some(TaskType::Classification));
/// assert_eq!(dataset.feature_names().collect::<Vec<_>>(), ["length", "sender"]);
/// assert!(dataset.is_categorical_feature("sender"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    label: Option<Column>,
    task_type: Option<TaskType>,
    features: BTreeMap<String, Column>,
    cat_features: Option<BTreeSet<String>>,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<Column>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Overrides the inferred task type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.features.insert(name.into(), column.into());
        self
    }

    /// Declares numeric features that should be treated as categorical.
    ///
    /// Categorical columns are always categorical features, whether listed or
    /// not.
    #[must_use]
    pub fn with_cat_features<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cat_features = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn label(&self) -> Option<&Column> {
        self.label.as_ref()
    }

    /// The explicit task type, or the one inferred from the label.
    #[must_use]
    pub fn task_type(&self) -> Option<TaskType> {
        self.task_type
            .or_else(|| self.label.as_ref().map(TaskType::infer))
    }

    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Column> {
        self.features.get(name)
    }

    /// Feature names in ascending order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Whether `name` is listed in the categorical features or holds a
    /// categorical column.
    #[must_use]
    pub fn is_categorical_feature(&self, name: &str) -> bool {
        self.cat_features
            .as_ref()
            .is_some_and(|names| names.contains(name))
            || self
                .features
                .get(name)
                .is_some_and(|column| column.kind().is_categorical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_many_integers_is_regression() {
        let values = (0..100).map(f64::from).collect::<Vec<_>>();
        assert_eq!(TaskType::infer(&Column::from(values)), TaskType::Regression);
    }

    #[test]
    fn test_infer_ignores_missing() {
        let column = Column::from(vec![0.0, f64::NAN, 1.0]);
        assert_eq!(TaskType::infer(&column), TaskType::Classification);
    }

    #[test]
    fn test_explicit_task_type_wins() {
        let dataset = Dataset::new()
            .with_label(vec![0.0, 1.0])
            .with_task_type(TaskType::Regression);
        assert_eq!(dataset.task_type(), Some(TaskType::Regression));
    }

    #[test]
    fn test_no_label_no_task_type() {
        assert_eq!(Dataset::new().task_type(), None);
    }

    #[test]
    fn test_cat_features_extend_column_kind() {
        let dataset = Dataset::new()
            .with_feature("zip", vec![10001.0, 94105.0])
            .with_feature("city", vec!["NYC", "SF"])
            .with_cat_features(["zip"]);
        assert!(dataset.is_categorical_feature("zip"));
        assert!(dataset.is_categorical_feature("city"));
        assert!(!dataset.is_categorical_feature("missing"));
    }

    #[test]
    fn test_categories_borrow_strings() {
        let column = Column::from(vec!["a", "b"]);
        assert!(matches!(column.to_categories(), Cow::Borrowed(_)));
    }
}
