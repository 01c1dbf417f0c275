//! Dataset files
//!
//! A dataset file is a JSON object with an optional `label` column, an
//! optional `task_type`, named `features` and an optional `cat_features` list:
//!
//! ```json
//! {
//!   "label": ["spam", "ham"],
//!   "task_type": "classification",
//!   "features": { "length": [120, null], "sender": ["a", "b"] },
//!   "cat_features": ["sender"]
//! }
//! ```
//!
//! Arrays of strings are categorical columns. Arrays of numbers are numeric
//! columns, where `null` marks a missing value.

use std::{collections::BTreeMap, path::Path};

use driftwise_checks::dataset::{Column, Dataset, TaskType};
use serde::Deserialize;

use crate::util;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetFile {
    #[serde(default)]
    label: Option<RawColumn>,
    #[serde(default)]
    task_type: Option<TaskType>,
    #[serde(default)]
    features: BTreeMap<String, RawColumn>,
    #[serde(default)]
    cat_features: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<String>),
}

impl From<RawColumn> for Column {
    fn from(column: RawColumn) -> Self {
        match column {
            RawColumn::Numeric(values) => {
                Column::Numeric(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            }
            RawColumn::Categorical(values) => Column::Categorical(values),
        }
    }
}

impl From<DatasetFile> for Dataset {
    fn from(file: DatasetFile) -> Self {
        let mut dataset = Dataset::new();
        if let Some(label) = file.label {
            dataset = dataset.with_label(label);
        }
        if let Some(task_type) = file.task_type {
            dataset = dataset.with_task_type(task_type);
        }
        for (name, column) in file.features {
            dataset = dataset.with_feature(name, column);
        }
        if let Some(cat_features) = file.cat_features {
            dataset = dataset.with_cat_features(cat_features);
        }
        dataset
    }
}

pub fn read_dataset_file<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file: DatasetFile = util::read_json_file("dataset", path)?;
    tracing::debug!(
        path = %path.display(),
        features = file.features.len(),
        has_label = file.label.is_some(),
        "loaded dataset"
    );
    Ok(file.into())
}
