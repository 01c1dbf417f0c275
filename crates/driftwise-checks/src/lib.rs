//! Train/test validation checks built on the drift engine.
//!
//! A check reduces a train/test [`Dataset`](dataset::Dataset) pair to a value,
//! then evaluates its conditions against that value:
//!
//! - **Checks**: [`TrainTestLabelDrift`](label_drift::TrainTestLabelDrift),
//!   [`TrainTestFeatureDrift`](feature_drift::TrainTestFeatureDrift) and
//!   [`NewLabels`](new_labels::NewLabels)
//! - **Conditions**: named predicates producing a
//!   [`ConditionResult`](condition::ConditionResult) with a PASS/WARN/FAIL
//!   category and human-readable details
//! - **Results**: [`CheckResult`](check::CheckResult) bundles the value with the
//!   ordered condition results; [`Suite`](suite::Suite) runs many checks and
//!   keeps going when one of them errors
//!
//! # Modules
//!
//! - [`dataset`]: Columns, datasets and task types
//! - [`config`]: Drift parameters and condition thresholds
//! - [`condition`]: Condition trait and verdicts
//! - [`check`]: Check trait and result shape
//! - [`drift`]: Column-level drift scoring shared by the drift checks
//! - [`label_drift`], [`feature_drift`], [`new_labels`]: Concrete checks
//! - [`suite`]: Running several checks together
//! - [`format`]: Number formatting used in condition names and details
//! - [`error`]: Error types
//!
//! # Examples
//!
//! ```
//! use driftwise_checks::{
//!     check::Check as _,
//!     condition::ConditionCategory,
//!     config::DriftThresholds,
//!     dataset::Dataset,
//!     label_drift::TrainTestLabelDrift,
//! };
//!
//! let train = Dataset::new().with_label((0..100).map(|i| f64::from(i) / 10.0).collect::<Vec<_>>());
//! let test = Dataset::new().with_label((0..100).map(|i| f64::from(i) / 10.0 + 5.0).collect::<Vec<_>>());
//!
//! let check = TrainTestLabelDrift::default()
//!     .add_condition_drift_score_not_greater_than(DriftThresholds::default())
//!     .unwrap();
//! let result = check.run(&train, &test).unwrap();
//! assert_eq!(result.priority(), Some(ConditionCategory::Fail));
//! ```

pub mod check;
pub mod condition;
pub mod config;
pub mod dataset;
pub mod drift;
pub mod error;
pub mod feature_drift;
pub mod format;
pub mod label_drift;
pub mod new_labels;
pub mod suite;
