use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use driftwise_checks::{
    check::{Check, CheckResult},
    config::ChecksConfig,
    dataset::Dataset,
    error::ConfigError,
};
use driftwise_stats::DriftMethod;
use serde::Serialize;

use crate::{config, data, report::Report, util::Output};

/// Exit status when `--fail-on-condition` is set and a condition failed.
const CONDITION_FAILED: u8 = 2;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CommonArg {
    /// Train (baseline) dataset JSON file
    train: PathBuf,
    /// Test (comparison) dataset JSON file
    test: PathBuf,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Method used to score numeric columns (`psi` or `emd`)
    #[arg(long)]
    numeric_method: Option<String>,
    /// Largest acceptable PSI score
    #[arg(long)]
    max_categorical_score: Option<f64>,
    /// Largest acceptable Earth Mover's Distance
    #[arg(long)]
    max_numeric_score: Option<f64>,
    /// Largest acceptable share of test labels unseen in train
    #[arg(long)]
    max_new_labels_ratio: Option<f64>,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Exit with a non-zero status when a condition fails
    #[arg(long)]
    fail_on_condition: bool,
}

impl CommonArg {
    /// Loads the configuration file, if any, and applies command-line overrides.
    pub(crate) fn load_config(&self) -> anyhow::Result<ChecksConfig> {
        let mut config = match &self.config {
            Some(path) => config::read_config_file(path)?,
            None => ChecksConfig::default(),
        };
        if let Some(name) = &self.numeric_method {
            config.drift.numeric_method = name
                .parse::<DriftMethod>()
                .map_err(ConfigError::from)
                .context("Invalid --numeric-method")?;
        }
        if let Some(score) = self.max_categorical_score {
            config.thresholds.max_allowed_categorical_score = score;
        }
        if let Some(score) = self.max_numeric_score {
            config.thresholds.max_allowed_numeric_score = score;
        }
        if let Some(ratio) = self.max_new_labels_ratio {
            config.new_labels.max_new_labels_ratio = ratio;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub(crate) fn load_datasets(&self) -> anyhow::Result<(Dataset, Dataset)> {
        let train = data::read_dataset_file(&self.train)?;
        let test = data::read_dataset_file(&self.test)?;
        Ok((train, test))
    }

    pub(crate) fn write_report<T>(&self, result: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let report = Report::new(&self.train, &self.test, result);
        Output::save_json(&report, self.output.as_deref())
    }

    fn fails_run(&self, passed: bool) -> bool {
        self.fail_on_condition && !passed
    }

    pub(crate) fn exit_code(&self, passed: bool) -> ExitCode {
        if self.fails_run(passed) {
            ExitCode::from(CONDITION_FAILED)
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs a single check and writes its result.
pub(crate) fn run_check<C>(common: &CommonArg, check: &C) -> anyhow::Result<ExitCode>
where
    C: Check,
{
    let (train, test) = common.load_datasets()?;
    let result: CheckResult = check
        .run(&train, &test)
        .with_context(|| format!("{} could not run", check.name()))?;
    for condition in &result.conditions_results {
        tracing::info!(
            check = %result.header,
            condition = %condition.name,
            category = %condition.category,
            "{}",
            condition.details
        );
    }
    common.write_report(&result)?;
    Ok(common.exit_code(result.passed_conditions(false)))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{fs, path::Path};

    use super::*;

    pub(crate) fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
        path
    }

    pub(crate) fn common_arg(train: PathBuf, test: PathBuf, output: PathBuf) -> CommonArg {
        CommonArg {
            train,
            test,
            config: None,
            numeric_method: None,
            max_categorical_score: None,
            max_numeric_score: None,
            max_new_labels_ratio: None,
            output: Some(output),
            fail_on_condition: true,
        }
    }

    pub(crate) fn read_report(path: &Path) -> serde_json::Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_overrides_apply_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[thresholds]\nmax_allowed_categorical_score = 0.5\nmax_allowed_numeric_score = 0.5\n",
        )
        .unwrap();
        let mut arg = common_arg(PathBuf::new(), PathBuf::new(), PathBuf::new());
        arg.config = Some(config_path);
        arg.max_numeric_score = Some(0.05);
        arg.numeric_method = Some("psi".to_owned());

        let config = arg.load_config().unwrap();
        assert_eq!(config.thresholds.max_allowed_categorical_score, 0.5);
        assert_eq!(config.thresholds.max_allowed_numeric_score, 0.05);
        assert_eq!(config.drift.numeric_method, DriftMethod::Psi);
    }

    #[test]
    fn test_unknown_method_override() {
        let mut arg = common_arg(PathBuf::new(), PathBuf::new(), PathBuf::new());
        arg.numeric_method = Some("kl".to_owned());
        let err = arg.load_config().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_invalid_override() {
        let mut arg = common_arg(PathBuf::new(), PathBuf::new(), PathBuf::new());
        arg.max_new_labels_ratio = Some(1.5);
        assert!(arg.load_config().is_err());
    }

    #[test]
    fn test_fail_on_condition() {
        let mut arg = common_arg(PathBuf::new(), PathBuf::new(), PathBuf::new());
        assert!(!arg.fails_run(true));
        assert!(arg.fails_run(false));
        arg.fail_on_condition = false;
        assert!(!arg.fails_run(false));
    }
}
