use std::process::ExitCode;

use driftwise_checks::feature_drift::TrainTestFeatureDrift;

use super::common::{self, CommonArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FeatureDriftArg {
    #[clap(flatten)]
    common: CommonArg,
    /// Only check these columns
    #[arg(long)]
    columns: Vec<String>,
    /// Skip these columns
    #[arg(long)]
    ignore_columns: Vec<String>,
}

pub(crate) fn run(arg: &FeatureDriftArg) -> anyhow::Result<ExitCode> {
    let config = arg.common.load_config()?;
    let mut check = TrainTestFeatureDrift::new(config.drift)?
        .with_ignore_columns(arg.ignore_columns.iter().cloned())
        .add_condition_drift_score_not_greater_than(config.thresholds)?;
    if !arg.columns.is_empty() {
        check = check.with_columns(arg.columns.iter().cloned());
    }
    common::run_check(&arg.common, &check)
}
