use std::process::ExitCode;

use driftwise_checks::label_drift::TrainTestLabelDrift;

use super::common::{self, CommonArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LabelDriftArg {
    #[clap(flatten)]
    common: CommonArg,
}

pub(crate) fn run(arg: &LabelDriftArg) -> anyhow::Result<ExitCode> {
    let config = arg.common.load_config()?;
    let check = TrainTestLabelDrift::new(config.drift)?
        .add_condition_drift_score_not_greater_than(config.thresholds)?;
    common::run_check(&arg.common, &check)
}
