use std::process::ExitCode;

use driftwise_checks::suite::Suite;

use super::common::CommonArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SuiteArg {
    #[clap(flatten)]
    common: CommonArg,
}

pub(crate) fn run(arg: &SuiteArg) -> anyhow::Result<ExitCode> {
    let config = arg.common.load_config()?;
    let (train, test) = arg.common.load_datasets()?;
    let suite = Suite::train_test_validation(&config)?;
    let result = suite.run(&train, &test);

    for (check, condition) in result.conditions_summary() {
        tracing::info!(
            check,
            condition = %condition.name,
            category = %condition.category,
            "{}",
            condition.details
        );
    }
    for failure in result.failures() {
        tracing::warn!(check = %failure.header, error = %failure.error, "check did not run");
    }
    arg.common.write_report(&result)?;

    if result.failures().next().is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(arg.common.exit_code(result.passed(false, false)))
}
