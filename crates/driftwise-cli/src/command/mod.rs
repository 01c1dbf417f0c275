use std::process::ExitCode;

use clap::{Parser, Subcommand};

use self::{
    feature_drift::FeatureDriftArg, label_drift::LabelDriftArg, new_labels::NewLabelsArg,
    suite::SuiteArg,
};

mod common;
mod feature_drift;
mod label_drift;
mod new_labels;
mod suite;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compare the label distribution of two datasets
    LabelDrift(#[clap(flatten)] LabelDriftArg),
    /// Compare every shared feature column of two datasets
    FeatureDrift(#[clap(flatten)] FeatureDriftArg),
    /// Find test labels that never occur in train
    NewLabels(#[clap(flatten)] NewLabelsArg),
    /// Run every check and report them together
    Suite(#[clap(flatten)] SuiteArg),
}

pub fn run() -> anyhow::Result<ExitCode> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::LabelDrift(arg) => label_drift::run(&arg),
        Mode::FeatureDrift(arg) => feature_drift::run(&arg),
        Mode::NewLabels(arg) => new_labels::run(&arg),
        Mode::Suite(arg) => suite::run(&arg),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_feature_drift() {
        let args = CommandArgs::try_parse_from([
            "driftwise",
            "feature-drift",
            "train.json",
            "test.json",
            "--columns",
            "a",
            "--columns",
            "b",
            "--numeric-method",
            "psi",
            "--fail-on-condition",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::FeatureDrift(_)));
    }

    #[test]
    fn test_missing_test_path() {
        assert!(CommandArgs::try_parse_from(["driftwise", "label-drift", "train.json"]).is_err());
    }
}
