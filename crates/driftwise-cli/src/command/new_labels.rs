use std::process::ExitCode;

use driftwise_checks::new_labels::NewLabels;

use super::common::{self, CommonArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct NewLabelsArg {
    #[clap(flatten)]
    common: CommonArg,
}

pub(crate) fn run(arg: &NewLabelsArg) -> anyhow::Result<ExitCode> {
    let config = arg.common.load_config()?;
    let check =
        NewLabels::default().add_condition_new_label_ratio_not_greater_than(config.new_labels)?;
    common::run_check(&arg.common, &check)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::command::common::tests::{common_arg, read_report, write_json};

    #[test]
    fn test_new_labels_report() {
        let dir = tempfile::tempdir().unwrap();
        let train = write_json(dir.path(), "train.json", &json!({"label": ["a", "b"]}));
        let test = write_json(
            dir.path(),
            "test.json",
            &json!({"label": ["a", "b", "c", "c"]}),
        );
        let output = dir.path().join("report.json");
        let arg = NewLabelsArg {
            common: common_arg(train, test, output.clone()),
        };

        run(&arg).unwrap();

        let report = read_report(&output);
        assert_eq!(
            report["result"]["value"],
            json!({"new_labels": {"c": 2}, "all_labels_count": 4})
        );
        assert_eq!(
            report["result"]["conditions_results"][0]["details"],
            "50% of labels found in test set were not in train set. \
             New labels most common in test set: ['c']"
        );
    }
}
