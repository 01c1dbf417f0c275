//! TOML configuration files
//!
//! ```toml
//! [drift]
//! numeric_method = "psi"
//! num_bins = 20
//!
//! [thresholds]
//! max_allowed_categorical_score = 0.3
//!
//! [new_labels]
//! max_new_labels_ratio = 0.01
//! ```
//!
//! Every table and key is optional; missing ones keep their defaults.

use std::{fs, path::Path};

use anyhow::Context;
use driftwise_checks::config::ChecksConfig;

pub fn read_config_file<P>(path: P) -> anyhow::Result<ChecksConfig>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse_config(content: &str) -> anyhow::Result<ChecksConfig> {
    let config: ChecksConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
