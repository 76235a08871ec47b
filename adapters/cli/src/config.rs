//! Loading of session configuration files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use zombie_survival_core::SurvivalConfig;

/// Reads the configuration at `path`, or the defaults when no path is given.
///
/// Missing tables and keys fall back to their defaults. The result is
/// validated before it is returned.
pub(crate) fn load(path: Option<&Path>) -> Result<SurvivalConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file at {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("invalid config file at {}", path.display()))?
        }
        None => SurvivalConfig::default(),
    };
    config
        .validate()
        .context("configuration rejected by validation")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<SurvivalConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
