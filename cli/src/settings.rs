use std::path::Path;

use anyhow::{Context, Result};
use gocd_defs::{ConfigError, StepSettings};
use log::debug;

const ENV_SERVER_URL: &str = "GOCD_SERVER_URL";
const ENV_PIPELINE: &str = "GOCD_PIPELINE";
const ENV_CREDENTIAL: &str = "GOCD_CREDENTIAL";
const ENV_QUERY_STRING: &str = "GOCD_QUERY_STRING";

/// Loads step settings from an optional YAML file, then lets environment
/// variables override individual keys.
pub fn load_settings(path: Option<&Path>) -> Result<StepSettings> {
    let settings = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            parse_settings(&contents)
                .with_context(|| format!("Failed to parse settings file {}", path.display()))?
        }
        None => StepSettings::default(),
    };

    Ok(apply_overrides(settings, |key| std::env::var(key).ok()))
}

pub fn parse_settings(contents: &str) -> Result<StepSettings, ConfigError> {
    serde_yaml::from_str(contents).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
}

fn apply_overrides<F>(mut settings: StepSettings, lookup: F) -> StepSettings
where
    F: Fn(&str) -> Option<String>,
{
    let overrides = [
        (ENV_SERVER_URL, &mut settings.server_url),
        (ENV_PIPELINE, &mut settings.pipeline),
        (ENV_CREDENTIAL, &mut settings.credential),
        (ENV_QUERY_STRING, &mut settings.query_string),
    ];
    for (key, slot) in overrides {
        if let Some(value) = lookup(key) {
            debug!("Setting overridden by {}", key);
            *slot = Some(value);
        }
    }
    settings
}
