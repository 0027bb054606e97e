use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::fields::{
    SETTING_CREDENTIAL, SETTING_PIPELINE, SETTING_QUERY_STRING, SETTING_SERVER_URL,
};
use crate::CredentialRef;

/// Raw settings as stored by the host, before validation.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct StepSettings {
    #[serde(rename = "server.url", default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub pipeline: Option<String>,
    #[serde(rename = "query.string", default)]
    pub query_string: Option<String>,
}

impl StepSettings {
    pub fn from_map(settings: &HashMap<String, String>) -> Self {
        StepSettings {
            server_url: settings.get(SETTING_SERVER_URL).cloned(),
            credential: settings.get(SETTING_CREDENTIAL).cloned(),
            pipeline: settings.get(SETTING_PIPELINE).cloned(),
            query_string: settings.get(SETTING_QUERY_STRING).cloned(),
        }
    }
}

/// Validated configuration of one build step instance. Read-only while the
/// step executes.
#[derive(Clone, Debug, PartialEq)]
pub struct StepConfiguration {
    server_url: String,
    pipeline_name: String,
    credential: Option<CredentialRef>,
    query_template: String,
}

impl StepConfiguration {
    pub fn new(
        server_url: &str,
        pipeline_name: &str,
        credential: Option<CredentialRef>,
        query_template: &str,
    ) -> Result<Self, ConfigError> {
        let server_url = required(SETTING_SERVER_URL, Some(server_url))?;
        let pipeline_name = required(SETTING_PIPELINE, Some(pipeline_name))?;

        Ok(StepConfiguration {
            server_url: server_url.trim_end_matches('/').to_string(),
            pipeline_name,
            credential,
            query_template: query_template.to_string(),
        })
    }

    pub fn from_settings(settings: &StepSettings) -> Result<Self, ConfigError> {
        let server_url = required(SETTING_SERVER_URL, settings.server_url.as_deref())?;
        let pipeline_name = required(SETTING_PIPELINE, settings.pipeline.as_deref())?;

        // The host stores an unset credential field as an empty string
        let credential = settings
            .credential
            .as_deref()
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
            .map(CredentialRef::new);

        Self::new(
            &server_url,
            &pipeline_name,
            credential,
            settings.query_string.as_deref().unwrap_or_default(),
        )
    }

    pub fn from_map(settings: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_settings(&StepSettings::from_map(settings))
    }

    /// Base URL of the GoCD server, never ending in `/`.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }

    pub fn credential(&self) -> Option<&CredentialRef> {
        self.credential.as_ref()
    }

    pub fn query_template(&self) -> &str {
        &self.query_template
    }
}

/// Rejects absent or blank values; the value itself is kept as entered.
fn required(key: &'static str, value: Option<&str>) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(ConfigError::MissingSetting(key)),
    }
}
