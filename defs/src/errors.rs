use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Required setting '{0}' is missing or empty")]
    MissingSetting(&'static str),

    #[error("Could not read settings: {0}")]
    InvalidSettings(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum CredentialError {
    #[error("Credential '{0}' does not exist")]
    NotFound(String),

    #[error("Credential '{0}' is not accessible: {1}")]
    Inaccessible(String, String),

    #[error("Credential '{0}' is not a username/password credential")]
    WrongType(String),
}

/// Raised when the build step fails. Every variant fails the build target.
#[derive(Error, Debug)]
pub enum BuildStepError {
    #[error("Could not resolve credential: {0}")]
    CredentialResolution(#[from] CredentialError),

    #[error("Request to {url} failed: {reason} (transport error {code})")]
    Transport {
        url: String,
        code: i32,
        reason: String,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Http { url: String, status: i32 },

    #[error("Could not write build log: {0}")]
    Log(String),
}
