mod config;
mod credential;
mod errors;
mod fields;
mod log;
mod request;
mod variables;

pub use config::{StepConfiguration, StepSettings};
pub use credential::{Credential, CredentialRef};
pub use errors::{BuildStepError, ConfigError, CredentialError};
pub use fields::{
    field_specifications, FieldSpec, FieldType, StepCapabilities, StepInfo,
    CREDENTIAL_TYPE_PASSWORD, SETTING_CREDENTIAL, SETTING_PIPELINE, SETTING_QUERY_STRING,
    SETTING_SERVER_URL, STEP_CAPABILITIES, STEP_INFO,
};
pub use log::LogEntry;
pub use request::{
    ErrorKind, ExecutionOutcome, RequestSpec, CONFIRM_HEADER, DEFAULT_TIMEOUT_SECONDS,
};
pub use variables::{well_known_variables, BuildVariables, WellKnownVariable};
