// Scaffolding shared by the end-to-end tests: a mock GoCD server and
// helpers to build a step pointed at it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use gocd_defs::{BuildVariables, StepConfiguration, StepSettings};
use gocd_step::{CredentialStore, GoCdBuildStep, MemoryBuildTarget, ReqwestTransport};
use wiremock::{Match, MockServer, Request};

pub const PIPELINE: &str = "build-1";
pub const SCHEDULE_PATH: &str = "/go/api/pipelines/build-1/schedule";

pub async fn start_gocd() -> MockServer {
    MockServer::start().await
}

/// Settings as a user would type them, with a trailing slash on the URL.
pub fn settings(server_url: &str, credential: Option<&str>, query: &str) -> StepSettings {
    StepSettings {
        server_url: Some(format!("{}/", server_url)),
        credential: credential.map(str::to_string),
        pipeline: Some(PIPELINE.to_string()),
        query_string: Some(query.to_string()),
    }
}

pub fn build_step(settings: &StepSettings, credentials: Box<dyn CredentialStore>) -> GoCdBuildStep {
    let config = StepConfiguration::from_settings(settings).expect("valid step settings");
    GoCdBuildStep::new(config, Box::new(ReqwestTransport::new()), credentials)
}

pub fn target(variables: &[(&str, &str)]) -> MemoryBuildTarget {
    let variables: BuildVariables = variables.iter().copied().collect();
    MemoryBuildTarget::new(variables)
}

pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Matches requests that carry no `Authorization` header at all.
pub struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}
