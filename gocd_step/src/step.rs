use std::fmt;

use gocd_defs::{
    field_specifications, BuildStepError, BuildVariables, Credential, CredentialError, ErrorKind,
    ExecutionOutcome, FieldSpec, RequestSpec, StepConfiguration, StepInfo, STEP_CAPABILITIES,
    STEP_INFO,
};
use gocd_utils::{build_schedule_url, substitute};
use log::{debug, info, warn};

use crate::classify::classify;
use crate::credentials::CredentialStore;
use crate::target::{Build, BuildTarget};
use crate::transport::{transport_reason, HttpTransport};

/// Progress of a single execution. Nothing carries over between executions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Idle,
    UrlBuilt,
    QueryExpanded,
    RequestSent,
    OutcomeClassified,
    Succeeded,
    Failed,
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepState::Idle => "idle",
            StepState::UrlBuilt => "url built",
            StepState::QueryExpanded => "query expanded",
            StepState::RequestSent => "request sent",
            StepState::OutcomeClassified => "outcome classified",
            StepState::Succeeded => "succeeded",
            StepState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Build step that schedules a GoCD pipeline run.
pub struct GoCdBuildStep {
    config: StepConfiguration,
    transport: Box<dyn HttpTransport>,
    credentials: Box<dyn CredentialStore>,
}

impl GoCdBuildStep {
    pub fn new(
        config: StepConfiguration,
        transport: Box<dyn HttpTransport>,
        credentials: Box<dyn CredentialStore>,
    ) -> Self {
        GoCdBuildStep {
            config,
            transport,
            credentials,
        }
    }

    pub fn info() -> StepInfo {
        STEP_INFO
    }

    pub fn field_specifications() -> Vec<FieldSpec> {
        field_specifications()
    }

    pub fn supports_wait_for_message(&self) -> bool {
        STEP_CAPABILITIES.supports_wait_for_message
    }

    pub fn should_wait_for_message(&self, _target: &dyn BuildTarget) -> bool {
        STEP_CAPABILITIES.should_wait_for_message
    }

    pub fn config(&self) -> &StepConfiguration {
        &self.config
    }

    pub fn schedule_url(&self) -> String {
        build_schedule_url(self.config.server_url(), self.config.pipeline_name())
    }

    pub fn query_string(&self, variables: &BuildVariables) -> String {
        substitute(self.config.query_template(), variables)
    }

    async fn resolve_credential(&self) -> Result<Option<Credential>, CredentialError> {
        match self.config.credential() {
            Some(reference) => self.credentials.resolve(reference).await.map(Some),
            None => Ok(None),
        }
    }

    /// Runs the step once for `target`.
    ///
    /// Exactly one request is attempted and exactly one log entry is written,
    /// labelled with the request URL. Any error fails the build target.
    pub async fn execute(
        &self,
        build: &Build,
        target: &dyn BuildTarget,
    ) -> Result<(), BuildStepError> {
        trace_state(build, StepState::Idle);

        let url = self.schedule_url();
        trace_state(build, StepState::UrlBuilt);

        let body = self.query_string(target.variables());
        trace_state(build, StepState::QueryExpanded);

        let credential = match self.resolve_credential().await {
            Ok(credential) => credential,
            Err(e) => {
                let error = BuildStepError::from(e);
                if let Err(log_error) = append_log(target, &url, &body, &error.to_string()) {
                    warn!("{}", log_error);
                }
                trace_state(build, StepState::Failed);
                return Err(error);
            }
        };

        info!("Scheduling GoCD pipeline via {}", url);
        let outcome = {
            let request = RequestSpec::new(&url, &body, credential);
            self.transport.send(&request).await
        };
        trace_state(build, StepState::RequestSent);

        let classification = classify(&outcome);
        trace_state(build, StepState::OutcomeClassified);

        let logged = append_log(target, &url, &body, &classification.log_text);

        if !classification.is_failure {
            logged?;
            trace_state(build, StepState::Succeeded);
            return Ok(());
        }

        if let Err(log_error) = logged {
            warn!("{}", log_error);
        }
        trace_state(build, StepState::Failed);
        Err(failure(url, &outcome))
    }
}

fn trace_state(build: &Build, state: StepState) {
    debug!("build {}: {}", build.id, state);
}

fn append_log(
    target: &dyn BuildTarget,
    url: &str,
    body: &str,
    text: &str,
) -> Result<(), BuildStepError> {
    target
        .new_log(url, body)
        .append(text)
        .map_err(|e| BuildStepError::Log(e.to_string()))
}

fn failure(url: String, outcome: &ExecutionOutcome) -> BuildStepError {
    match outcome.error_kind {
        Some(ErrorKind::Transport) => BuildStepError::Transport {
            url,
            code: outcome.status_code,
            reason: transport_reason(outcome.status_code).to_string(),
        },
        _ => BuildStepError::Http {
            url,
            status: outcome.status_code,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentialStore;
    use crate::target::MemoryBuildTarget;
    use crate::transport::TIMED_OUT;
    use async_trait::async_trait;
    use gocd_defs::{CredentialRef, StepSettings};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct FakeTransport {
        outcome: ExecutionOutcome,
        sent: Arc<Mutex<Vec<RequestSpec>>>,
    }

    impl FakeTransport {
        fn returning(outcome: ExecutionOutcome) -> Self {
            FakeTransport {
                outcome,
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn sent(&self) -> Vec<RequestSpec> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(&self, request: &RequestSpec) -> ExecutionOutcome {
            self.sent.lock().unwrap().push(request.clone());
            self.outcome.clone()
        }
    }

    fn config(credential: Option<&str>) -> StepConfiguration {
        StepConfiguration::from_settings(&StepSettings {
            server_url: Some("https://ci.example.com/".to_string()),
            pipeline: Some("build-1".to_string()),
            credential: credential.map(str::to_string),
            query_string: Some("rev=${buildable.diff}".to_string()),
        })
        .unwrap()
    }

    fn target() -> MemoryBuildTarget {
        MemoryBuildTarget::new([("buildable.diff", "abc123")].into_iter().collect())
    }

    fn step(transport: &FakeTransport, credential: Option<&str>) -> GoCdBuildStep {
        let store = StaticCredentialStore::new()
            .with_credential("gocd-bot", Credential::new("bot", "s3cret"));
        GoCdBuildStep::new(config(credential), Box::new(transport.clone()), Box::new(store))
    }

    #[tokio::test]
    async fn test_execute_success() {
        let transport =
            FakeTransport::returning(ExecutionOutcome::response(202, "queued".to_string(), false));
        let target = target();

        step(&transport, None)
            .execute(&Build::new("7"), &target)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].url,
            "https://ci.example.com/go/api/pipelines/build-1/schedule"
        );
        assert_eq!(sent[0].body, "rev=abc123");
        assert_eq!(sent[0].auth, None);

        let entries = target.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, sent[0].url);
        assert_eq!(entries[0].payload, "rev=abc123");
        assert_eq!(entries[0].text, "HTTP 202 \nqueued");
    }

    #[tokio::test]
    async fn test_execute_attaches_credential() {
        let transport =
            FakeTransport::returning(ExecutionOutcome::response(200, String::new(), false));

        step(&transport, Some("gocd-bot"))
            .execute(&Build::new("7"), &target())
            .await
            .unwrap();

        assert_eq!(
            transport.sent()[0].auth,
            Some(Credential::new("bot", "s3cret"))
        );
    }

    #[tokio::test]
    async fn test_execute_http_error_fails_build() {
        let transport =
            FakeTransport::returning(ExecutionOutcome::response(500, "oops".to_string(), true));
        let target = target();

        let err = step(&transport, None)
            .execute(&Build::new("7"), &target)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildStepError::Http { status: 500, .. }));
        assert_eq!(target.entries().len(), 1);
        assert_eq!(target.entries()[0].text, "HTTP 500 \noops");
    }

    #[tokio::test]
    async fn test_execute_transport_error_fails_build() {
        let transport = FakeTransport::returning(ExecutionOutcome::transport_failure(
            TIMED_OUT,
            String::new(),
        ));
        let target = target();

        let err = step(&transport, None)
            .execute(&Build::new("7"), &target)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildStepError::Transport { code: 28, .. }));
        assert_eq!(
            target.entries()[0].text,
            "Operation timed out (transport error 28)"
        );
    }

    #[tokio::test]
    async fn test_execute_unknown_credential_sends_nothing() {
        let transport =
            FakeTransport::returning(ExecutionOutcome::response(200, String::new(), false));
        let target = target();

        let err = step(&transport, Some("missing"))
            .execute(&Build::new("7"), &target)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BuildStepError::CredentialResolution(CredentialError::NotFound(_))
        ));
        assert!(transport.sent().is_empty());
        let entries = target.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.contains("missing"));
    }

    #[tokio::test]
    async fn test_capabilities() {
        let transport =
            FakeTransport::returning(ExecutionOutcome::response(200, String::new(), false));
        let step = step(&transport, None);
        assert!(step.supports_wait_for_message());
        assert!(step.should_wait_for_message(&target()));
        assert_eq!(step.config().credential(), None::<&CredentialRef>);
        assert_eq!(GoCdBuildStep::info().name, "Build with GoCD");
        assert_eq!(GoCdBuildStep::field_specifications().len(), 4);
    }
}
