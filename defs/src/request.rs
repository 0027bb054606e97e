use std::time::Duration;

use crate::Credential;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const CONFIRM_HEADER: (&str, &str) = ("Confirm", "true");

/// A single POST to the GoCD schedule endpoint. Built fresh for every
/// execution and consumed by the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub auth: Option<Credential>,
}

impl RequestSpec {
    pub const METHOD: &'static str = "POST";

    pub fn new(url: &str, body: &str, auth: Option<Credential>) -> Self {
        RequestSpec {
            url: url.to_string(),
            body: body.to_string(),
            headers: vec![(CONFIRM_HEADER.0.to_string(), CONFIRM_HEADER.1.to_string())],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            auth,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The exchange never completed (DNS, connect, TLS, timeout).
    Transport,
    /// The server answered with a status the transport treats as an error.
    Http,
}

/// Result of one request. `status_code` holds the HTTP status, or a
/// transport code below 100 when no response was received.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionOutcome {
    pub status_code: i32,
    pub raw_body: String,
    pub error_kind: Option<ErrorKind>,
}

impl ExecutionOutcome {
    pub fn response(status_code: u16, raw_body: String, is_error: bool) -> Self {
        ExecutionOutcome {
            status_code: i32::from(status_code),
            raw_body,
            error_kind: is_error.then_some(ErrorKind::Http),
        }
    }

    pub fn transport_failure(code: i32, message: String) -> Self {
        ExecutionOutcome {
            status_code: code,
            raw_body: message,
            error_kind: Some(ErrorKind::Transport),
        }
    }

    pub fn is_transport_code(&self) -> bool {
        self.status_code < 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_spec_defaults() {
        let spec = RequestSpec::new("https://ci.example.com/go/api/pipelines/p/schedule", "", None);
        assert_eq!(spec.headers, vec![("Confirm".to_string(), "true".to_string())]);
        assert_eq!(spec.timeout, Duration::from_secs(60));
        assert_eq!(spec.auth, None);
        assert_eq!(RequestSpec::METHOD, "POST");
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = ExecutionOutcome::response(202, "queued".to_string(), false);
        assert_eq!(ok.error_kind, None);
        assert!(!ok.is_transport_code());

        let failed = ExecutionOutcome::response(500, "boom".to_string(), true);
        assert_eq!(failed.error_kind, Some(ErrorKind::Http));

        let timeout = ExecutionOutcome::transport_failure(28, "timed out".to_string());
        assert_eq!(timeout.error_kind, Some(ErrorKind::Transport));
        assert!(timeout.is_transport_code());
    }
}
