use std::error::Error;

use async_trait::async_trait;
use gocd_defs::{ExecutionOutcome, RequestSpec};
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

// cURL-style codes for exchanges that never produced an HTTP response.
// All of them sit below 100 so they cannot be mistaken for a status code.
pub const UNKNOWN_FAILURE: i32 = 0;
pub const MALFORMED_URL: i32 = 3;
pub const HOST_NOT_RESOLVED: i32 = 6;
pub const CONNECT_FAILED: i32 = 7;
pub const TIMED_OUT: i32 = 28;
pub const TLS_HANDSHAKE_FAILED: i32 = 35;
pub const SEND_FAILED: i32 = 55;
pub const RECEIVE_FAILED: i32 = 56;
pub const PEER_CERTIFICATE_REJECTED: i32 = 60;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Short human-readable reason for a transport code.
pub fn transport_reason(code: i32) -> &'static str {
    match code {
        MALFORMED_URL => "URL using bad/illegal format",
        HOST_NOT_RESOLVED => "Could not resolve host",
        CONNECT_FAILED => "Failed to connect to host",
        TIMED_OUT => "Operation timed out",
        TLS_HANDSHAKE_FAILED => "SSL connect error",
        SEND_FAILED => "Failed sending data to the peer",
        RECEIVE_FAILED => "Failure when receiving data from the peer",
        PEER_CERTIFICATE_REJECTED => "SSL peer certificate or SSH remote key was not OK",
        _ => "Unknown transport error",
    }
}

/// Sends one request and reports how it went. Never retries.
///
/// Transport failures are folded into the returned outcome instead of being
/// returned as errors, so every call yields something to log.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> ExecutionOutcome;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> ExecutionOutcome {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
        }
        if let Some(credential) = &request.auth {
            builder = builder.basic_auth(credential.username(), Some(credential.password()));
        }

        let response = match builder.body(request.body.clone()).send().await {
            Ok(response) => response,
            Err(e) => return transport_failure(&e),
        };

        let status = response.status();
        debug!("{} responded with {}", request.url, status);

        match response.text().await {
            Ok(body) => ExecutionOutcome::response(status.as_u16(), body, !status.is_success()),
            Err(e) => transport_failure(&e),
        }
    }
}

fn transport_failure(err: &reqwest::Error) -> ExecutionOutcome {
    let message = error_chain(err);
    let code = transport_code(err, &message.to_lowercase());
    warn!("Request failed before a response was received: {}", message);
    ExecutionOutcome::transport_failure(code, message)
}

fn transport_code(err: &reqwest::Error, chain: &str) -> i32 {
    if err.is_builder() {
        MALFORMED_URL
    } else if err.is_timeout() {
        TIMED_OUT
    } else if err.is_connect() {
        connect_failure_code(chain)
    } else if err.is_body() || err.is_decode() {
        RECEIVE_FAILED
    } else if err.is_request() {
        SEND_FAILED
    } else {
        UNKNOWN_FAILURE
    }
}

/// reqwest reports DNS, TCP and TLS problems alike as connect errors; the
/// underlying cause is only visible in the source chain.
fn connect_failure_code(chain: &str) -> i32 {
    if chain.contains("dns error") || chain.contains("failed to lookup address") {
        HOST_NOT_RESOLVED
    } else if chain.contains("certificate") {
        PEER_CERTIFICATE_REJECTED
    } else if chain.contains("tls") || chain.contains("ssl") || chain.contains("handshake") {
        TLS_HANDSHAKE_FAILED
    } else {
        CONNECT_FAILED
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transport_codes_stay_below_http_range() {
        for code in [
            UNKNOWN_FAILURE,
            MALFORMED_URL,
            HOST_NOT_RESOLVED,
            CONNECT_FAILED,
            TIMED_OUT,
            TLS_HANDSHAKE_FAILED,
            SEND_FAILED,
            RECEIVE_FAILED,
            PEER_CERTIFICATE_REJECTED,
        ] {
            assert!(code < 100);
        }
    }

    #[test]
    fn test_transport_reason() {
        assert_eq!(transport_reason(TIMED_OUT), "Operation timed out");
        assert_eq!(transport_reason(CONNECT_FAILED), "Failed to connect to host");
        assert_eq!(transport_reason(42), "Unknown transport error");
    }

    #[test]
    fn test_connect_failure_code_from_chain() {
        assert_eq!(
            connect_failure_code("error sending request: client error (connect): dns error: failed to lookup address information"),
            HOST_NOT_RESOLVED
        );
        assert_eq!(
            connect_failure_code("client error (connect): invalid peer certificate: unknownissuer"),
            PEER_CERTIFICATE_REJECTED
        );
        assert_eq!(
            connect_failure_code("client error (connect): tcp connect error: connection refused (os error 111)"),
            CONNECT_FAILED
        );
    }

    #[tokio::test]
    async fn test_malformed_url_is_transport_failure() {
        let transport = ReqwestTransport::new();
        let outcome = transport
            .send(&RequestSpec::new("not a url", "", None))
            .await;
        assert_eq!(outcome.status_code, MALFORMED_URL);
        assert_eq!(outcome.error_kind, Some(gocd_defs::ErrorKind::Transport));
    }
}
