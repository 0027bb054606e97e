use gocd_defs::ExecutionOutcome;

use crate::transport::transport_reason;

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub log_text: String,
    pub is_failure: bool,
}

/// Turns an outcome into the build log text and a pass/fail verdict.
pub fn classify(outcome: &ExecutionOutcome) -> Classification {
    let log_text = if outcome.is_transport_code() {
        let mut text = format!(
            "{} (transport error {})",
            transport_reason(outcome.status_code),
            outcome.status_code
        );
        if !outcome.raw_body.is_empty() {
            text.push('\n');
            text.push_str(&outcome.raw_body);
        }
        text
    } else {
        format!("HTTP {} \n{}", outcome.status_code, outcome.raw_body)
    };

    Classification {
        log_text,
        is_failure: outcome.error_kind.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{CONNECT_FAILED, TIMED_OUT};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_success() {
        let outcome = ExecutionOutcome::response(
            200,
            "Request to schedule pipeline accepted".to_string(),
            false,
        );
        assert_eq!(
            classify(&outcome),
            Classification {
                log_text: "HTTP 200 \nRequest to schedule pipeline accepted".to_string(),
                is_failure: false,
            }
        );
    }

    #[test]
    fn test_classify_http_error() {
        let outcome = ExecutionOutcome::response(500, "Internal Server Error".to_string(), true);
        let classification = classify(&outcome);
        assert!(classification.is_failure);
        assert_eq!(classification.log_text, "HTTP 500 \nInternal Server Error");
    }

    #[test]
    fn test_classify_transport_error() {
        let outcome = ExecutionOutcome::transport_failure(TIMED_OUT, String::new());
        let classification = classify(&outcome);
        assert!(classification.is_failure);
        assert_eq!(classification.log_text, "Operation timed out (transport error 28)");
        assert!(!classification.log_text.starts_with("HTTP"));
    }

    #[test]
    fn test_classify_transport_error_appends_detail() {
        let outcome = ExecutionOutcome::transport_failure(
            CONNECT_FAILED,
            "tcp connect error: Connection refused".to_string(),
        );
        assert_eq!(
            classify(&outcome).log_text,
            "Failed to connect to host (transport error 7)\ntcp connect error: Connection refused"
        );
    }
}
