use super::document::ErrorDocument;
use super::failure::{
    Failure, HandlerOutcome, UnclassifiedException, UpstreamServiceFailure,
};
use super::writer::Translated;
use core_lib::FieldErrors;
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const VALIDATION_FAILED_MESSAGE: &str = "Request validation failed.";
pub const UPSTREAM_FAILED_MESSAGE: &str = "An upstream service request failed.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Logging capability used by the translator. Implementations must not panic.
pub trait FailureLog: Send + Sync {
    /// One line per translated failure.
    fn observed(&self, kind: &str);
    /// Serialized failure detail.
    fn detail(&self, kind: &str, detail: &str);
    /// Upstream and unclassified failures are faults rather than caller mistakes.
    fn fault(&self, kind: &str, message: &str);
}

/// Default [`FailureLog`] writing through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureLog;

impl FailureLog for TracingFailureLog {
    fn observed(&self, kind: &str) {
        info!("{}: failure observed, returning error response", kind);
    }

    fn detail(&self, kind: &str, detail: &str) {
        debug!("{}: failure detail: {}", kind, detail);
    }

    fn fault(&self, kind: &str, message: &str) {
        warn!("{}: {}", kind, message);
    }
}

/// Serialization capability used by the translator. Must be infallible.
pub trait SnapshotSerializer: Send + Sync {
    /// Renders a request snapshot as the string stored under `additionalData.request`.
    fn request(&self, snapshot: &Value) -> String;
    /// Renders a failure for the debug log.
    fn failure(&self, failure: &Failure) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotSerializer;

impl SnapshotSerializer for JsonSnapshotSerializer {
    fn request(&self, snapshot: &Value) -> String {
        snapshot.to_string()
    }

    fn failure(&self, failure: &Failure) -> String {
        serde_json::to_string(failure)
            .unwrap_or_else(|e| format!("<failure not serializable: {e}>"))
    }
}

/// Maps a [`Failure`] to exactly one [`ErrorDocument`] and the status code to write.
///
/// Pure apart from logging; safe to share between concurrent requests.
pub struct ErrorTranslator {
    log: Arc<dyn FailureLog>,
    serializer: Arc<dyn SnapshotSerializer>,
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self::new(Arc::new(TracingFailureLog), Arc::new(JsonSnapshotSerializer))
    }
}

impl std::fmt::Debug for ErrorTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorTranslator").finish_non_exhaustive()
    }
}

impl ErrorTranslator {
    pub fn new(log: Arc<dyn FailureLog>, serializer: Arc<dyn SnapshotSerializer>) -> Self {
        Self { log, serializer }
    }

    pub fn translate(&self, failure: &Failure) -> Translated {
        let kind = failure.kind();
        self.log.observed(kind);
        self.log.detail(kind, &self.serializer.failure(failure));

        let (status, document) = match failure {
            Failure::Validation(validation) => validation_document(validation.errors.clone()),
            Failure::Handler(outcome) => self.handler_document(outcome),
            Failure::Upstream(upstream) => {
                self.log.fault(kind, &upstream.message);
                upstream_document(upstream)
            }
            Failure::Unclassified(exception) => {
                self.log.fault(kind, &exception.message);
                unclassified_document(exception)
            }
        };
        Translated::new(status, document)
    }

    fn handler_document(&self, outcome: &HandlerOutcome) -> (StatusCode, ErrorDocument) {
        // An invalid request always renders its field errors, whatever message came with it.
        if !outcome.is_request_valid {
            return match outcome
                .error
                .as_ref()
                .and_then(|e| e.validation_errors.clone())
            {
                Some(errors) => validation_document(errors),
                None => self.malformed(outcome, "invalid request reported without validation errors"),
            };
        }

        let Some(error) = &outcome.error else {
            return self.malformed(outcome, "failure reported without an error payload");
        };

        let status = outcome
            .status
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_REQUEST);
        let document = ErrorDocument::new(status, error.message.clone())
            .with_data("requestType", outcome.request_type.clone())
            .with_data("request", self.serializer.request(&outcome.request));
        (status, document)
    }

    fn malformed(&self, outcome: &HandlerOutcome, reason: &str) -> (StatusCode, ErrorDocument) {
        let message = format!("Handler for {} returned a malformed outcome: {reason}", outcome.request_type);
        self.log.fault("HandlerFailure", &message);
        unclassified_document(&UnclassifiedException::new(
            outcome.request_type.clone(),
            message,
        ))
    }
}

fn validation_document(errors: FieldErrors) -> (StatusCode, ErrorDocument) {
    let status = StatusCode::BAD_REQUEST;
    (
        status,
        ErrorDocument::new(status, VALIDATION_FAILED_MESSAGE).with_validation_errors(errors),
    )
}

fn upstream_document(upstream: &UpstreamServiceFailure) -> (StatusCode, ErrorDocument) {
    let status = upstream.status;
    let mut inner = ErrorDocument::new(status, upstream.message.clone())
        .with_error_type("UpstreamServiceFailure");
    if let Some(body) = &upstream.response_data {
        inner = inner.with_data("responseData", body.clone());
    }
    (
        status,
        ErrorDocument::new(status, UPSTREAM_FAILED_MESSAGE).with_inner(inner),
    )
}

fn unclassified_document(exception: &UnclassifiedException) -> (StatusCode, ErrorDocument) {
    let status = exception.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let inner = ErrorDocument::new(status, exception.message.clone())
        .with_error_type(exception.error_type.clone());
    (
        status,
        ErrorDocument::new(status, UNEXPECTED_ERROR_MESSAGE).with_inner(inner),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::failure::{OutcomeError, ValidationFailure};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        lines: Mutex<Vec<(String, String)>>,
    }

    impl RecordingLog {
        fn levels(&self) -> Vec<String> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .map(|(level, _)| level.clone())
                .collect()
        }
    }

    impl FailureLog for RecordingLog {
        fn observed(&self, kind: &str) {
            self.lines.lock().unwrap().push(("info".into(), kind.into()));
        }
        fn detail(&self, _kind: &str, detail: &str) {
            self.lines.lock().unwrap().push(("debug".into(), detail.into()));
        }
        fn fault(&self, _kind: &str, message: &str) {
            self.lines.lock().unwrap().push(("warn".into(), message.into()));
        }
    }

    fn translator() -> ErrorTranslator {
        ErrorTranslator::default()
    }

    fn field_errors(field: &str, message: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        errors
    }

    fn hirer_query() -> Value {
        json!({"userId": 7, "companyId": 1, "mode": "view", "leadNumber": "LD001000009"})
    }

    #[test]
    fn invalid_pan_renders_validation_document() {
        let failure = Failure::Validation(ValidationFailure::new(field_errors(
            "panNumber",
            "invalid format",
        )));
        let translated = translator().translate(&failure);

        assert_eq!(translated.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(translated.document()).unwrap(),
            json!({
                "statusCode": 400,
                "message": "Request validation failed.",
                "validationErrors": {"panNumber": ["invalid format"]},
                "additionalData": {}
            })
        );
    }

    #[test]
    fn missing_hirer_details_render_handler_document() {
        let outcome = HandlerOutcome::failed(
            "GetLeadHirerDetails.Query",
            &hirer_query(),
            Some(StatusCode::BAD_REQUEST),
            "No records found",
        );
        let translated = translator().translate(&Failure::Handler(outcome));
        let doc = translated.document();

        assert_eq!(translated.status(), StatusCode::BAD_REQUEST);
        assert_eq!(doc.status_code, 400);
        assert_eq!(doc.message, "No records found");
        assert!(doc.validation_errors.is_empty());
        assert!(doc.inner_error.is_none());
        assert_eq!(doc.additional_data["requestType"], "GetLeadHirerDetails.Query");
        let request: Value =
            serde_json::from_str(doc.additional_data["request"].as_str().unwrap()).unwrap();
        assert_eq!(request, hirer_query());
    }

    #[test]
    fn connection_timeout_renders_unclassified_document() {
        let failure = Failure::Unclassified(UnclassifiedException::new(
            "Infrastructure",
            "connection timeout",
        ));
        let translated = translator().translate(&failure);
        let doc = translated.document();

        assert_eq!(translated.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(doc.status_code, 500);
        let inner = doc.inner_error.as_ref().unwrap();
        assert_eq!(inner.message, "connection timeout");
        assert_eq!(inner.error_type.as_deref(), Some("Infrastructure"));
        assert!(doc.validation_errors.is_empty());
    }

    #[test]
    fn unclassified_keeps_declared_status_and_has_no_trace_field() {
        let failure = Failure::Unclassified(
            UnclassifiedException::new("Configuration", "file server is not configured")
                .with_status(StatusCode::SERVICE_UNAVAILABLE),
        );
        let translated = translator().translate(&failure);
        assert_eq!(translated.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = serde_json::to_string(translated.document()).unwrap();
        assert!(!json.to_lowercase().contains("trace"));
        assert!(json.contains("\"statusCode\":503"));
    }

    #[test]
    fn handler_status_defaults_to_bad_request() {
        let outcome = HandlerOutcome::failed("CreateNewProspect.Command", &json!({}), None, "Rejected");
        let translated = translator().translate(&Failure::Handler(outcome));
        assert_eq!(translated.status(), StatusCode::BAD_REQUEST);
        assert_eq!(translated.document().status_code, 400);
    }

    #[test]
    fn handler_status_is_passed_through() {
        let outcome = HandlerOutcome::failed(
            "GetLeadDetails.Query",
            &json!({}),
            Some(StatusCode::NOT_FOUND),
            "No records found",
        );
        let translated = translator().translate(&Failure::Handler(outcome));
        assert_eq!(translated.status(), StatusCode::NOT_FOUND);
        assert_eq!(translated.document().status_code, 404);
    }

    #[test]
    fn invalid_outcome_renders_field_errors_and_ignores_message() {
        let outcome = HandlerOutcome {
            is_request_valid: false,
            status: Some(StatusCode::CONFLICT),
            error: Some(OutcomeError {
                message: "Something generic went wrong".into(),
                validation_errors: Some(field_errors("mobileNumber", "must be a 10 digit mobile number")),
            }),
            request_type: "CreateNewProspect.Command".into(),
            request: json!({"mobileNumber": "12"}),
        };
        let translated = translator().translate(&Failure::Handler(outcome));
        let doc = translated.document();

        assert_eq!(translated.status(), StatusCode::BAD_REQUEST);
        assert_eq!(doc.message, VALIDATION_FAILED_MESSAGE);
        assert_eq!(
            doc.validation_errors.get("mobileNumber"),
            Some(&["must be a 10 digit mobile number".to_string()][..])
        );
        assert!(doc.additional_data.is_empty());
        assert!(doc.inner_error.is_none());
    }

    #[test]
    fn outcome_without_error_payload_degrades_to_unclassified() {
        let outcome = HandlerOutcome {
            is_request_valid: true,
            status: None,
            error: None,
            request_type: "GetStates.Query".into(),
            request: Value::Null,
        };
        let translated = translator().translate(&Failure::Handler(outcome));
        let doc = translated.document();

        assert_eq!(translated.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(doc.message, UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(
            doc.inner_error.as_ref().unwrap().error_type.as_deref(),
            Some("GetStates.Query")
        );
        assert!(doc.additional_data.is_empty());
    }

    #[test]
    fn invalid_outcome_without_field_map_degrades_to_unclassified() {
        let outcome = HandlerOutcome {
            is_request_valid: false,
            status: None,
            error: Some(OutcomeError {
                message: "bad".into(),
                validation_errors: None,
            }),
            request_type: "GetLobList.Query".into(),
            request: Value::Null,
        };
        let translated = translator().translate(&Failure::Handler(outcome));
        assert_eq!(translated.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(translated.document().validation_errors.is_empty());
    }

    #[test]
    fn upstream_failure_passes_status_and_body_through() {
        let failure = Failure::Upstream(UpstreamServiceFailure {
            status: StatusCode::NOT_FOUND,
            message: "File server returned 404 Not Found for kyc.pdf".into(),
            response_data: Some(r#"{"error":"missing"}"#.into()),
        });
        let translated = translator().translate(&failure);
        let doc = translated.document();

        assert_eq!(translated.status(), StatusCode::NOT_FOUND);
        assert_eq!(doc.message, UPSTREAM_FAILED_MESSAGE);
        assert!(doc.validation_errors.is_empty());
        let inner = doc.inner_error.as_ref().unwrap();
        assert_eq!(inner.status_code, 404);
        assert_eq!(inner.additional_data["responseData"], r#"{"error":"missing"}"#);
    }

    #[test]
    fn upstream_failure_without_body_has_no_response_data() {
        let failure = Failure::Upstream(UpstreamServiceFailure {
            status: StatusCode::BAD_GATEWAY,
            message: "connection refused".into(),
            response_data: None,
        });
        let translated = translator().translate(&failure);
        let inner = translated.document().inner_error.as_ref().unwrap();
        assert!(inner.additional_data.is_empty());
    }

    #[test]
    fn translation_is_idempotent() {
        let outcome = HandlerOutcome::failed(
            "GetLeadHirerDetails.Query",
            &hirer_query(),
            None,
            "No records found",
        );
        let failure = Failure::Handler(outcome);
        let t = translator();
        let first = serde_json::to_vec(t.translate(&failure).document()).unwrap();
        let second = serde_json::to_vec(t.translate(&failure).document()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_path_logs_info_then_debug() {
        let log = Arc::new(RecordingLog::default());
        let translator = ErrorTranslator::new(log.clone(), Arc::new(JsonSnapshotSerializer));

        translator.translate(&Failure::Validation(ValidationFailure::single("name", "is required")));
        assert_eq!(log.levels(), vec!["info", "debug"]);

        translator.translate(&Failure::Unclassified(UnclassifiedException::new("Internal", "boom")));
        assert_eq!(
            log.levels(),
            vec!["info", "debug", "info", "debug", "warn"]
        );
    }

    #[test]
    fn request_snapshot_is_not_written_to_the_debug_log() {
        let log = Arc::new(RecordingLog::default());
        let translator = ErrorTranslator::new(log.clone(), Arc::new(JsonSnapshotSerializer));
        let outcome = HandlerOutcome::failed(
            "GetExistingProspectCustomerDetails.Query",
            &json!({"panNumber": "ABCDE1234F"}),
            None,
            "No records found",
        );
        translator.translate(&Failure::Handler(outcome));

        let lines = log.lines.lock().unwrap();
        assert!(lines.iter().all(|(_, line)| !line.contains("ABCDE1234F")));
    }
}
