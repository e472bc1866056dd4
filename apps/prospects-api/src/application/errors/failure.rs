use super::translator::VALIDATION_FAILED_MESSAGE;
use core_lib::FieldErrors;
use http::StatusCode;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// The terminal failure of one request. Exactly one variant shapes the error document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Failure {
    /// Malformed or invalid request input, with per-field detail.
    Validation(ValidationFailure),
    /// A handler ran (or was about to run) and signalled failure instead of a result.
    Handler(HandlerOutcome),
    /// A downstream REST dependency failed.
    Upstream(UpstreamServiceFailure),
    /// Anything else.
    Unclassified(UnclassifiedException),
}

impl Failure {
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Validation(_) => "ValidationFailure",
            Failure::Handler(_) => "HandlerFailure",
            Failure::Upstream(_) => "UpstreamServiceFailure",
            Failure::Unclassified(_) => "UnclassifiedException",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub errors: FieldErrors,
}

impl ValidationFailure {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    /// Single-field failure, used for extractor rejections.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self { errors }
    }
}

impl From<ValidationFailure> for Failure {
    fn from(failure: ValidationFailure) -> Self {
        Failure::Validation(failure)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeError {
    pub message: String,
    pub validation_errors: Option<FieldErrors>,
}

/// Failure signal returned by the dispatcher in place of a handler result.
///
/// `request` is a JSON snapshot taken when the outcome is built; it is kept out of the
/// serialized form so that request payloads never reach the logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerOutcome {
    pub is_request_valid: bool,
    #[serde(serialize_with = "serialize_optional_status")]
    pub status: Option<StatusCode>,
    pub error: Option<OutcomeError>,
    pub request_type: String,
    #[serde(skip)]
    pub request: Value,
}

impl HandlerOutcome {
    /// The handler ran and declined to produce a result.
    pub fn failed<R: Serialize>(
        request_type: &str,
        request: &R,
        status: Option<StatusCode>,
        message: impl Into<String>,
    ) -> Self {
        Self::failed_with_snapshot(request_type, snapshot(request), status, message)
    }

    /// As [`HandlerOutcome::failed`], for a request already captured with [`snapshot`].
    pub fn failed_with_snapshot(
        request_type: &str,
        request: Value,
        status: Option<StatusCode>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            is_request_valid: true,
            status,
            error: Some(OutcomeError {
                message: message.into(),
                validation_errors: None,
            }),
            request_type: request_type.to_string(),
            request,
        }
    }

    /// The request failed validation.
    pub fn invalid<R: Serialize>(request_type: &str, request: &R, errors: FieldErrors) -> Self {
        Self::invalid_with_snapshot(request_type, snapshot(request), errors)
    }

    pub fn invalid_with_snapshot(request_type: &str, request: Value, errors: FieldErrors) -> Self {
        Self {
            is_request_valid: false,
            status: Some(StatusCode::BAD_REQUEST),
            error: Some(OutcomeError {
                message: VALIDATION_FAILED_MESSAGE.to_string(),
                validation_errors: Some(errors),
            }),
            request_type: request_type.to_string(),
            request,
        }
    }
}

impl From<HandlerOutcome> for Failure {
    fn from(outcome: HandlerOutcome) -> Self {
        Failure::Handler(outcome)
    }
}

/// JSON image of a request. Serialization failures leave a `null` snapshot.
pub fn snapshot<R: Serialize>(request: &R) -> Value {
    serde_json::to_value(request).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamServiceFailure {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub message: String,
    pub response_data: Option<String>,
}

impl From<UpstreamServiceFailure> for Failure {
    fn from(failure: UpstreamServiceFailure) -> Self {
        Failure::Upstream(failure)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclassifiedException {
    pub message: String,
    pub error_type: String,
    #[serde(serialize_with = "serialize_optional_status")]
    pub status: Option<StatusCode>,
}

impl UnclassifiedException {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<UnclassifiedException> for Failure {
    fn from(exception: UnclassifiedException) -> Self {
        Failure::Unclassified(exception)
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

fn serialize_optional_status<S: Serializer>(
    status: &Option<StatusCode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match status {
        Some(status) => serializer.serialize_some(&status.as_u16()),
        None => serializer.serialize_none(),
    }
}
