//! Request dispatch: validate, run the handler, classify what went wrong.

use super::errors::{
    ErrorTranslator, Failure, HandlerOutcome, Translated, UnclassifiedException,
    UpstreamServiceFailure, ValidationFailure, failure::snapshot,
};
use super::response::ApiResponse;
use core_lib::{CoreError, FieldErrors};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// A query or command the API can dispatch.
pub trait Request: Serialize + Send + Sync + 'static {
    type Response: Send;
    /// Name reported as `requestType` when the handler declines the request.
    const NAME: &'static str;

    /// Violations of the request's field rules; empty when it may be dispatched.
    fn field_errors(&self) -> FieldErrors;
}

pub trait RequestHandler<R: Request>: Send + Sync {
    fn handle(&self, request: R) -> impl Future<Output = Result<R::Response, CoreError>> + Send;
}

/// Validates `request`, then hands it to `handler`.
pub async fn dispatch<R, H>(handler: &H, request: R) -> Result<R::Response, Failure>
where
    R: Request,
    H: RequestHandler<R>,
{
    let errors = request.field_errors();
    if !errors.is_empty() {
        debug!("{} rejected by validation: {}", R::NAME, errors);
        return Err(ValidationFailure::new(errors).into());
    }

    let request_snapshot = snapshot(&request);
    debug!("Dispatching {}", R::NAME);
    handler
        .handle(request)
        .await
        .map_err(|e| classify(R::NAME, request_snapshot, e))
}

/// Dispatches and renders the result: the success envelope, or the translated failure.
pub async fn respond<R, H>(
    translator: &ErrorTranslator,
    handler: &H,
    request: R,
) -> Result<ApiResponse<R::Response>, Translated>
where
    R: Request,
    H: RequestHandler<R>,
{
    dispatch(handler, request)
        .await
        .map(ApiResponse::success)
        .map_err(|failure| translator.translate(&failure))
}

/// Maps a handler error onto the failure variant that shapes the error document.
pub fn classify(request_type: &str, request: Value, error: CoreError) -> Failure {
    match error {
        CoreError::Validation(errors) => {
            HandlerOutcome::invalid_with_snapshot(request_type, request, errors).into()
        }
        CoreError::NotFound(message) | CoreError::Rejected(message) => {
            HandlerOutcome::failed_with_snapshot(request_type, request, None, message).into()
        }
        CoreError::Upstream {
            status,
            message,
            response_data,
        } => UpstreamServiceFailure {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message,
            response_data,
        }
        .into(),
        other => UnclassifiedException::new(other.kind(), other.detail()).into(),
    }
}
