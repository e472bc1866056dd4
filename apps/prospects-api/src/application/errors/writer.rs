use super::document::ErrorDocument;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;

/// A translated failure ready to be written. The document's `statusCode` always equals
/// the status written to the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Translated {
    status: StatusCode,
    document: ErrorDocument,
}

impl Translated {
    pub fn new(status: StatusCode, mut document: ErrorDocument) -> Self {
        document.status_code = status.as_u16();
        Self { status, document }
    }

    /// A document with only a status and message, used by middleware that rejects a
    /// request before any handler runs.
    pub fn bare(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, ErrorDocument::new(status, message))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn document(&self) -> &ErrorDocument {
        &self.document
    }

    pub fn into_parts(self) -> (StatusCode, ErrorDocument) {
        (self.status, self.document)
    }
}

impl IntoResponse for Translated {
    fn into_response(self) -> Response {
        (self.status, Json(self.document)).into_response()
    }
}
