use core_lib::FieldErrors;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical JSON error envelope returned to API callers.
///
/// Clients parse `validationErrors` to render field errors and read `additionalData` and
/// `innerError` for diagnostics, so field names here are part of the public API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDocument {
    pub status_code: u16,
    pub message: String,
    #[serde(default)]
    pub validation_errors: FieldErrors,
    #[serde(default)]
    pub additional_data: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<Box<ErrorDocument>>,
    /// Kind of the underlying failure. Only set on inner documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorDocument {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            validation_errors: FieldErrors::new(),
            additional_data: BTreeMap::new(),
            inner_error: None,
            error_type: None,
        }
    }

    pub fn with_validation_errors(mut self, errors: FieldErrors) -> Self {
        self.validation_errors = errors;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_data.insert(key.into(), value.into());
        self
    }

    pub fn with_inner(mut self, inner: ErrorDocument) -> Self {
        self.inner_error = Some(Box::new(inner));
        self
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_maps_are_serialized_and_absent_options_are_not() {
        let doc = ErrorDocument::new(StatusCode::BAD_REQUEST, "No records found");
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "statusCode": 400,
                "message": "No records found",
                "validationErrors": {},
                "additionalData": {}
            })
        );
    }

    #[test]
    fn nested_inner_error_uses_camel_case() {
        let doc = ErrorDocument::new(StatusCode::BAD_GATEWAY, "outer").with_inner(
            ErrorDocument::new(StatusCode::BAD_GATEWAY, "inner")
                .with_error_type("UpstreamServiceFailure")
                .with_data("responseData", "raw"),
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["innerError"]["errorType"], "UpstreamServiceFailure");
        assert_eq!(value["innerError"]["additionalData"]["responseData"], "raw");
        assert!(value.get("errorType").is_none());
    }
}
