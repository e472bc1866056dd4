use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, dispatch};
use crate::application::errors::Translated;
use crate::application::extract::QueryParams;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use core_lib::validation::not_blank;
use core_lib::{CoreError, DocumentStore, FieldErrors, Validate};
use http::{HeaderValue, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDocumentQuery {
    #[validate(custom(function = "plain_file_name"))]
    pub file_name: String,
}

fn plain_file_name(name: &str) -> Result<(), ValidationError> {
    not_blank(name)?;
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(ValidationError::new("file_name").with_message("must be a plain file name".into()));
    }
    Ok(())
}

impl Request for DownloadDocumentQuery {
    type Response = Vec<u8>;
    const NAME: &'static str = "DownloadDocument.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(self)
    }
}

pub struct DownloadDocumentHandler {
    documents: Option<Arc<dyn DocumentStore>>,
}

impl DownloadDocumentHandler {
    pub fn new(documents: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { documents }
    }
}

impl RequestHandler<DownloadDocumentQuery> for DownloadDocumentHandler {
    async fn handle(&self, query: DownloadDocumentQuery) -> Result<Vec<u8>, CoreError> {
        let store = self.documents.as_ref().ok_or_else(|| {
            CoreError::Configuration("Document file server is not configured.".to_string())
        })?;
        store.fetch(&query.file_name).await
    }
}

// --- Axum Route Handler ---

pub async fn download_document(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DownloadDocumentQuery>,
) -> Result<Response, Translated> {
    let disposition = format!("attachment; filename=\"{}\"", query.file_name);
    let handler = DownloadDocumentHandler::new(state.documents.clone());
    let bytes = dispatch(&handler, query)
        .await
        .map_err(|failure| state.translator.translate(&failure))?;

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}
