//! Prospect report export; the output type picks the renderer.

use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, dispatch};
use crate::application::errors::Translated;
use crate::application::extract::QueryParams;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use core_lib::adapters::{excel_report::ExcelReport, pdf_report::PdfReport};
use core_lib::domain::prospect::ProspectReportFilter;
use core_lib::domain::report::{OutputType, known_output_type};
use core_lib::{CoreError, FieldErrors, ProspectRepository, ReportRenderer, Validate};
use http::{HeaderValue, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProspectReportQuery {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    /// `excel` or `pdf`.
    #[validate(custom(function = "known_output_type"))]
    pub output_type: String,
    #[serde(default)]
    pub lob_id: Option<i32>,
    #[serde(default)]
    pub location_id: Option<i32>,
}

impl Request for DownloadProspectReportQuery {
    type Response = ReportFile;
    const NAME: &'static str = "DownloadProspectReport.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Renderer registered for an output type.
pub fn renderer_for(output_type: OutputType) -> &'static dyn ReportRenderer {
    match output_type {
        OutputType::Excel => &ExcelReport,
        OutputType::Pdf => &PdfReport,
    }
}

pub struct DownloadProspectReportHandler {
    prospects: Arc<dyn ProspectRepository>,
}

impl DownloadProspectReportHandler {
    pub fn new(prospects: Arc<dyn ProspectRepository>) -> Self {
        Self { prospects }
    }
}

impl RequestHandler<DownloadProspectReportQuery> for DownloadProspectReportHandler {
    async fn handle(&self, query: DownloadProspectReportQuery) -> Result<ReportFile, CoreError> {
        let output_type = OutputType::parse(&query.output_type).ok_or_else(|| {
            CoreError::Validation(
                [("outputType", "must be either excel or pdf")]
                    .into_iter()
                    .collect(),
            )
        })?;
        let filter = ProspectReportFilter {
            company_id: query.company_id,
            lob_id: query.lob_id,
            location_id: query.location_id,
        };
        let prospects = self.prospects.prospects_for_report(&filter).await?;

        let renderer = renderer_for(output_type);
        let bytes = renderer.render("Prospect Report", &prospects)?;
        info!(
            "Prospect report for company {} rendered as {} ({} rows)",
            query.company_id,
            renderer.file_extension(),
            prospects.len()
        );
        Ok(ReportFile {
            content_type: renderer.content_type(),
            file_name: format!("ProspectReport.{}", renderer.file_extension()),
            bytes,
        })
    }
}

// --- Axum Route Handler ---

pub async fn download_prospect_report(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DownloadProspectReportQuery>,
) -> Result<Response, Translated> {
    let handler = DownloadProspectReportHandler::new(state.prospects.clone());
    let report = dispatch(&handler, query)
        .await
        .map_err(|failure| state.translator.translate(&failure))?;

    let mut response = (StatusCode::OK, report.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(report.content_type),
    );
    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}
