use super::get_existing_prospect::NO_RECORDS_FOUND;
use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::QueryParams;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::field_verification::{FvrDetail, HirerSearch};
use core_lib::{CoreError, FieldErrors, FieldVerificationRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetLeadHirerDetailsQuery(pub HirerSearch);

impl Request for GetLeadHirerDetailsQuery {
    type Response = FvrDetail;
    const NAME: &'static str = "GetLeadHirerDetails.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct GetLeadHirerDetailsHandler {
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

impl GetLeadHirerDetailsHandler {
    pub fn new(field_verifications: Arc<dyn FieldVerificationRepository>) -> Self {
        Self {
            field_verifications,
        }
    }
}

impl RequestHandler<GetLeadHirerDetailsQuery> for GetLeadHirerDetailsHandler {
    async fn handle(&self, query: GetLeadHirerDetailsQuery) -> Result<FvrDetail, CoreError> {
        self.field_verifications
            .hirer_details(&query.0)
            .await?
            .ok_or_else(|| CoreError::NotFound(NO_RECORDS_FOUND.to_string()))
    }
}

// --- Axum Route Handler ---

pub async fn get_lead_hirer_details(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetLeadHirerDetailsQuery>,
) -> Result<ApiResponse<FvrDetail>, Translated> {
    let handler = GetLeadHirerDetailsHandler::new(state.field_verifications.clone());
    respond(&state.translator, &handler, query).await
}
