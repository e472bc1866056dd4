use super::get_existing_prospect::NO_RECORDS_FOUND;
use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::QueryParams;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::{Lead, LeadSearch};
use core_lib::{CoreError, FieldErrors, LeadRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetLeadDetailsQuery(pub LeadSearch);

impl Request for GetLeadDetailsQuery {
    type Response = Lead;
    const NAME: &'static str = "GetLeadDetails.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct GetLeadDetailsHandler {
    leads: Arc<dyn LeadRepository>,
}

impl GetLeadDetailsHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }
}

impl RequestHandler<GetLeadDetailsQuery> for GetLeadDetailsHandler {
    async fn handle(&self, query: GetLeadDetailsQuery) -> Result<Lead, CoreError> {
        self.leads
            .find_lead(&query.0)
            .await?
            .ok_or_else(|| CoreError::NotFound(NO_RECORDS_FOUND.to_string()))
    }
}

// --- Axum Route Handler ---

pub async fn get_lead_details(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetLeadDetailsQuery>,
) -> Result<ApiResponse<Lead>, Translated> {
    let handler = GetLeadDetailsHandler::new(state.leads.clone());
    respond(&state.translator, &handler, query).await
}
