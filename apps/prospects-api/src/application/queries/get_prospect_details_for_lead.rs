use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::JsonBody;
use crate::application::queries::get_existing_prospect::NO_RECORDS_FOUND;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::LeadProspectDetail;
use core_lib::domain::prospect::ProspectSearch;
use core_lib::{CoreError, FieldErrors, LeadRepository, ProspectRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prospect lookup from the lead screen; also returns the leads already raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetProspectDetailsForLeadQuery(pub ProspectSearch);

impl Request for GetProspectDetailsForLeadQuery {
    type Response = LeadProspectDetail;
    const NAME: &'static str = "GetProspectDetailsForLead.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct GetProspectDetailsForLeadHandler {
    prospects: Arc<dyn ProspectRepository>,
    leads: Arc<dyn LeadRepository>,
}

impl GetProspectDetailsForLeadHandler {
    pub fn new(prospects: Arc<dyn ProspectRepository>, leads: Arc<dyn LeadRepository>) -> Self {
        Self { prospects, leads }
    }
}

impl RequestHandler<GetProspectDetailsForLeadQuery> for GetProspectDetailsForLeadHandler {
    async fn handle(
        &self,
        query: GetProspectDetailsForLeadQuery,
    ) -> Result<LeadProspectDetail, CoreError> {
        let prospect = self
            .prospects
            .find_prospect(&query.0)
            .await?
            .ok_or_else(|| CoreError::NotFound(NO_RECORDS_FOUND.to_string()))?;
        let leads = self
            .leads
            .leads_for_prospect(prospect.company_id, prospect.prospect_id)
            .await?;
        Ok(LeadProspectDetail { prospect, leads })
    }
}

// --- Axum Route Handler ---

pub async fn get_prospect_details_for_lead(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<GetProspectDetailsForLeadQuery>,
) -> Result<ApiResponse<LeadProspectDetail>, Translated> {
    let handler = GetProspectDetailsForLeadHandler::new(state.prospects.clone(), state.leads.clone());
    respond(&state.translator, &handler, query).await
}
