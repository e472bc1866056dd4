use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::JsonBody;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::{Lead, NewLead};
use core_lib::{CoreError, FieldErrors, LeadRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Lead header and guarantors captured in one request; answers the new lead id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateLeadGenerationHeaderCommand(pub NewLead);

impl Request for CreateLeadGenerationHeaderCommand {
    type Response = i32;
    const NAME: &'static str = "CreateLeadGenerationHeader.Command";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct CreateLeadGenerationHeaderHandler {
    leads: Arc<dyn LeadRepository>,
}

impl CreateLeadGenerationHeaderHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }
}

impl RequestHandler<CreateLeadGenerationHeaderCommand> for CreateLeadGenerationHeaderHandler {
    async fn handle(&self, command: CreateLeadGenerationHeaderCommand) -> Result<i32, CoreError> {
        let new_lead = command.0;
        let header = self
            .leads
            .create_lead_header(
                new_lead.company_id,
                new_lead.user_id,
                new_lead.location_id,
                &new_lead.header,
            )
            .await?;
        let lead_id = header
            .lead_id
            .ok_or_else(|| CoreError::Internal("Stored lead has no id.".to_string()))?;

        if !new_lead.guarantors.is_empty() {
            let lead = Lead {
                header: Some(header),
                guarantors: new_lead.guarantors,
            };
            if !self.leads.add_guarantors(&lead).await? {
                return Err(CoreError::NotFound(format!("Lead {lead_id} was not found.")));
            }
        }
        info!("Lead {} generated for company {}", lead_id, new_lead.company_id);
        Ok(lead_id)
    }
}

// --- Axum Route Handler ---

pub async fn create_lead_generation_header(
    State(state): State<AppState>,
    JsonBody(command): JsonBody<CreateLeadGenerationHeaderCommand>,
) -> Result<ApiResponse<i32>, Translated> {
    let handler = CreateLeadGenerationHeaderHandler::new(state.leads.clone());
    respond(&state.translator, &handler, command).await
}
