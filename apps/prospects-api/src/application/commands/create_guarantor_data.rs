use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::JsonBody;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::Lead;
use core_lib::{CoreError, FieldErrors, LeadRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateGuarantorDataCommand(pub Lead);

impl Request for CreateGuarantorDataCommand {
    type Response = String;
    const NAME: &'static str = "CreateGuarantorData.Command";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct CreateGuarantorDataHandler {
    leads: Arc<dyn LeadRepository>,
}

impl CreateGuarantorDataHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }
}

impl RequestHandler<CreateGuarantorDataCommand> for CreateGuarantorDataHandler {
    async fn handle(&self, command: CreateGuarantorDataCommand) -> Result<String, CoreError> {
        // Validation guarantees a lead id.
        let lead_id = command.0.lead_id().unwrap_or_default();
        if self.leads.add_guarantors(&command.0).await? {
            Ok(format!("Guarantor details saved for lead {lead_id}."))
        } else {
            Err(CoreError::Rejected(format!(
                "Unable to save guarantor details for lead {lead_id}."
            )))
        }
    }
}

// --- Axum Route Handler ---

pub async fn create_guarantor_data(
    State(state): State<AppState>,
    JsonBody(command): JsonBody<CreateGuarantorDataCommand>,
) -> Result<ApiResponse<String>, Translated> {
    let handler = CreateGuarantorDataHandler::new(state.leads.clone());
    respond(&state.translator, &handler, command).await
}
