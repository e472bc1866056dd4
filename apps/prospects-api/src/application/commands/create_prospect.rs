use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::JsonBody;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::prospect::NewProspect;
use core_lib::{CoreError, FieldErrors, ProspectRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const PROSPECT_ADDED: &str = "Prospect added successfully.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateNewProspectCommand(pub NewProspect);

impl Request for CreateNewProspectCommand {
    type Response = String;
    const NAME: &'static str = "CreateNewProspect.Command";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct CreateProspectHandler {
    prospects: Arc<dyn ProspectRepository>,
}

impl CreateProspectHandler {
    pub fn new(prospects: Arc<dyn ProspectRepository>) -> Self {
        Self { prospects }
    }
}

impl RequestHandler<CreateNewProspectCommand> for CreateProspectHandler {
    async fn handle(&self, command: CreateNewProspectCommand) -> Result<String, CoreError> {
        let prospect_id = self.prospects.create_prospect(&command.0).await?;
        info!(
            "Prospect {} created for company {} by user {}",
            prospect_id, command.0.company_id, command.0.user_id
        );
        Ok(PROSPECT_ADDED.to_string())
    }
}

// --- Axum Route Handler ---

pub async fn create_new_prospect(
    State(state): State<AppState>,
    JsonBody(command): JsonBody<CreateNewProspectCommand>,
) -> Result<ApiResponse<String>, Translated> {
    let handler = CreateProspectHandler::new(state.prospects.clone());
    respond(&state.translator, &handler, command).await
}
