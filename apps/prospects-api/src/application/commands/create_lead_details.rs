use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::{JsonBody, QueryParams};
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::lead::LeadHeader;
use core_lib::{CoreError, FieldErrors, LeadRepository, Validate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Query string of the lead creation route.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadScope {
    pub company_id: i32,
    pub user_id: i32,
    pub location_id: i32,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadDetailsCommand {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub location_id: i32,
    pub header: LeadHeader,
}

impl CreateLeadDetailsCommand {
    pub fn new(scope: LeadScope, header: LeadHeader) -> Self {
        Self {
            company_id: scope.company_id,
            user_id: scope.user_id,
            location_id: scope.location_id,
            header,
        }
    }
}

impl Request for CreateLeadDetailsCommand {
    type Response = LeadHeader;
    const NAME: &'static str = "CreateLeadDetails.Command";

    // Header fields are reported unprefixed, next to the query fields.
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::of(self);
        errors.merge(FieldErrors::of(&self.header));
        errors
    }
}

pub struct CreateLeadDetailsHandler {
    leads: Arc<dyn LeadRepository>,
}

impl CreateLeadDetailsHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }
}

impl RequestHandler<CreateLeadDetailsCommand> for CreateLeadDetailsHandler {
    async fn handle(&self, command: CreateLeadDetailsCommand) -> Result<LeadHeader, CoreError> {
        let stored = self
            .leads
            .create_lead_header(
                command.company_id,
                command.user_id,
                command.location_id,
                &command.header,
            )
            .await?;
        info!(
            "Lead {} created for prospect {}",
            stored.lead_number.as_deref().unwrap_or("<unnumbered>"),
            stored.prospect_id
        );
        Ok(stored)
    }
}

// --- Axum Route Handler ---

pub async fn create_lead_details(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<LeadScope>,
    JsonBody(header): JsonBody<LeadHeader>,
) -> Result<ApiResponse<LeadHeader>, Translated> {
    let handler = CreateLeadDetailsHandler::new(state.leads.clone());
    respond(
        &state.translator,
        &handler,
        CreateLeadDetailsCommand::new(scope, header),
    )
    .await
}
