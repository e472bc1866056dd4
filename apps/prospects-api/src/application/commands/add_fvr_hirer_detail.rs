use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::{JsonBody, QueryParams};
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::field_verification::FvrDetail;
use core_lib::{CoreError, FieldErrors, FieldVerificationRepository, Validate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HirerScope {
    pub company_id: i32,
    pub lead_id: i32,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFvrHirerDetailCommand {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lead_id: i32,
    pub detail: FvrDetail,
}

impl Request for AddFvrHirerDetailCommand {
    type Response = i32;
    const NAME: &'static str = "AddFvrHirerDetail.Command";

    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::of(self);
        errors.merge(FieldErrors::of(&self.detail));
        errors
    }
}

pub struct AddFvrHirerDetailHandler {
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

impl AddFvrHirerDetailHandler {
    pub fn new(field_verifications: Arc<dyn FieldVerificationRepository>) -> Self {
        Self {
            field_verifications,
        }
    }
}

impl RequestHandler<AddFvrHirerDetailCommand> for AddFvrHirerDetailHandler {
    async fn handle(&self, command: AddFvrHirerDetailCommand) -> Result<i32, CoreError> {
        let verification_id = self
            .field_verifications
            .add_hirer_detail(command.company_id, command.lead_id, &command.detail)
            .await?;
        info!(
            "Field verification {} recorded for lead {}",
            verification_id, command.lead_id
        );
        Ok(verification_id)
    }
}

// --- Axum Route Handler ---

pub async fn add_fvr_hirer_detail(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<HirerScope>,
    JsonBody(detail): JsonBody<FvrDetail>,
) -> Result<ApiResponse<i32>, Translated> {
    let handler = AddFvrHirerDetailHandler::new(state.field_verifications.clone());
    let command = AddFvrHirerDetailCommand {
        company_id: scope.company_id,
        lead_id: scope.lead_id,
        detail,
    };
    respond(&state.translator, &handler, command).await
}
