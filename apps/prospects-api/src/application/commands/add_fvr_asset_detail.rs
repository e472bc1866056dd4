use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::{JsonBody, QueryParams};
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::field_verification::FvrAsset;
use core_lib::{CoreError, FieldErrors, FieldVerificationRepository, Validate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetScope {
    pub company_id: i32,
    pub user_id: i32,
    pub lead_id: i32,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFvrAssetDetailCommand {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lead_id: i32,
    pub asset: FvrAsset,
}

impl Request for AddFvrAssetDetailCommand {
    type Response = i32;
    const NAME: &'static str = "AddFvrAssetDetail.Command";

    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::of(self);
        errors.merge(FieldErrors::of(&self.asset));
        errors
    }
}

pub struct AddFvrAssetDetailHandler {
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

impl AddFvrAssetDetailHandler {
    pub fn new(field_verifications: Arc<dyn FieldVerificationRepository>) -> Self {
        Self {
            field_verifications,
        }
    }
}

impl RequestHandler<AddFvrAssetDetailCommand> for AddFvrAssetDetailHandler {
    async fn handle(&self, command: AddFvrAssetDetailCommand) -> Result<i32, CoreError> {
        let verification_id = self
            .field_verifications
            .add_asset_detail(
                command.company_id,
                command.user_id,
                command.lead_id,
                &command.asset,
            )
            .await?;
        info!(
            "Asset verification {} recorded for lead {}",
            verification_id, command.lead_id
        );
        Ok(verification_id)
    }
}

// --- Axum Route Handler ---

pub async fn add_fvr_asset_detail(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<AssetScope>,
    JsonBody(asset): JsonBody<FvrAsset>,
) -> Result<ApiResponse<i32>, Translated> {
    let handler = AddFvrAssetDetailHandler::new(state.field_verifications.clone());
    let command = AddFvrAssetDetailCommand {
        company_id: scope.company_id,
        user_id: scope.user_id,
        lead_id: scope.lead_id,
        asset,
    };
    respond(&state.translator, &handler, command).await
}
