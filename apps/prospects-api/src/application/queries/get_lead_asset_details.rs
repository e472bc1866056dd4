use super::get_existing_prospect::NO_RECORDS_FOUND;
use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::QueryParams;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::field_verification::{AssetSearch, FvrAsset};
use core_lib::{CoreError, FieldErrors, FieldVerificationRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetLeadAssetDetailsQuery(pub AssetSearch);

impl Request for GetLeadAssetDetailsQuery {
    type Response = FvrAsset;
    const NAME: &'static str = "GetLeadAssetDetails.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

pub struct GetLeadAssetDetailsHandler {
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

impl GetLeadAssetDetailsHandler {
    pub fn new(field_verifications: Arc<dyn FieldVerificationRepository>) -> Self {
        Self {
            field_verifications,
        }
    }
}

impl RequestHandler<GetLeadAssetDetailsQuery> for GetLeadAssetDetailsHandler {
    async fn handle(&self, query: GetLeadAssetDetailsQuery) -> Result<FvrAsset, CoreError> {
        self.field_verifications
            .asset_details(&query.0)
            .await?
            .ok_or_else(|| CoreError::NotFound(NO_RECORDS_FOUND.to_string()))
    }
}

// --- Axum Route Handler ---

pub async fn get_lead_asset_details(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetLeadAssetDetailsQuery>,
) -> Result<ApiResponse<FvrAsset>, Translated> {
    let handler = GetLeadAssetDetailsHandler::new(state.field_verifications.clone());
    respond(&state.translator, &handler, query).await
}
