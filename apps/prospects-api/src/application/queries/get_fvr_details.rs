//! Verification reports of the people around a lead other than the hirer.

use super::get_existing_prospect::NO_RECORDS_FOUND;
use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::QueryParams;
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::field_verification::{FvrDetail, PersonType};
use core_lib::{CoreError, FieldErrors, FieldVerificationRepository, Validate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetFvrNeighbourHoodDetailsQuery {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lead_id: i32,
    /// Picks one report when the lead has several neighbour checks.
    #[serde(default)]
    pub field_verification_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetFvrGuarantorDetailsQuery {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lead_id: i32,
    /// 1 hirer, 2 guarantor, 3 neighbour.
    #[validate(range(min = 1, max = 3, message = "must be 1, 2 or 3"))]
    pub person_type: i32,
}

impl Request for GetFvrNeighbourHoodDetailsQuery {
    type Response = FvrDetail;
    const NAME: &'static str = "GetFvrNeighbourHoodDetails.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(self)
    }
}

impl Request for GetFvrGuarantorDetailsQuery {
    type Response = FvrDetail;
    const NAME: &'static str = "GetFvrGuarantorDetails.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(self)
    }
}

pub struct GetFvrDetailsHandler {
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

impl GetFvrDetailsHandler {
    pub fn new(field_verifications: Arc<dyn FieldVerificationRepository>) -> Self {
        Self {
            field_verifications,
        }
    }

    async fn detail(
        &self,
        company_id: i32,
        lead_id: i32,
        person_type: PersonType,
        field_verification_id: Option<i32>,
    ) -> Result<FvrDetail, CoreError> {
        self.field_verifications
            .verification_detail(company_id, lead_id, person_type, field_verification_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(NO_RECORDS_FOUND.to_string()))
    }
}

impl RequestHandler<GetFvrNeighbourHoodDetailsQuery> for GetFvrDetailsHandler {
    async fn handle(&self, query: GetFvrNeighbourHoodDetailsQuery) -> Result<FvrDetail, CoreError> {
        self.detail(
            query.company_id,
            query.lead_id,
            PersonType::Neighbour,
            query.field_verification_id,
        )
        .await
    }
}

impl RequestHandler<GetFvrGuarantorDetailsQuery> for GetFvrDetailsHandler {
    async fn handle(&self, query: GetFvrGuarantorDetailsQuery) -> Result<FvrDetail, CoreError> {
        let person_type = PersonType::from_id(query.person_type).ok_or_else(|| {
            CoreError::Validation(
                [("personType", "must be 1, 2 or 3")].into_iter().collect(),
            )
        })?;
        self.detail(query.company_id, query.lead_id, person_type, None)
            .await
    }
}

// --- Axum Route Handlers ---

pub async fn get_fvr_neighbour_hood_details(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetFvrNeighbourHoodDetailsQuery>,
) -> Result<ApiResponse<FvrDetail>, Translated> {
    let handler = GetFvrDetailsHandler::new(state.field_verifications.clone());
    respond(&state.translator, &handler, query).await
}

pub async fn get_fvr_guarantor_details(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetFvrGuarantorDetailsQuery>,
) -> Result<ApiResponse<FvrDetail>, Translated> {
    let handler = GetFvrDetailsHandler::new(state.field_verifications.clone());
    respond(&state.translator, &handler, query).await
}
