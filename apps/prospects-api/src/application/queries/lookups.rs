//! Reference data lookups used to populate the prospect, lead and verification forms.

use crate::AppState;
use crate::application::dispatch::{Request, RequestHandler, respond};
use crate::application::errors::Translated;
use crate::application::extract::{JsonBody, PathParams, QueryParams};
use crate::application::response::ApiResponse;
use axum::extract::State;
use core_lib::domain::field_verification::FvrLookupKind;
use core_lib::domain::lookup::{
    DocumentCategory, FieldExecutive, LeadStatus, LineOfBusiness, Location, LocationFilter, Lookup,
};
use core_lib::{
    CoreError, FieldErrors, FieldVerificationRepository, LeadRepository, ProspectRepository,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GetProspectLookupQuery;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GetStatesQuery;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GetLeadStatusesQuery;

/// Company and user scope shared by several lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUser {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetLobListQuery(pub CompanyUser);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetDocumentCategoriesQuery(pub CompanyUser);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetAssetLookupQuery(pub CompanyUser);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetLeadGenerationLookupQuery(pub CompanyUser);

/// One of the verification form lookups; the route picks the kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GetFvrLookupQuery {
    #[serde(flatten)]
    pub scope: CompanyUser,
    #[serde(skip)]
    pub kind: FvrLookupKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GetFieldExecutivesQuery {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub location_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GetBranchLocationsQuery(pub LocationFilter);

impl Request for GetProspectLookupQuery {
    type Response = Vec<Lookup>;
    const NAME: &'static str = "GetProspectLookup.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

impl Request for GetStatesQuery {
    type Response = Vec<Lookup>;
    const NAME: &'static str = "GetStates.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

impl Request for GetLeadStatusesQuery {
    type Response = Vec<LeadStatus>;
    const NAME: &'static str = "GetLeadStatuses.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

impl Request for GetLobListQuery {
    type Response = Vec<LineOfBusiness>;
    const NAME: &'static str = "GetLobList.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

impl Request for GetDocumentCategoriesQuery {
    type Response = Vec<DocumentCategory>;
    const NAME: &'static str = "GetDocumentCategories.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

impl Request for GetAssetLookupQuery {
    type Response = Vec<Lookup>;
    const NAME: &'static str = "GetAssetLookup.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

impl Request for GetLeadGenerationLookupQuery {
    type Response = Vec<Lookup>;
    const NAME: &'static str = "GetLeadGenerationLookup.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

impl Request for GetFvrLookupQuery {
    type Response = Vec<Lookup>;
    const NAME: &'static str = "GetFvrLookup.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.scope)
    }
}

impl Request for GetFieldExecutivesQuery {
    type Response = Vec<FieldExecutive>;
    const NAME: &'static str = "GetFieldExecutives.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(self)
    }
}

impl Request for GetBranchLocationsQuery {
    type Response = Vec<Location>;
    const NAME: &'static str = "GetBranchLocations.Query";

    fn field_errors(&self) -> FieldErrors {
        FieldErrors::of(&self.0)
    }
}

/// Serves every lookup query straight from the repositories.
pub struct LookupHandler {
    prospects: Arc<dyn ProspectRepository>,
    leads: Arc<dyn LeadRepository>,
    field_verifications: Arc<dyn FieldVerificationRepository>,
}

impl LookupHandler {
    pub fn new(
        prospects: Arc<dyn ProspectRepository>,
        leads: Arc<dyn LeadRepository>,
        field_verifications: Arc<dyn FieldVerificationRepository>,
    ) -> Self {
        Self {
            prospects,
            leads,
            field_verifications,
        }
    }

    fn from_state(state: &AppState) -> Self {
        Self::new(
            state.prospects.clone(),
            state.leads.clone(),
            state.field_verifications.clone(),
        )
    }
}

impl RequestHandler<GetProspectLookupQuery> for LookupHandler {
    async fn handle(&self, _query: GetProspectLookupQuery) -> Result<Vec<Lookup>, CoreError> {
        self.prospects.prospect_lookups().await
    }
}

impl RequestHandler<GetStatesQuery> for LookupHandler {
    async fn handle(&self, _query: GetStatesQuery) -> Result<Vec<Lookup>, CoreError> {
        self.prospects.states().await
    }
}

impl RequestHandler<GetLeadStatusesQuery> for LookupHandler {
    async fn handle(&self, _query: GetLeadStatusesQuery) -> Result<Vec<LeadStatus>, CoreError> {
        self.leads.lead_statuses().await
    }
}

impl RequestHandler<GetLobListQuery> for LookupHandler {
    async fn handle(&self, query: GetLobListQuery) -> Result<Vec<LineOfBusiness>, CoreError> {
        self.prospects
            .lines_of_business(query.0.company_id, query.0.user_id)
            .await
    }
}

impl RequestHandler<GetDocumentCategoriesQuery> for LookupHandler {
    async fn handle(
        &self,
        query: GetDocumentCategoriesQuery,
    ) -> Result<Vec<DocumentCategory>, CoreError> {
        self.prospects
            .document_categories(query.0.company_id, query.0.user_id)
            .await
    }
}

impl RequestHandler<GetAssetLookupQuery> for LookupHandler {
    async fn handle(&self, query: GetAssetLookupQuery) -> Result<Vec<Lookup>, CoreError> {
        self.leads
            .asset_lookups(query.0.company_id, query.0.user_id)
            .await
    }
}

impl RequestHandler<GetLeadGenerationLookupQuery> for LookupHandler {
    async fn handle(&self, query: GetLeadGenerationLookupQuery) -> Result<Vec<Lookup>, CoreError> {
        self.leads
            .lead_generation_lookups(query.0.company_id, query.0.user_id)
            .await
    }
}

impl RequestHandler<GetFvrLookupQuery> for LookupHandler {
    async fn handle(&self, query: GetFvrLookupQuery) -> Result<Vec<Lookup>, CoreError> {
        self.field_verifications
            .lookups(query.kind, query.scope.company_id, query.scope.user_id)
            .await
    }
}

impl RequestHandler<GetFieldExecutivesQuery> for LookupHandler {
    async fn handle(&self, query: GetFieldExecutivesQuery) -> Result<Vec<FieldExecutive>, CoreError> {
        self.prospects
            .field_executives(query.company_id, query.location_id)
            .await
    }
}

impl RequestHandler<GetBranchLocationsQuery> for LookupHandler {
    async fn handle(&self, query: GetBranchLocationsQuery) -> Result<Vec<Location>, CoreError> {
        self.prospects.branch_locations(&query.0).await
    }
}

// --- Axum Route Handlers ---

pub async fn get_prospect_lookup(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), GetProspectLookupQuery).await
}

pub async fn get_states(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), GetStatesQuery).await
}

pub async fn get_lead_statuses(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<LeadStatus>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), GetLeadStatusesQuery).await
}

pub async fn get_lob_list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetLobListQuery>,
) -> Result<ApiResponse<Vec<LineOfBusiness>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), query).await
}

pub async fn get_document_categories(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetDocumentCategoriesQuery>,
) -> Result<ApiResponse<Vec<DocumentCategory>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), query).await
}

pub async fn get_asset_lookup(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetAssetLookupQuery>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), query).await
}

/// `GET /GetLeadGenerationLookup/{companyId}/{userId}`
pub async fn get_lead_generation_lookup(
    State(state): State<AppState>,
    PathParams(scope): PathParams<CompanyUser>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    let query = GetLeadGenerationLookupQuery(scope);
    respond(&state.translator, &LookupHandler::from_state(&state), query).await
}

async fn fvr_lookup(
    state: &AppState,
    scope: CompanyUser,
    kind: FvrLookupKind,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    let query = GetFvrLookupQuery { scope, kind };
    respond(&state.translator, &LookupHandler::from_state(state), query).await
}

pub async fn get_fvr_hirer_lookup(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<CompanyUser>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    fvr_lookup(&state, scope, FvrLookupKind::Hirer).await
}

pub async fn get_fvr_neighbour_lookup(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<CompanyUser>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    fvr_lookup(&state, scope, FvrLookupKind::Neighbour).await
}

pub async fn get_fvr_asset_lookup(
    State(state): State<AppState>,
    QueryParams(scope): QueryParams<CompanyUser>,
) -> Result<ApiResponse<Vec<Lookup>>, Translated> {
    fvr_lookup(&state, scope, FvrLookupKind::Asset).await
}

pub async fn get_field_executives(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GetFieldExecutivesQuery>,
) -> Result<ApiResponse<Vec<FieldExecutive>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), query).await
}

pub async fn get_branch_locations(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<GetBranchLocationsQuery>,
) -> Result<ApiResponse<Vec<Location>>, Translated> {
    respond(&state.translator, &LookupHandler::from_state(&state), query).await
}
