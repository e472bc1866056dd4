use axum::{
    Router, middleware,
    routing::{get, post},
};
use core_lib::{
    Cache, DocumentStore, FieldVerificationRepository, LeadRepository, ProspectRepository,
    adapters::{in_memory_cache::InMemoryCache, in_memory_repository::InMemoryRepository},
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub mod application;
pub mod config;

use application::{
    commands::{
        add_fvr_asset_detail::add_fvr_asset_detail,
        add_fvr_hirer_detail::add_fvr_hirer_detail,
        create_guarantor_data::create_guarantor_data,
        create_lead_applicant::{create_lead_individual_details, create_non_individual_detail},
        create_lead_details::create_lead_details,
        create_lead_generation_header::create_lead_generation_header,
        create_prospect::create_new_prospect,
    },
    errors::ErrorTranslator,
    middleware::{PanicResponder, bearer_auth},
    queries::{
        download_document::download_document,
        download_prospect_report::download_prospect_report,
        get_existing_prospect::get_existing_prospect_details,
        get_fvr_details::{get_fvr_guarantor_details, get_fvr_neighbour_hood_details},
        get_lead_asset_details::get_lead_asset_details,
        get_lead_details::get_lead_details,
        get_lead_hirer_details::get_lead_hirer_details,
        get_lead_translander_details::get_lead_translander_details,
        get_prospect_details_for_lead::get_prospect_details_for_lead,
        lookups::{
            get_asset_lookup, get_branch_locations, get_document_categories, get_field_executives,
            get_fvr_asset_lookup, get_fvr_hirer_lookup, get_fvr_neighbour_lookup,
            get_lead_generation_lookup, get_lead_statuses, get_lob_list, get_prospect_lookup,
            get_states,
        },
    },
};

// Holds shared dependencies
#[derive(Clone)]
pub struct AppState {
    pub prospects: Arc<dyn ProspectRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub field_verifications: Arc<dyn FieldVerificationRepository>,
    /// `None` when no file server is configured.
    pub documents: Option<Arc<dyn DocumentStore>>,
    /// Bearer token to serialized `AuthenticatedUser`.
    pub tokens: Arc<dyn Cache>,
    pub translator: Arc<ErrorTranslator>,
}

impl AppState {
    /// State backed by one seeded in-memory repository and an empty token cache.
    pub fn in_memory() -> Self {
        let repository = Arc::new(InMemoryRepository::seeded());
        Self {
            prospects: repository.clone(),
            leads: repository.clone(),
            field_verifications: repository,
            documents: None,
            tokens: Arc::new(InMemoryCache::default()),
            translator: Arc::new(ErrorTranslator::default()),
        }
    }
}

// Function to create the main Axum router with state
pub fn create_app(app_state: AppState) -> Router {
    let prospect_routes = Router::new()
        .route("/GetProspectLookup", get(get_prospect_lookup))
        .route("/GetStates", get(get_states))
        .route("/GetLobList", get(get_lob_list))
        .route("/GetDocumentCategories", get(get_document_categories))
        .route("/GetFieldExecutives", get(get_field_executives))
        .route("/GetBranchLocations", post(get_branch_locations))
        .route(
            "/GetExistingProspectDetailsForCustomer",
            post(get_existing_prospect_details),
        )
        .route("/CreateNewProspect", post(create_new_prospect))
        .route("/DownloadDocument", get(download_document))
        .route("/DownloadProspectReport", get(download_prospect_report))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), bearer_auth));

    // Lead routes are open to unauthenticated callers.
    let lead_routes = Router::new()
        .route("/GetLeadStatuses", get(get_lead_statuses))
        .route("/GetLeadDetails", get(get_lead_details))
        .route("/CreateLeadDetails", post(create_lead_details))
        .route("/CreateGuarantorData", post(create_guarantor_data))
        .route("/GetAssetLookup", get(get_asset_lookup))
        .route(
            "/GetLeadGenerationLookup/{companyId}/{userId}",
            get(get_lead_generation_lookup),
        )
        .route("/GetProspectDetailsForLead", post(get_prospect_details_for_lead))
        .route("/CreateLeadIndividualDetails", post(create_lead_individual_details))
        .route("/CreateNonIndividualDetail", post(create_non_individual_detail))
        // Route name kept as published to existing clients.
        .route("/CreatetLeadGenerationHeader", post(create_lead_generation_header))
        .route("/GetLeadTranslanderDetails", post(get_lead_translander_details));

    let field_verification_routes = Router::new()
        .route("/GetFvrHirerLookup", get(get_fvr_hirer_lookup))
        .route("/GetLeadHirerDetails", get(get_lead_hirer_details))
        .route("/AddFvrHirerDetail", post(add_fvr_hirer_detail))
        .route("/GetFvrNeighbourLookup", get(get_fvr_neighbour_lookup))
        .route("/GetFvrAssetLookup", get(get_fvr_asset_lookup))
        .route("/GetFvrNeighbourHoodDetails", get(get_fvr_neighbour_hood_details))
        .route("/GetLeadAssetDetails", get(get_lead_asset_details))
        .route("/AddFvrAssetDetail", post(add_fvr_asset_detail))
        .route("/GetFvrGuarantorDetails", get(get_fvr_guarantor_details))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), bearer_auth));

    let api_routes = Router::new()
        .nest("/Prospects", prospect_routes)
        .nest("/Leads", lead_routes)
        .nest("/FieldVerification", field_verification_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(PanicResponder::new(
            app_state.translator.clone(),
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
