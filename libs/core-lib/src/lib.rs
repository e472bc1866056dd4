use async_trait::async_trait;
use std::error::Error as StdError;

// Declare modules
pub mod adapters;
pub mod domain;
pub mod validation;

use domain::field_verification::{AssetSearch, FvrAsset, FvrDetail, FvrLookupKind, HirerSearch, PersonType};
use domain::lead::{
    Lead, LeadHeader, LeadIndividualDetail, LeadNonIndividualDetail, LeadPage, LeadPageRequest,
    LeadSearch,
};
use domain::lookup::{DocumentCategory, FieldExecutive, LeadStatus, LineOfBusiness, Location, LocationFilter, Lookup};
use domain::prospect::{NewProspect, Prospect, ProspectReportFilter, ProspectSearch};
pub use validation::FieldErrors;
pub use validator::Validate;

// Define a common error type for the core library
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Request validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Upstream service returned {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        response_data: Option<String>,
    },
    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] Box<dyn StdError + Send + Sync>),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short name of the failure kind, safe to expose to API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::NotFound(_) => "NotFound",
            CoreError::Rejected(_) => "Rejected",
            CoreError::Validation(_) => "Validation",
            CoreError::Upstream { .. } => "Upstream",
            CoreError::Infrastructure(_) => "Infrastructure",
            CoreError::Configuration(_) => "Configuration",
            CoreError::Internal(_) => "Internal",
        }
    }

    /// The error message without the kind prefix that `Display` adds.
    pub fn detail(&self) -> String {
        match self {
            CoreError::NotFound(message)
            | CoreError::Rejected(message)
            | CoreError::Configuration(message)
            | CoreError::Internal(message) => message.clone(),
            CoreError::Upstream { message, .. } => message.clone(),
            CoreError::Validation(errors) => errors.to_string(),
            CoreError::Infrastructure(source) => source.to_string(),
        }
    }
}

// Port for reading and writing prospects and the reference data around them
#[async_trait]
pub trait ProspectRepository: Send + Sync {
    async fn prospect_lookups(&self) -> Result<Vec<Lookup>, CoreError>;

    async fn states(&self) -> Result<Vec<Lookup>, CoreError>;

    async fn lines_of_business(
        &self,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<LineOfBusiness>, CoreError>;

    async fn document_categories(
        &self,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<DocumentCategory>, CoreError>;

    async fn field_executives(
        &self,
        company_id: i32,
        location_id: i32,
    ) -> Result<Vec<FieldExecutive>, CoreError>;

    async fn branch_locations(&self, filter: &LocationFilter) -> Result<Vec<Location>, CoreError>;

    /// Returns `Ok(None)` when no prospect matches the search.
    async fn find_prospect(&self, search: &ProspectSearch) -> Result<Option<Prospect>, CoreError>;

    /// Stores a new prospect and returns its assigned id.
    async fn create_prospect(&self, prospect: &NewProspect) -> Result<i32, CoreError>;

    /// Prospects selected by `filter`, oldest first.
    async fn prospects_for_report(
        &self,
        filter: &ProspectReportFilter,
    ) -> Result<Vec<Prospect>, CoreError>;
}

// Port for lead records
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn lead_statuses(&self) -> Result<Vec<LeadStatus>, CoreError>;

    async fn asset_lookups(&self, company_id: i32, user_id: i32) -> Result<Vec<Lookup>, CoreError>;

    async fn lead_generation_lookups(
        &self,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<Lookup>, CoreError>;

    async fn leads_for_prospect(
        &self,
        company_id: i32,
        prospect_id: i32,
    ) -> Result<Vec<LeadHeader>, CoreError>;

    async fn lead_page(&self, request: &LeadPageRequest) -> Result<LeadPage, CoreError>;

    async fn find_lead(&self, search: &LeadSearch) -> Result<Option<Lead>, CoreError>;

    /// Stores a lead header and returns it with the lead id and lead number filled in.
    async fn create_lead_header(
        &self,
        company_id: i32,
        user_id: i32,
        location_id: i32,
        header: &LeadHeader,
    ) -> Result<LeadHeader, CoreError>;

    /// Attaches the guarantors of `lead` to the stored lead. `false` when the lead is unknown.
    async fn add_guarantors(&self, lead: &Lead) -> Result<bool, CoreError>;

    /// Records the applicant details of an individual hirer; `NotFound` for an unknown lead.
    async fn add_individual_detail(
        &self,
        company_id: i32,
        user_id: i32,
        lead_id: i32,
        detail: &LeadIndividualDetail,
    ) -> Result<i32, CoreError>;

    async fn add_non_individual_detail(
        &self,
        user_id: i32,
        lead_id: i32,
        detail: &LeadNonIndividualDetail,
    ) -> Result<i32, CoreError>;
}

// Port for field verification reports
#[async_trait]
pub trait FieldVerificationRepository: Send + Sync {
    async fn lookups(
        &self,
        kind: FvrLookupKind,
        company_id: i32,
        user_id: i32,
    ) -> Result<Vec<Lookup>, CoreError>;

    async fn hirer_details(&self, search: &HirerSearch) -> Result<Option<FvrDetail>, CoreError>;

    /// Latest report of `person_type` on the lead, or the one with `field_verification_id`.
    async fn verification_detail(
        &self,
        company_id: i32,
        lead_id: i32,
        person_type: PersonType,
        field_verification_id: Option<i32>,
    ) -> Result<Option<FvrDetail>, CoreError>;

    async fn asset_details(&self, search: &AssetSearch) -> Result<Option<FvrAsset>, CoreError>;

    /// Stores a hirer verification report and returns its field verification id.
    async fn add_hirer_detail(
        &self,
        company_id: i32,
        lead_id: i32,
        detail: &FvrDetail,
    ) -> Result<i32, CoreError>;

    async fn add_asset_detail(
        &self,
        company_id: i32,
        user_id: i32,
        lead_id: i32,
        asset: &FvrAsset,
    ) -> Result<i32, CoreError>;
}

// Port for the document file server
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, CoreError>;
}

// Renders prospects into a downloadable report file
pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;

    fn render(&self, title: &str, prospects: &[Prospect]) -> Result<Vec<u8>, CoreError>;
}

// Port for caching data
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError>;
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CoreError>;
}
