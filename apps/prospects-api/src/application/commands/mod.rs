pub mod add_fvr_asset_detail;
pub mod add_fvr_hirer_detail;
pub mod create_guarantor_data;
pub mod create_lead_applicant;
pub mod create_lead_details;
pub mod create_lead_generation_header;
pub mod create_prospect;

pub use add_fvr_asset_detail::AddFvrAssetDetailHandler;
pub use add_fvr_hirer_detail::AddFvrHirerDetailHandler;
pub use create_guarantor_data::CreateGuarantorDataHandler;
pub use create_lead_applicant::CreateLeadApplicantHandler;
pub use create_lead_details::CreateLeadDetailsHandler;
pub use create_lead_generation_header::CreateLeadGenerationHeaderHandler;
pub use create_prospect::CreateProspectHandler;
