pub mod download_document;
pub mod download_prospect_report;
pub mod get_existing_prospect;
pub mod get_fvr_details;
pub mod get_lead_asset_details;
pub mod get_lead_details;
pub mod get_lead_hirer_details;
pub mod get_lead_translander_details;
pub mod get_prospect_details_for_lead;
pub mod lookups;

pub use download_document::DownloadDocumentHandler;
pub use download_prospect_report::DownloadProspectReportHandler;
pub use get_existing_prospect::GetExistingProspectHandler;
pub use get_fvr_details::GetFvrDetailsHandler;
pub use get_lead_asset_details::GetLeadAssetDetailsHandler;
pub use get_lead_details::GetLeadDetailsHandler;
pub use get_lead_hirer_details::GetLeadHirerDetailsHandler;
pub use get_lead_translander_details::GetLeadTranslanderDetailsHandler;
pub use get_prospect_details_for_lead::GetProspectDetailsForLeadHandler;
pub use lookups::LookupHandler;
