// Declare modules within the adapters directory
pub mod cms_document_store;
pub mod excel_report;
pub mod in_memory_cache;
pub mod in_memory_repository;
pub mod pdf_report;
pub mod postgres_repository;
