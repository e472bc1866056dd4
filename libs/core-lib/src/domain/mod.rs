pub mod field_verification;
pub mod lead;
pub mod lookup;
pub mod prospect;
pub mod report;
