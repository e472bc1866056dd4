use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// File format of a downloadable report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Excel,
    Pdf,
}

impl OutputType {
    /// Case-insensitive; `"xlsx"` is accepted for Excel.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Some(OutputType::Excel),
            "pdf" => Some(OutputType::Pdf),
            _ => None,
        }
    }
}

pub fn known_output_type(value: &str) -> Result<(), ValidationError> {
    if OutputType::parse(value).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("output_type").with_message("must be either excel or pdf".into()))
}
