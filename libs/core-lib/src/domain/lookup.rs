use serde::{Deserialize, Serialize};
use validator::Validate;

/// Generic id/name pair returned by the lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    pub id: i32,
    pub name: String,
    /// Lookup group, e.g. `"Occupation"` or `"State"`.
    pub category: Option<String>,
}

impl Lookup {
    pub fn new(id: i32, name: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOfBusiness {
    pub lob_id: i32,
    pub lob_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCategory {
    pub category_id: i32,
    pub category_name: String,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExecutive {
    pub executive_id: i32,
    pub executive_name: String,
    pub location_id: i32,
    pub mobile_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_id: i32,
    pub location_name: String,
    pub lob_id: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatus {
    pub status_id: i32,
    pub status_name: String,
}

/// Filter for the branch location search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationFilter {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lob_id: i32,
    pub is_active: Option<bool>,
}

impl LocationFilter {
    pub fn matches(&self, location: &Location) -> bool {
        location.lob_id == self.lob_id
            && self.is_active.is_none_or(|active| location.is_active == active)
    }
}
