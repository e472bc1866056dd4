use crate::domain::prospect::Prospect;
use crate::validation::{GST_NUMBER, MOBILE_NUMBER, field_error, not_blank};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadHeader {
    /// Assigned by the repository on creation.
    #[serde(default)]
    pub lead_id: Option<i32>,
    /// Assigned by the repository on creation.
    #[serde(default)]
    pub lead_number: Option<String>,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub prospect_id: i32,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub status_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lob_id: i32,
    #[serde(default)]
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub loan_amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Guarantor {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(regex(path = *MOBILE_NUMBER, message = "must be a 10 digit mobile number"))]
    pub mobile_number: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

/// A stored lead with its guarantors; also the body of the guarantor command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "lead_has_id", skip_on_field_errors = false))]
pub struct Lead {
    #[serde(default)]
    pub header: Option<LeadHeader>,
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one guarantor is required"), nested)]
    pub guarantors: Vec<Guarantor>,
}

impl Lead {
    pub fn lead_id(&self) -> Option<i32> {
        self.header.as_ref().and_then(|h| h.lead_id)
    }
}

fn lead_has_id(lead: &Lead) -> Result<(), ValidationError> {
    if lead.lead_id().is_none() {
        return Err(field_error("header.leadId", "required", "is required"));
    }
    Ok(())
}

/// A lead captured in one step: header plus any guarantors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub location_id: i32,
    #[validate(nested)]
    pub header: LeadHeader,
    #[serde(default)]
    #[validate(nested)]
    pub guarantors: Vec<Guarantor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "lead_search_has_key", skip_on_field_errors = false))]
pub struct LeadSearch {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[serde(default)]
    pub lead_id: Option<i32>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub lead_number: Option<String>,
}

impl LeadSearch {
    pub fn matches(&self, header: &LeadHeader) -> bool {
        self.lead_id.is_none_or(|id| header.lead_id == Some(id))
            && self
                .vehicle_number
                .as_deref()
                .is_none_or(|v| header.vehicle_number.as_deref() == Some(v))
            && self
                .lead_number
                .as_deref()
                .is_none_or(|n| header.lead_number.as_deref() == Some(n))
    }
}

fn lead_search_has_key(search: &LeadSearch) -> Result<(), ValidationError> {
    if search.lead_id.is_none() && search.vehicle_number.is_none() && search.lead_number.is_none() {
        return Err(field_error(
            "leadId",
            "required",
            "one of leadId, vehicleNumber or leadNumber is required",
        ));
    }
    Ok(())
}

/// Applicant details when the hirer is a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadIndividualDetail {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[validate(custom(function = "in_the_past"))]
    pub date_of_birth: NaiveDate,
    #[validate(custom(function = "known_gender"))]
    pub gender: String,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub occupation_id: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub monthly_income: Option<i64>,
}

fn in_the_past(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        return Err(ValidationError::new("date").with_message("must be in the past".into()));
    }
    Ok(())
}

fn known_gender(gender: &str) -> Result<(), ValidationError> {
    if matches!(gender, "Male" | "Female" | "Other") {
        return Ok(());
    }
    Err(ValidationError::new("gender").with_message("must be Male, Female or Other".into()))
}

/// Applicant details when the hirer is a firm, trust or company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadNonIndividualDetail {
    #[validate(custom(function = "not_blank"))]
    pub entity_name: String,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub constitution_id: i32,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *GST_NUMBER, message = "invalid format"))]
    pub gst_number: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub contact_person: String,
    #[validate(regex(path = *MOBILE_NUMBER, message = "must be a 10 digit mobile number"))]
    pub contact_mobile: String,
}

/// A prospect together with the leads already raised for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadProspectDetail {
    #[serde(flatten)]
    pub prospect: Prospect,
    pub leads: Vec<LeadHeader>,
}

/// One page of the lead work list, filtered and searched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadPageRequest {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub current_page: i32,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub page_size: i32,
    /// Matched against lead and vehicle numbers.
    #[serde(default)]
    pub search_value: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub lead_number: Option<String>,
    /// Lead status id.
    #[serde(default)]
    pub status: Option<i32>,
}

impl LeadPageRequest {
    pub fn matches(&self, header: &LeadHeader) -> bool {
        let lead_number = header.lead_number.as_deref().unwrap_or_default();
        let vehicle_number = header.vehicle_number.as_deref().unwrap_or_default();
        self.status.is_none_or(|s| header.status_id == s)
            && self.lead_number.as_deref().is_none_or(|n| lead_number == n)
            && self
                .vehicle_number
                .as_deref()
                .is_none_or(|v| vehicle_number == v)
            && self.search_value.as_deref().is_none_or(|term| {
                let term = term.to_ascii_uppercase();
                lead_number.to_ascii_uppercase().contains(&term)
                    || vehicle_number.to_ascii_uppercase().contains(&term)
            })
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> usize {
        usize::try_from(self.current_page.saturating_sub(1).saturating_mul(self.page_size))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPage {
    pub total_count: i64,
    pub current_page: i32,
    pub page_size: i32,
    pub leads: Vec<LeadHeader>,
}
