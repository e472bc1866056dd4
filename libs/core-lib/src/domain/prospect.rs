use crate::validation::{AADHAR_NUMBER, MOBILE_NUMBER, PAN_NUMBER, field_error, not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub prospect_id: i32,
    pub company_id: i32,
    pub name: String,
    pub mobile_number: String,
    pub aadhar_number: Option<String>,
    pub pan_number: Option<String>,
    pub state_id: i32,
    pub lob_id: i32,
    pub location_id: i32,
    pub created_by: i32,
    pub created_on: DateTime<Utc>,
}

/// Payload of the prospect creation command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProspect {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(regex(path = *MOBILE_NUMBER, message = "must be a 10 digit mobile number"))]
    pub mobile_number: String,
    #[serde(default)]
    #[validate(regex(path = *AADHAR_NUMBER, message = "must be a 12 digit number"))]
    pub aadhar_number: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PAN_NUMBER, message = "invalid format"))]
    pub pan_number: Option<String>,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub state_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub lob_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub location_id: i32,
}

impl NewProspect {
    pub fn into_prospect(self, prospect_id: i32, created_on: DateTime<Utc>) -> Prospect {
        Prospect {
            prospect_id,
            company_id: self.company_id,
            name: self.name,
            mobile_number: self.mobile_number,
            aadhar_number: self.aadhar_number,
            pan_number: self.pan_number,
            state_id: self.state_id,
            lob_id: self.lob_id,
            location_id: self.location_id,
            created_by: self.user_id,
            created_on,
        }
    }
}

/// Search for an existing customer by any of its identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "search_has_identifier", skip_on_field_errors = false))]
pub struct ProspectSearch {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[serde(default)]
    pub prospect_id: Option<i32>,
    #[serde(default)]
    #[validate(regex(path = *MOBILE_NUMBER, message = "must be a 10 digit mobile number"))]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub aadhar_number: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PAN_NUMBER, message = "invalid format"))]
    pub pan_number: Option<String>,
}

impl ProspectSearch {
    fn has_identifier(&self) -> bool {
        self.prospect_id.is_some()
            || self.mobile_number.is_some()
            || self.aadhar_number.is_some()
            || self.pan_number.is_some()
    }

    /// A prospect matches when every identifier given in the search agrees.
    pub fn matches(&self, prospect: &Prospect) -> bool {
        prospect.company_id == self.company_id
            && self.prospect_id.is_none_or(|id| prospect.prospect_id == id)
            && self
                .mobile_number
                .as_deref()
                .is_none_or(|m| prospect.mobile_number == m)
            && self
                .aadhar_number
                .as_deref()
                .is_none_or(|a| prospect.aadhar_number.as_deref() == Some(a))
            && self
                .pan_number
                .as_deref()
                .is_none_or(|p| prospect.pan_number.as_deref() == Some(p))
    }
}

fn search_has_identifier(search: &ProspectSearch) -> Result<(), ValidationError> {
    if !search.has_identifier() {
        return Err(field_error(
            "prospectId",
            "required",
            "one of prospectId, mobileNumber, aadharNumber or panNumber is required",
        ));
    }
    Ok(())
}

/// Which prospects go into the downloadable prospect report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectReportFilter {
    pub company_id: i32,
    pub lob_id: Option<i32>,
    pub location_id: Option<i32>,
}

impl ProspectReportFilter {
    pub fn matches(&self, prospect: &Prospect) -> bool {
        prospect.company_id == self.company_id
            && self.lob_id.is_none_or(|lob| prospect.lob_id == lob)
            && self
                .location_id
                .is_none_or(|location| prospect.location_id == location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldErrors;

    fn new_prospect() -> NewProspect {
        NewProspect {
            company_id: 1,
            user_id: 7,
            name: "Ravi Kumar".into(),
            mobile_number: "9876543210".into(),
            aadhar_number: Some("123412341234".into()),
            pan_number: Some("ABCDE1234F".into()),
            state_id: 33,
            lob_id: 1,
            location_id: 10,
        }
    }

    #[test]
    fn valid_prospect_has_no_errors() {
        assert!(FieldErrors::of(&new_prospect()).is_empty());
    }

    #[test]
    fn invalid_pan_is_reported_under_pan_number() {
        let mut prospect = new_prospect();
        prospect.pan_number = Some("1234".into());
        let errors = FieldErrors::of(&prospect);
        assert_eq!(errors.get("panNumber"), Some(&["invalid format".to_string()][..]));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn search_requires_an_identifier() {
        let search = ProspectSearch {
            user_id: 1,
            company_id: 1,
            ..Default::default()
        };
        assert!(FieldErrors::of(&search).get("prospectId").is_some());
    }

    #[test]
    fn search_reports_bad_identifiers_and_missing_ones_together() {
        let search = ProspectSearch {
            user_id: 0,
            company_id: 1,
            ..Default::default()
        };
        let errors = FieldErrors::of(&search);
        assert!(errors.get("userId").is_some());
        assert!(errors.get("prospectId").is_some());
    }

    #[test]
    fn report_filter_narrows_by_lob_and_location() {
        let prospect = new_prospect().into_prospect(5, Utc::now());
        let filter = ProspectReportFilter {
            company_id: 1,
            lob_id: Some(1),
            location_id: None,
        };
        assert!(filter.matches(&prospect));
        assert!(!ProspectReportFilter { location_id: Some(11), ..filter }.matches(&prospect));
        assert!(!ProspectReportFilter { company_id: 2, ..filter }.matches(&prospect));
    }

    #[test]
    fn search_matches_on_all_given_identifiers() {
        let prospect = new_prospect().into_prospect(5, Utc::now());
        let search = ProspectSearch {
            user_id: 7,
            company_id: 1,
            pan_number: Some("ABCDE1234F".into()),
            mobile_number: Some("9876543210".into()),
            ..Default::default()
        };
        assert!(search.matches(&prospect));

        let other_mobile = ProspectSearch {
            mobile_number: Some("9000000000".into()),
            ..search
        };
        assert!(!other_mobile.matches(&prospect));
    }
}
