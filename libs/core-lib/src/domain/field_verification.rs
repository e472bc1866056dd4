use crate::validation::{field_error, not_blank};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Field verification report (FVR) captured for a hirer, guarantor or neighbour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FvrDetail {
    #[serde(default)]
    pub field_verification_id: Option<i32>,
    #[serde(default)]
    pub lead_id: Option<i32>,
    #[validate(custom(function = "not_blank"))]
    pub person_type: String,
    #[validate(custom(function = "not_blank"))]
    pub person_name: String,
    #[serde(default)]
    pub residence_type_id: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub years_at_residence: Option<i32>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub verified_by: i32,
}

/// Who a verification report is about. The numeric ids are the ones clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonType {
    Hirer,
    Guarantor,
    Neighbour,
}

impl PersonType {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(PersonType::Hirer),
            2 => Some(PersonType::Guarantor),
            3 => Some(PersonType::Neighbour),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PersonType::Hirer => "Hirer",
            PersonType::Guarantor => "Guarantor",
            PersonType::Neighbour => "Neighbour",
        }
    }

    /// Report person types are free text; compare without regard to case.
    pub fn matches(self, person_type: &str) -> bool {
        person_type.eq_ignore_ascii_case(self.as_str())
    }
}

/// Reference lists offered on the verification forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FvrLookupKind {
    Hirer,
    Neighbour,
    Asset,
}

/// Search for the hirer verification of a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "hirer_search_has_lead", skip_on_field_errors = false))]
pub struct HirerSearch {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    /// `"view"` or `"edit"`.
    #[validate(custom(function = "view_or_edit"))]
    pub mode: String,
    #[serde(default)]
    pub lead_number: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
}

fn view_or_edit(mode: &str) -> Result<(), ValidationError> {
    if matches!(mode, "view" | "edit") {
        return Ok(());
    }
    Err(ValidationError::new("mode").with_message("must be either view or edit".into()))
}

fn hirer_search_has_lead(search: &HirerSearch) -> Result<(), ValidationError> {
    if search.lead_number.is_none() && search.vehicle_number.is_none() {
        return Err(field_error(
            "leadNumber",
            "required",
            "one of leadNumber or vehicleNumber is required",
        ));
    }
    Ok(())
}

/// Asset inspected during field verification, usually the financed vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FvrAsset {
    #[serde(default)]
    pub field_verification_id: Option<i32>,
    #[serde(default)]
    pub lead_id: Option<i32>,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub asset_type_id: i32,
    #[validate(custom(function = "not_blank"))]
    pub vehicle_number: String,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1950, max = 2100, message = "is not a plausible year"))]
    pub manufacture_year: Option<i32>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub verified_by: i32,
}

/// Search for the asset verification of a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "asset_search_has_lead", skip_on_field_errors = false))]
pub struct AssetSearch {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub company_id: i32,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub user_id: i32,
    #[serde(default)]
    pub lead_number: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
}

fn asset_search_has_lead(search: &AssetSearch) -> Result<(), ValidationError> {
    if search.lead_number.is_none() && search.vehicle_number.is_none() {
        return Err(field_error(
            "leadNumber",
            "required",
            "one of leadNumber or vehicleNumber is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldErrors;

    #[test]
    fn hirer_search_rejects_unknown_mode() {
        let search = HirerSearch {
            company_id: 1,
            user_id: 1,
            mode: "delete".into(),
            lead_number: Some("LD1".into()),
            vehicle_number: None,
        };
        let errors = FieldErrors::of(&search);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("mode"),
            Some(&["must be either view or edit".to_string()][..])
        );
    }

    #[test]
    fn hirer_search_needs_a_lead_reference() {
        let search = HirerSearch {
            company_id: 1,
            user_id: 1,
            mode: "view".into(),
            ..Default::default()
        };
        assert!(FieldErrors::of(&search).get("leadNumber").is_some());
    }

    #[test]
    fn detail_requires_person_fields() {
        let errors = FieldErrors::of(&FvrDetail::default());
        assert!(errors.get("personType").is_some());
        assert!(errors.get("personName").is_some());
        assert!(errors.get("verifiedBy").is_some());
    }

    #[test]
    fn asset_year_must_be_plausible() {
        let asset = FvrAsset {
            asset_type_id: 1,
            vehicle_number: "TN09AB1234".into(),
            manufacture_year: Some(1890),
            verified_by: 501,
            ..Default::default()
        };
        let errors = FieldErrors::of(&asset);
        assert_eq!(errors.len(), 1);
        assert!(errors.get("manufactureYear").is_some());
    }

    #[test]
    fn person_type_ids() {
        assert_eq!(PersonType::from_id(2), Some(PersonType::Guarantor));
        assert_eq!(PersonType::from_id(9), None);
        assert!(PersonType::Neighbour.matches("neighbour"));
        assert!(!PersonType::Hirer.matches("Guarantor"));
    }
}
