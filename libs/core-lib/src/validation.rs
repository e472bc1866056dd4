//! Field-level validation. Rules are declared with `validator` attributes on the request
//! types; [`FieldErrors`] is the flattened form that reaches the error document.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

// -- Identifier patterns --

/// Permanent account number: five letters, four digits, one letter.
pub static PAN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap());

/// Ten digit mobile number starting with 6, 7, 8 or 9.
pub static MOBILE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").unwrap());

pub static AADHAR_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{12}$").unwrap());

/// GSTIN: state code, the holder's PAN, entity number, `Z`, check character.
pub static GST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").unwrap());

/// Key `validator` uses for errors raised by struct-level (schema) rules.
const SCHEMA_KEY: &str = "__all__";

/// Field name to ordered list of violation messages.
///
/// Backed by a `BTreeMap` so that serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the `validator` rules of `value`.
    pub fn of<T: Validate>(value: &T) -> Self {
        match value.validate() {
            Ok(()) => Self::new(),
            Err(errors) => errors.into(),
        }
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    fn collect(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let field: &str = field;
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for error in list {
                        let name = if field == SCHEMA_KEY {
                            error
                                .params
                                .get("field")
                                .and_then(Value::as_str)
                                .unwrap_or("request")
                                .to_string()
                        } else {
                            camel_case(field)
                        };
                        let message = error
                            .message
                            .as_deref()
                            .map(str::to_string)
                            .unwrap_or_else(|| error.code.to_string());
                        self.add(format!("{prefix}{name}"), message);
                    }
                }
                ValidationErrorsKind::Struct(inner) => {
                    self.collect(&format!("{prefix}{}.", camel_case(field)), inner);
                }
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.collect(&format!("{prefix}{}[{index}].", camel_case(field)), inner);
                    }
                }
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        fields.collect("", &errors);
        fields
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<F, M> FromIterator<(F, M)> for FieldErrors
where
    F: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// `pan_number` -> `panNumber`, matching the JSON names of the request fields.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Error from a struct-level rule, reported under `field` rather than `__all__`.
pub fn field_error(field: &'static str, code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code).with_message(Cow::Borrowed(message));
    error.add_param(Cow::Borrowed("field"), &field);
    error
}

// -- Custom field rules --

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Contact {
        #[validate(custom(function = "not_blank"))]
        name: String,
        #[validate(regex(path = *MOBILE_NUMBER, message = "must be a 10 digit mobile number"))]
        mobile_number: String,
        #[validate(regex(path = *PAN_NUMBER, message = "invalid format"))]
        pan_number: Option<String>,
    }

    #[derive(Validate)]
    #[validate(schema(function = "needs_contacts", skip_on_field_errors = false))]
    struct Book {
        #[validate(nested)]
        contacts: Vec<Contact>,
    }

    fn needs_contacts(book: &Book) -> Result<(), ValidationError> {
        if book.contacts.is_empty() {
            return Err(field_error("contacts", "required", "at least one contact"));
        }
        Ok(())
    }

    fn contact(name: &str, mobile: &str, pan: Option<&str>) -> Contact {
        Contact {
            name: name.into(),
            mobile_number: mobile.into(),
            pan_number: pan.map(str::to_string),
        }
    }

    #[test]
    fn identifier_patterns() {
        assert!(PAN_NUMBER.is_match("ABCDE1234F"));
        assert!(!PAN_NUMBER.is_match("abcde1234f"));
        assert!(!PAN_NUMBER.is_match("ABC12"));
        assert!(MOBILE_NUMBER.is_match("9876543210"));
        assert!(!MOBILE_NUMBER.is_match("1234567890"));
        assert!(AADHAR_NUMBER.is_match("123412341234"));
        assert!(!AADHAR_NUMBER.is_match("1234-1234-12"));
    }

    #[test]
    fn field_names_are_camel_cased() {
        let errors = FieldErrors::of(&contact("Ravi", "12", Some("ABC12")));
        assert_eq!(
            errors.get("mobileNumber"),
            Some(&["must be a 10 digit mobile number".to_string()][..])
        );
        assert_eq!(errors.get("panNumber"), Some(&["invalid format".to_string()][..]));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn absent_optional_field_is_not_checked() {
        assert!(FieldErrors::of(&contact("Ravi", "9876543210", None)).is_empty());
    }

    #[test]
    fn blank_text_is_required() {
        let errors = FieldErrors::of(&contact("  ", "9876543210", None));
        assert_eq!(errors.get("name"), Some(&["is required".to_string()][..]));
    }

    #[test]
    fn nested_list_errors_are_indexed() {
        let book = Book {
            contacts: vec![contact("Ravi", "9876543210", None), contact("", "1", None)],
        };
        let errors = FieldErrors::of(&book);
        assert!(errors.get("contacts[1].name").is_some());
        assert!(errors.get("contacts[1].mobileNumber").is_some());
        assert!(errors.get("contacts[0].name").is_none());
    }

    #[test]
    fn schema_errors_use_their_named_field() {
        let errors = FieldErrors::of(&Book { contacts: Vec::new() });
        assert_eq!(errors.get("contacts"), Some(&["at least one contact".to_string()][..]));
        assert!(errors.get(SCHEMA_KEY).is_none());
    }

    #[test]
    fn messages_keep_insertion_order_per_field() {
        let errors: FieldErrors = [("name", "is required"), ("name", "too short")]
            .into_iter()
            .collect();
        assert_eq!(
            errors.get("name"),
            Some(&["is required".to_string(), "too short".to_string()][..])
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("panNumber", "invalid format");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"panNumber":["invalid format"]}"#);
    }

    #[test]
    fn display_joins_all_messages() {
        let mut errors = FieldErrors::new();
        errors.add("b", "two");
        errors.add("a", "one");
        assert_eq!(errors.to_string(), "a: one; b: two");
    }
}
