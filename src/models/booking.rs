//! Booking request model (customer contact and vehicle details)

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::{Document, Value};

/// Logical collection that receives booking records
pub const BOOKINGS_COLLECTION: &str = "bookings";

/// Status stamped on every newly created booking
pub const STATUS_NEW: &str = "New";

/// Draft booking as entered on the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    /// Customer full name
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub full_name: String,
    /// Contact email
    #[validate(
        custom(function = "crate::services::validation::not_blank"),
        regex(path = *crate::services::validation::EMAIL_REGEX, code = "regex")
    )]
    pub email: String,
    /// Contact phone (optional)
    pub phone: String,
    /// Vehicle registration, upper-cased as typed
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub reg: String,
    /// Preferred booking date (YYYY-MM-DD)
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub preferred_date: String,
    /// MOT due date (YYYY-MM-DD, optional)
    pub mot_due: String,
    /// Free text describing the work needed
    pub details: String,
    /// Customer agreed to be contacted
    #[validate(custom(function = "crate::services::validation::consent_given"))]
    pub consent: bool,
}

/// Form field names, as they appear on the wire and in stored records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingField {
    FullName,
    Email,
    Phone,
    Reg,
    PreferredDate,
    MotDue,
    Details,
    Consent,
}

impl BookingField {
    pub const ALL: [BookingField; 8] = [
        BookingField::FullName,
        BookingField::Email,
        BookingField::Phone,
        BookingField::Reg,
        BookingField::PreferredDate,
        BookingField::MotDue,
        BookingField::Details,
        BookingField::Consent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingField::FullName => "fullName",
            BookingField::Email => "email",
            BookingField::Phone => "phone",
            BookingField::Reg => "reg",
            BookingField::PreferredDate => "preferredDate",
            BookingField::MotDue => "motDue",
            BookingField::Details => "details",
            BookingField::Consent => "consent",
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown booking field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for BookingField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Value typed into a form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checked(value)
    }
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Checked(checked) => checked.to_string(),
        }
    }

    /// Checkbox semantics: browsers post "on" for a ticked box
    fn is_checked(&self) -> bool {
        match self {
            FieldValue::Checked(checked) => *checked,
            FieldValue::Text(text) => matches!(text.as_str(), "on" | "true" | "1"),
        }
    }
}

impl BookingRequest {
    /// Set a single field; the registration is upper-cased before storage
    pub fn update_field(&mut self, field: BookingField, value: impl Into<FieldValue>) {
        let value = value.into();
        match field {
            BookingField::Consent => self.consent = value.is_checked(),
            BookingField::Reg => self.reg = value.into_text().to_uppercase(),
            BookingField::FullName => self.full_name = value.into_text(),
            BookingField::Email => self.email = value.into_text(),
            BookingField::Phone => self.phone = value.into_text(),
            BookingField::PreferredDate => self.preferred_date = value.into_text(),
            BookingField::MotDue => self.mot_due = value.into_text(),
            BookingField::Details => self.details = value.into_text(),
        }
    }

    /// Copy every field of `other` through `update_field`, applying input normalization
    pub fn fill_from(&mut self, other: BookingRequest) {
        self.update_field(BookingField::FullName, other.full_name);
        self.update_field(BookingField::Email, other.email);
        self.update_field(BookingField::Phone, other.phone);
        self.update_field(BookingField::Reg, other.reg);
        self.update_field(BookingField::PreferredDate, other.preferred_date);
        self.update_field(BookingField::MotDue, other.mot_due);
        self.update_field(BookingField::Details, other.details);
        self.update_field(BookingField::Consent, other.consent);
    }

    /// Record shape persisted to the document store
    pub(crate) fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(BookingField::FullName.to_string(), Value::from(self.full_name.as_str()));
        doc.insert(BookingField::Email.to_string(), Value::from(self.email.as_str()));
        doc.insert(BookingField::Phone.to_string(), Value::from(self.phone.as_str()));
        doc.insert(BookingField::Reg.to_string(), Value::from(self.reg.as_str()));
        doc.insert(
            BookingField::PreferredDate.to_string(),
            Value::from(self.preferred_date.as_str()),
        );
        doc.insert(BookingField::MotDue.to_string(), Value::from(self.mot_due.as_str()));
        doc.insert(BookingField::Details.to_string(), Value::from(self.details.as_str()));
        doc.insert(BookingField::Consent.to_string(), Value::Bool(self.consent));
        doc.insert("createdAt".to_string(), Value::ServerTimestamp);
        doc.insert("status".to_string(), Value::from(STATUS_NEW));
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reg_is_uppercased() {
        let mut draft = BookingRequest::default();
        draft.update_field(BookingField::Reg, "bd10 svs");
        assert_eq!(draft.reg, "BD10 SVS");
    }

    #[test]
    fn test_consent_checkbox_values() {
        let mut draft = BookingRequest::default();
        draft.update_field(BookingField::Consent, "on");
        assert!(draft.consent);
        draft.update_field(BookingField::Consent, "");
        assert!(!draft.consent);
        draft.update_field(BookingField::Consent, true);
        assert!(draft.consent);
    }

    #[test]
    fn test_field_names() {
        assert_eq!("preferredDate".parse::<BookingField>(), Ok(BookingField::PreferredDate));
        assert_eq!("motDue".parse::<BookingField>(), Ok(BookingField::MotDue));
        assert!("bookingTimestamp".parse::<BookingField>().is_err());
    }

    #[test]
    fn test_fill_from_normalizes() {
        let mut draft = BookingRequest::default();
        draft.fill_from(BookingRequest {
            full_name: "Jane Doe".to_string(),
            reg: "ab12 cde".to_string(),
            consent: true,
            ..Default::default()
        });
        assert_eq!(draft.full_name, "Jane Doe");
        assert_eq!(draft.reg, "AB12 CDE");
        assert!(draft.consent);
    }

    #[test]
    fn test_document_shape() {
        let draft = BookingRequest {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            reg: "AB12CDE".to_string(),
            preferred_date: "2024-06-01".to_string(),
            consent: true,
            ..Default::default()
        };
        let doc = draft.to_document();

        assert_eq!(doc.len(), 10);
        assert_eq!(doc["fullName"], Value::from("Jane Doe"));
        assert_eq!(doc["phone"], Value::from(""));
        assert_eq!(doc["consent"], Value::Bool(true));
        assert_eq!(doc["status"], Value::from("New"));
        assert_eq!(doc["createdAt"], Value::ServerTimestamp);
    }
}
