//! Booking draft validation

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::{models::BookingRequest, store::Document};

/// `local@domain.tld`, no whitespace and a single `@` per part; surrounding
/// whitespace is allowed because the address is matched as if trimmed
pub(crate) static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[^\s@]+@[^\s@]+\.[^\s@]+\s*$").expect("valid email regex")
});

/// Error code shared by every required-field rule
const REQUIRED: &str = "required";

fn required(message: &'static str) -> validator::ValidationError {
    validator::ValidationError::new(REQUIRED).with_message(Cow::Borrowed(message))
}

pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(required("Field is required"));
    }
    Ok(())
}

pub(crate) fn consent_given(value: &bool) -> Result<(), validator::ValidationError> {
    if !*value {
        return Err(required("Consent is required"));
    }
    Ok(())
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please make sure all required fields are filled out.")]
    MissingRequired,

    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// A draft that passed every rule; the only way to build a store record
#[derive(Debug, Clone, Copy)]
pub struct ValidBooking<'a>(&'a BookingRequest);

impl<'a> ValidBooking<'a> {
    pub fn request(&self) -> &'a BookingRequest {
        self.0
    }

    pub fn to_document(&self) -> Document {
        self.0.to_document()
    }
}

/// Required-field failures outrank a malformed email
fn classify(errors: &ValidationErrors) -> ValidationError {
    let missing = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .any(|e| e.code == REQUIRED);
    if missing {
        ValidationError::MissingRequired
    } else {
        ValidationError::InvalidEmail
    }
}

/// Check required fields first, then the email format
pub fn validate(draft: &BookingRequest) -> Result<ValidBooking<'_>, ValidationError> {
    draft.validate().map_err(|errors| classify(&errors))?;
    Ok(ValidBooking(draft))
}
