//! Data models for Autospec

pub mod booking;

// Re-export commonly used types
pub use booking::{BookingField, BookingRequest, FieldValue, BOOKINGS_COLLECTION, STATUS_NEW};
