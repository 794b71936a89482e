//! Booking submission endpoints

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{BookingField, BookingRequest, STATUS_NEW},
    services::bookings::SubmittedBooking,
    AppState,
};

/// Accepted booking
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    /// Store-assigned record id
    pub id: String,
    pub status: String,
    /// Confirmation to show the customer
    pub message: String,
    /// How long the confirmation stays visible
    pub dismiss_after_ms: u64,
}

impl From<SubmittedBooking> for BookingCreatedResponse {
    fn from(submitted: SubmittedBooking) -> Self {
        Self {
            id: submitted.id.0,
            status: STATUS_NEW.to_string(),
            message: submitted.message,
            dismiss_after_ms: u64::try_from(submitted.dismiss_after.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Submit a booking request (JSON)
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingCreatedResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 502, description = "Document store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    let Json(draft) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let submitted = state.services.bookings.submit(draft).await?;
    Ok((StatusCode::CREATED, Json(submitted.into())))
}

/// Submit a booking request (HTML form post, `consent=on` for a ticked box)
#[utoipa::path(
    post,
    path = "/bookings/form",
    tag = "bookings",
    request_body(content = BookingRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Booking created", body = BookingCreatedResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 502, description = "Document store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking_form(
    State(state): State<AppState>,
    payload: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> AppResult<(StatusCode, Json<BookingCreatedResponse>)> {
    let Form(inputs) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut draft = BookingRequest::default();
    for (name, value) in inputs {
        match name.parse::<BookingField>() {
            Ok(field) => draft.update_field(field, value),
            Err(e) => tracing::debug!("Ignoring form input: {}", e),
        }
    }

    let submitted = state.services.bookings.submit(draft).await?;
    Ok((StatusCode::CREATED, Json(submitted.into())))
}
