use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::{booking_validator::ValidationErrors, hotel_api::ApiError};

/// Failures a booking flow can end in. None of them is fatal: each maps to a
/// state the guest can act on (edit, retry, resubmit, sign in).
#[derive(Debug, Error)]
pub enum BookingError {
    /// Field-level problems with the draft. Never sent to the backend.
    #[error("booking form has {} invalid field(s)", .0.len())]
    Validation(ValidationErrors),

    /// Room or reservation listing failed; the caller may retry.
    #[error("{0}")]
    Fetch(String),

    /// A reservation mutation failed; the draft is kept for resubmission.
    #[error("{0}")]
    Submit(String),

    #[error("Please log in to make a reservation")]
    NotSignedIn,

    /// The backend rejected the forwarded token.
    #[error("Your session has expired. Please log in again")]
    Unauthorized,

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for BookingError {
    fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Fetch(_) | BookingError::Submit(_) => StatusCode::BAD_GATEWAY,
            BookingError::NotSignedIn | BookingError::Unauthorized => StatusCode::UNAUTHORIZED,
            BookingError::InvalidState(_) => StatusCode::CONFLICT,
            BookingError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            BookingError::Validation(errors) => json!({ "valid": false, "errors": errors }),
            other => json!({ "error": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl BookingError {
    /// A failed read from the backend, shown with `message`.
    pub fn fetch(err: ApiError, message: &str) -> Self {
        match err {
            ApiError::Unauthorized => BookingError::Unauthorized,
            _ => BookingError::Fetch(message.to_string()),
        }
    }

    /// A failed mutation. The backend's own explanation wins over `fallback`.
    pub fn submit(err: ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Unauthorized => BookingError::Unauthorized,
            other => BookingError::Submit(
                other
                    .backend_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.to_string()),
            ),
        }
    }
}
