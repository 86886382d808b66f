use thiserror::Error;

use super::models::DecodeError;
use crate::models::{
    bookings::CreateReservationRequest,
    reservation::{Reservation, ReservationFilter},
    room::Room,
    search::RoomQuery,
    user::GuestIdentity,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to hotel backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("hotel backend answered {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: u16,
        /// Human-readable message from the backend payload, when it had one
        message: Option<String>,
    },

    #[error("authentication required")]
    Unauthorized,

    #[error("unexpected payload from hotel backend: {0}")]
    Decode(#[from] DecodeError),

    #[error("invalid hotel backend configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The backend's own explanation, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub trait RoomOperations {
    async fn list_available_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, ApiError>;

    /// The backend's current record of one room.
    async fn get_room(&self, room_id: i64) -> Result<Room, ApiError>;
}

pub trait ReservationOperations {
    async fn create_reservation(
        &self,
        token: &str,
        request: &CreateReservationRequest,
    ) -> Result<Reservation, ApiError>;

    async fn my_reservations(
        &self,
        token: &str,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, ApiError>;

    async fn cancel_reservation(
        &self,
        token: &str,
        reservation_id: i64,
    ) -> Result<Reservation, ApiError>;
}

pub trait IdentityOperations {
    async fn current_identity(&self, token: &str) -> Result<GuestIdentity, ApiError>;
}

/// Everything the gateway needs from the hotel backend.
pub trait HotelBackend: RoomOperations + ReservationOperations + IdentityOperations {}

impl<T> HotelBackend for T where T: RoomOperations + ReservationOperations + IdentityOperations {}
