pub mod interface;
pub mod models;
pub mod provider;

pub use interface::{
    ApiError, HotelBackend, IdentityOperations, ReservationOperations, RoomOperations,
};
pub use provider::{ApiConfig, HotelApiProvider};
