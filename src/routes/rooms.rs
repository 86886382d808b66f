use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::GatewayState;
use crate::error::BookingError;
use crate::models::{room::Room, search::SearchCriteria};
use crate::services::{
    booking_controller::BookingController, hotel_api::HotelBackend, pricing_service::money,
};

#[derive(Serialize)]
pub struct RoomListing {
    #[serde(flatten)]
    pub room: Room,
    /// Nightly price as displayed, two decimals
    pub price_label: String,
}

#[derive(Serialize)]
pub struct RoomSearchResponse {
    pub rooms: Vec<RoomListing>,
    pub count: usize,
}

/// Fetch rooms for the criteria and keep the ones the party fits in.
pub async fn search<B: HotelBackend + 'static>(
    state: web::Data<GatewayState<B>>,
    criteria: web::Json<SearchCriteria>,
) -> Result<HttpResponse, BookingError> {
    let mut controller = BookingController::new(state.settings);
    let rooms = controller
        .search(&state.backend, criteria.into_inner())
        .await?;

    let rooms: Vec<RoomListing> = rooms
        .iter()
        .map(|room| RoomListing {
            price_label: money(room.price_per_night),
            room: room.clone(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(RoomSearchResponse {
        count: rooms.len(),
        rooms,
    }))
}
