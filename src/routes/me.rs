use actix_web::{web, HttpResponse};

use super::GatewayState;
use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedGuest;
use crate::services::hotel_api::HotelBackend;

pub async fn current_guest<B: HotelBackend + 'static>(
    guest: AuthenticatedGuest,
    state: web::Data<GatewayState<B>>,
) -> Result<HttpResponse, BookingError> {
    let identity = state
        .backend
        .current_identity(&guest.token)
        .await
        .map_err(|e| BookingError::fetch(e, "Failed to load your profile. Please try again."))?;

    Ok(HttpResponse::Ok().json(identity))
}
