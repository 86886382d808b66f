use actix_web::{web, HttpResponse};
use log::info;
use serde::Serialize;

use super::GatewayState;
use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedGuest;
use crate::models::reservation::{Reservation, ReservationFilter};
use crate::services::hotel_api::HotelBackend;
use crate::services::stay_service::nights_label;

#[derive(Serialize)]
pub struct ReservationListing {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub status_label: String,
    pub nights_label: String,
}

impl From<Reservation> for ReservationListing {
    fn from(reservation: Reservation) -> Self {
        Self {
            status_label: reservation.status.display_name(),
            nights_label: nights_label(reservation.nights),
            reservation,
        }
    }
}

/// The caller's reservations, newest check-in first unless `ordering` says
/// otherwise.
pub async fn list<B: HotelBackend + 'static>(
    guest: AuthenticatedGuest,
    state: web::Data<GatewayState<B>>,
    filter: web::Query<ReservationFilter>,
) -> Result<HttpResponse, BookingError> {
    let reservations = state
        .backend
        .my_reservations(&guest.token, &filter)
        .await
        .map_err(|e| BookingError::fetch(e, "Failed to load reservations. Please try again."))?;

    let listings: Vec<ReservationListing> =
        reservations.into_iter().map(ReservationListing::from).collect();
    Ok(HttpResponse::Ok().json(listings))
}

/// Cancel one reservation and return the updated record, which the client
/// patches into its list in place.
pub async fn cancel<B: HotelBackend + 'static>(
    guest: AuthenticatedGuest,
    state: web::Data<GatewayState<B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, BookingError> {
    let reservation_id = path.into_inner();
    let reservation = state
        .backend
        .cancel_reservation(&guest.token, reservation_id)
        .await
        .map_err(|e| {
            BookingError::submit(e, "Failed to cancel reservation. Please try again.")
        })?;

    info!("Reservation {} cancelled", reservation_id);
    Ok(HttpResponse::Ok().json(ReservationListing::from(reservation)))
}
