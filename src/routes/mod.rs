use actix_web::web;

use crate::services::{booking_controller::BookingSettings, hotel_api::HotelBackend};

pub mod bookings;
pub mod health;
pub mod me;
pub mod reservations;
pub mod rooms;

/// Shared by every request: the backend client and the booking settings.
pub struct GatewayState<B> {
    pub backend: B,
    pub settings: BookingSettings,
}

impl<B> GatewayState<B> {
    pub fn new(backend: B, settings: BookingSettings) -> Self {
        Self { backend, settings }
    }
}

/// Register every gateway route. `B` is fixed by whoever builds the app;
/// `main` uses the REST provider.
pub fn config<B: HotelBackend + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/me", web::get().to(me::current_guest::<B>))
                .route("/rooms/search", web::post().to(rooms::search::<B>))
                .service(
                    web::scope("/bookings")
                        .route("", web::post().to(bookings::create::<B>))
                        .route("/draft", web::post().to(bookings::draft::<B>))
                        .route("/quote", web::post().to(bookings::quote::<B>))
                        .route("/validate", web::post().to(bookings::validate)),
                )
                .service(
                    web::scope("/reservations")
                        .route("", web::get().to(reservations::list::<B>))
                        .route("/{id}/cancel", web::post().to(reservations::cancel::<B>)),
                ),
        );
}
