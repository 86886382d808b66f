use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use hotel_booking::routes::{self, GatewayState};
use hotel_booking::services::{
    booking_controller::BookingSettings,
    hotel_api::{ApiConfig, HotelApiProvider},
};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let api_config = ApiConfig::from_env();
    let settings = BookingSettings::from_env();
    info!(
        "Hotel backend at {} (timeout {:?})",
        api_config.base_url, api_config.timeout
    );

    let provider = HotelApiProvider::new(&api_config).map_err(|e| {
        error!("Cannot build hotel backend client: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let state = web::Data::new(GatewayState::new(provider, settings));

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::config::<HotelApiProvider>)
    })
    .bind((host, port))?
    .run()
    .await
}
