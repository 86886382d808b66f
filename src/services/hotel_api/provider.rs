use log::{debug, warn};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{env, time::Duration};
use url::Url;

use super::interface::{
    ApiError, IdentityOperations, ReservationOperations, RoomOperations,
};
use super::models::{
    reservation::{ReservationListPayload, ReservationRecord},
    room::RoomRecord,
    user::UserRecord,
};
use crate::models::{
    bookings::CreateReservationRequest,
    reservation::{Reservation, ReservationFilter},
    room::Room,
    search::RoomQuery,
    user::GuestIdentity,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// `HOTEL_API_BASE_URL` and `HOTEL_API_TIMEOUT_SECS`, with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("HOTEL_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout: env::var("HOTEL_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// REST client for the hotel backend.
pub struct HotelApiProvider {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HotelApiProvider {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Config(format!("bad endpoint '{}': {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("GET {} {:?}", url.path(), params);

        let mut request = self.http_client.get(url).query(params);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        read_response(request.send().await?).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url.path());

        let mut request = self.http_client.post(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        read_response(request.send().await?).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    // Without the trailing slash `join` would replace the last segment ("api")
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&normalized).map_err(|e| ApiError::Config(format!("'{}': {}", raw, e)))
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|payload| backend_message(&payload));
        warn!("Hotel backend answered {}: {:?}", status, message);

        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<T>().await?)
}

/// Pick the human-readable message out of a backend error payload:
/// `detail`, then `error`, then `non_field_errors`, then the first field
/// error.
pub fn backend_message(payload: &Value) -> Option<String> {
    fn first_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(first_text),
            _ => None,
        }
    }

    match payload {
        Value::String(_) | Value::Array(_) => first_text(payload),
        Value::Object(fields) => ["detail", "error", "non_field_errors"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(first_text))
            .or_else(|| fields.values().find_map(first_text)),
        _ => None,
    }
}

impl RoomOperations for HotelApiProvider {
    async fn list_available_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, ApiError> {
        let records: Vec<RoomRecord> = self
            .get_json("rooms/available/", None, &query.to_params())
            .await?;

        let rooms = records
            .into_iter()
            .map(Room::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Decoded {} rooms from backend", rooms.len());
        Ok(rooms)
    }

    async fn get_room(&self, room_id: i64) -> Result<Room, ApiError> {
        let path = format!("rooms/{}/", room_id);
        let record: RoomRecord = self.get_json(&path, None, &[]).await?;

        Ok(Room::try_from(record)?)
    }
}

impl ReservationOperations for HotelApiProvider {
    async fn create_reservation(
        &self,
        token: &str,
        request: &CreateReservationRequest,
    ) -> Result<Reservation, ApiError> {
        let record: ReservationRecord = self
            .post_json("reservations/", Some(token), Some(request))
            .await?;

        Ok(Reservation::try_from(record)?)
    }

    async fn my_reservations(
        &self,
        token: &str,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, ApiError> {
        let payload: ReservationListPayload = self
            .get_json(
                "reservations/my_reservations/",
                Some(token),
                &filter.to_params(),
            )
            .await?;

        let reservations = payload
            .into_records()
            .into_iter()
            .map(Reservation::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reservations)
    }

    async fn cancel_reservation(
        &self,
        token: &str,
        reservation_id: i64,
    ) -> Result<Reservation, ApiError> {
        let path = format!("reservations/{}/cancel/", reservation_id);
        let record: ReservationRecord = self
            .post_json::<_, Value>(&path, Some(token), None)
            .await?;

        Ok(Reservation::try_from(record)?)
    }
}

impl IdentityOperations for HotelApiProvider {
    async fn current_identity(&self, token: &str) -> Result<GuestIdentity, ApiError> {
        let record: UserRecord = self.get_json("auth/me/", Some(token), &[]).await?;
        Ok(GuestIdentity::try_from(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    fn test_backend_message_priority() {
        assert_eq!(
            backend_message(&json!({"error": "Nope", "detail": "Room is gone"})),
            Some("Room is gone".to_string())
        );
        assert_eq!(
            backend_message(&json!({"error": "Reservation is already cancelled."})),
            Some("Reservation is already cancelled.".to_string())
        );
        assert_eq!(
            backend_message(&json!({"non_field_errors": ["Check-in date cannot be in the past."]})),
            Some("Check-in date cannot be in the past.".to_string())
        );
        assert_eq!(
            backend_message(&json!({
                "room_id": ["Room is already booked from 2025-06-01 to 2025-06-04."]
            })),
            Some("Room is already booked from 2025-06-01 to 2025-06-04.".to_string())
        );
    }

    #[test]
    fn test_backend_message_absent() {
        assert_eq!(backend_message(&json!({})), None);
        assert_eq!(backend_message(&json!({"detail": ""})), None);
        assert_eq!(backend_message(&json!(500)), None);
    }

    #[test]
    fn test_base_url_keeps_api_prefix() {
        let provider = HotelApiProvider::new(&ApiConfig {
            base_url: "http://localhost:8000/api".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(
            provider.endpoint("rooms/available/").unwrap().as_str(),
            "http://localhost:8000/api/rooms/available/"
        );
        assert_eq!(
            provider.endpoint("reservations/7/cancel/").unwrap().path(),
            "/api/reservations/7/cancel/"
        );
    }

    #[test]
    fn test_bad_base_url_is_a_config_error() {
        let result = HotelApiProvider::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("HOTEL_API_BASE_URL", "https://hotel.example.com/api/");
        env::set_var("HOTEL_API_TIMEOUT_SECS", "0");

        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, "https://hotel.example.com/api/");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        env::remove_var("HOTEL_API_BASE_URL");
        env::remove_var("HOTEL_API_TIMEOUT_SECS");
        assert_eq!(ApiConfig::from_env(), ApiConfig::default());
    }
}
