#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use hotel_booking::models::{
    bookings::CreateReservationRequest,
    reservation::{Reservation, ReservationFilter, ReservationStatus, RoomSummary},
    room::{Room, RoomType},
    search::RoomQuery,
    user::GuestIdentity,
};
use hotel_booking::services::hotel_api::{
    ApiError, IdentityOperations, ReservationOperations, RoomOperations,
};

pub const VALID_TOKEN: &str = "valid-token";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn room(id: i64, number: &str, room_type: RoomType, price: i64, capacity: u32) -> Room {
    Room {
        id,
        room_number: number.to_string(),
        room_type,
        price_per_night: Decimal::from(price),
        capacity,
        is_available: true,
        amenities: String::new(),
        scenery: String::new(),
    }
}

/// Room 101 (standard, 2 guests), 201 (deluxe, 4 guests) and a suite that
/// is out of service.
pub fn hotel_rooms() -> Vec<Room> {
    let mut closed = room(3, "301", RoomType::Suite, 300, 4);
    closed.is_available = false;

    vec![
        room(1, "101", RoomType::Standard, 100, 2),
        room(2, "201", RoomType::Deluxe, 180, 4),
        closed,
    ]
}

pub fn guest() -> GuestIdentity {
    GuestIdentity {
        id: 7,
        first_name: "Jane".to_string(),
        last_name: "Roe".to_string(),
        email: "jane@example.com".to_string(),
        phone: Some("+1 555 123 4567".to_string()),
        role: "GUEST".to_string(),
    }
}

/// In-memory hotel backend. Only `VALID_TOKEN` is accepted.
pub struct FakeBackend {
    pub rooms: Vec<Room>,
    /// Number of upcoming room listings that fail with a 500
    pub room_failures: AtomicUsize,
    /// Message every reservation request is rejected with, when set
    pub submit_error: Mutex<Option<String>>,
    pub reservations: Mutex<Vec<Reservation>>,
    pub room_calls: AtomicUsize,
    pub room_lookups: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub last_query: Mutex<Option<RoomQuery>>,
    pub last_request: Mutex<Option<CreateReservationRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            rooms: hotel_rooms(),
            room_failures: AtomicUsize::new(0),
            submit_error: Mutex::new(None),
            reservations: Mutex::new(Vec::new()),
            room_calls: AtomicUsize::new(0),
            room_lookups: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }
}

impl FakeBackend {
    pub fn failing_rooms(times: usize) -> Self {
        let backend = Self::default();
        backend.room_failures.store(times, Ordering::SeqCst);
        backend
    }

    pub fn rejecting_submissions(message: &str) -> Self {
        let backend = Self::default();
        *backend.submit_error.lock().unwrap() = Some(message.to_string());
        backend
    }

    pub fn with_reservations(reservations: Vec<Reservation>) -> Self {
        let backend = Self::default();
        *backend.reservations.lock().unwrap() = reservations;
        backend
    }

    pub fn room_calls(&self) -> usize {
        self.room_calls.load(Ordering::SeqCst)
    }

    pub fn room_lookups(&self) -> usize {
        self.room_lookups.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn authorize(token: &str) -> Result<(), ApiError> {
        if token == VALID_TOKEN {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

pub fn reservation(id: i64, room: &Room, status: ReservationStatus) -> Reservation {
    Reservation {
        id,
        check_in_date: date(2099, 6, 1),
        check_out_date: Some(date(2099, 6, 4)),
        guest_name: "Jane Roe".to_string(),
        guest_email: "jane@example.com".to_string(),
        guest_phone: "+1 555 123 4567".to_string(),
        guest_count: 2,
        total_price: Decimal::from(355),
        status,
        nights: 3,
        room: Some(RoomSummary {
            room_number: room.room_number.clone(),
            room_type: room.room_type,
            price_per_night: room.price_per_night,
        }),
    }
}

impl RoomOperations for FakeBackend {
    async fn list_available_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>, ApiError> {
        self.room_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        let failures = self.room_failures.load(Ordering::SeqCst);
        if failures > 0 {
            self.room_failures.store(failures - 1, Ordering::SeqCst);
            return Err(ApiError::Status {
                status: 500,
                message: None,
            });
        }
        Ok(self.rooms.clone())
    }

    async fn get_room(&self, room_id: i64) -> Result<Room, ApiError> {
        self.room_lookups.fetch_add(1, Ordering::SeqCst);
        self.rooms
            .iter()
            .find(|room| room.id == room_id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: Some("Not found.".to_string()),
            })
    }
}

impl ReservationOperations for FakeBackend {
    async fn create_reservation(
        &self,
        token: &str,
        request: &CreateReservationRequest,
    ) -> Result<Reservation, ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Self::authorize(token)?;
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = self.submit_error.lock().unwrap().clone() {
            return Err(ApiError::Status {
                status: 400,
                message: Some(message),
            });
        }

        let room = self
            .rooms
            .iter()
            .find(|room| room.id == request.room_id)
            .ok_or(ApiError::Status {
                status: 400,
                message: Some("Room does not exist.".to_string()),
            })?;

        let mut reservations = self.reservations.lock().unwrap();
        let mut created = reservation(reservations.len() as i64 + 1, room, ReservationStatus::Pending);
        created.check_in_date = request.check_in_date;
        created.check_out_date =
            Some(request.check_in_date + Duration::days(request.duration as i64));
        created.nights = request.duration;
        created.guest_count = request.number_of_guests;
        created.total_price = request.total_price;
        reservations.push(created.clone());

        Ok(created)
    }

    async fn my_reservations(
        &self,
        token: &str,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, ApiError> {
        Self::authorize(token)?;
        let reservations = self.reservations.lock().unwrap();
        Ok(reservations
            .iter()
            .filter(|r| filter.status.map_or(true, |status| r.status == status))
            .cloned()
            .collect())
    }

    async fn cancel_reservation(
        &self,
        token: &str,
        reservation_id: i64,
    ) -> Result<Reservation, ApiError> {
        Self::authorize(token)?;
        let mut reservations = self.reservations.lock().unwrap();
        let reservation = reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .ok_or(ApiError::Status {
                status: 404,
                message: Some("Not found.".to_string()),
            })?;

        if reservation.status == ReservationStatus::Cancelled {
            return Err(ApiError::Status {
                status: 400,
                message: Some("Reservation is already cancelled.".to_string()),
            });
        }
        reservation.status = ReservationStatus::Cancelled;
        Ok(reservation.clone())
    }
}

impl IdentityOperations for FakeBackend {
    async fn current_identity(&self, token: &str) -> Result<GuestIdentity, ApiError> {
        Self::authorize(token)?;
        Ok(guest())
    }
}
