use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::GatewayState;
use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedGuest;
use crate::models::{
    bookings::BookingDraft, reservation::Reservation, room::Room, search::SearchCriteria,
};
use crate::services::{
    booking_controller::{BookingController, Navigation},
    booking_validator::{BookingValidator, ValidationReport},
    hotel_api::{ApiError, HotelBackend},
    pricing_service::{DisplayedPrice, PriceBreakdown, PricingService},
};

/// Only the id of a client-sent room is used; capacity, price and
/// availability always come from the backend.
#[derive(Deserialize)]
pub struct RoomRef {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub room: RoomRef,
    #[serde(default)]
    pub criteria: SearchCriteria,
}

/// A draft plus the guest's local calendar date, which the past-date check
/// runs against. Server date when absent.
#[derive(Deserialize)]
pub struct DraftSubmission {
    pub draft: BookingDraft,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl DraftSubmission {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Serialize)]
pub struct Quote {
    pub breakdown: PriceBreakdown,
    /// Absent until the stay has at least one night
    pub display: Option<DisplayedPrice>,
}

impl From<PriceBreakdown> for Quote {
    fn from(breakdown: PriceBreakdown) -> Self {
        Self {
            display: breakdown.is_displayable().then(|| breakdown.display()),
            breakdown,
        }
    }
}

#[derive(Serialize)]
pub struct DraftResponse {
    pub draft: BookingDraft,
    pub quote: Quote,
}

#[derive(Serialize)]
pub struct BookingConfirmation {
    pub reservation: Reservation,
    pub navigate_to: Option<Navigation>,
    /// Listed rooms are stale after a booking and must be fetched again
    pub refresh_rooms: bool,
}

/// The room as the backend has it now. Missing rooms are a bad request,
/// rooms no longer offered a conflict.
async fn current_room<B: HotelBackend>(backend: &B, room_id: i64) -> Result<Room, BookingError> {
    let room = backend.get_room(room_id).await.map_err(|e| match e {
        ApiError::Status { status: 404, .. } => {
            BookingError::BadRequest(format!("Room {} does not exist", room_id))
        }
        other => BookingError::fetch(other, "Failed to load room details. Please try again."),
    })?;

    if !room.is_available {
        return Err(BookingError::InvalidState("This room is no longer available"));
    }
    Ok(room)
}

fn quote_draft(pricing: &PricingService, draft: &BookingDraft) -> Quote {
    pricing
        .quote(
            draft.room.price_per_night,
            Some(&draft.check_in_date),
            Some(&draft.check_out_date),
        )
        .into()
}

/// Start a draft for the chosen room, prefilled from the search and, when a
/// token is sent, from the guest's profile.
pub async fn draft<B: HotelBackend + 'static>(
    state: web::Data<GatewayState<B>>,
    guest: Option<AuthenticatedGuest>,
    request: web::Json<DraftRequest>,
) -> Result<HttpResponse, BookingError> {
    let DraftRequest { room, criteria } = request.into_inner();
    let room = current_room(&state.backend, room.id).await?;

    let identity = match guest {
        Some(guest) => match state.backend.current_identity(&guest.token).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("Could not load guest profile for prefill: {}", e);
                None
            }
        },
        None => None,
    };

    let mut controller = BookingController::resume(
        state.settings,
        BookingDraft::from_selection(room.clone(), &criteria, None),
    );
    let draft = controller.select_room(room.id, identity.as_ref())?.clone();
    let pricing = PricingService::new(state.settings.pricing);

    Ok(HttpResponse::Ok().json(DraftResponse {
        quote: quote_draft(&pricing, &draft),
        draft,
    }))
}

pub async fn quote<B: HotelBackend + 'static>(
    state: web::Data<GatewayState<B>>,
    draft: web::Json<BookingDraft>,
) -> HttpResponse {
    let pricing = PricingService::new(state.settings.pricing);
    HttpResponse::Ok().json(quote_draft(&pricing, &draft))
}

pub async fn validate(
    submission: web::Json<DraftSubmission>,
) -> HttpResponse {
    let today = submission.today();
    let draft = &submission.draft;
    let report = ValidationReport::from(BookingValidator::validate(draft, &draft.room, today));

    HttpResponse::Ok().json(report)
}

/// Validate and submit. The room is re-read from the backend first, so
/// capacity and price are never taken from the request. Nothing is submitted
/// unless the draft is clean and a token was sent.
pub async fn create<B: HotelBackend + 'static>(
    state: web::Data<GatewayState<B>>,
    guest: Option<AuthenticatedGuest>,
    submission: web::Json<DraftSubmission>,
) -> Result<HttpResponse, BookingError> {
    let today = submission.today();
    let session = guest.map(|guest| guest.session());

    let mut draft = submission.into_inner().draft;
    let room = current_room(&state.backend, draft.room.id).await?;
    if room != draft.room {
        debug!("Room {} differs from the client's copy, using the backend record", room.id);
    }
    draft.room = room;

    let mut controller = BookingController::resume(state.settings, draft);
    let reservation = controller
        .submit(&state.backend, session.as_ref(), today)
        .await?;

    Ok(HttpResponse::Created().json(BookingConfirmation {
        reservation,
        navigate_to: controller.take_navigation(),
        refresh_rooms: controller.rooms_need_refresh(),
    }))
}
