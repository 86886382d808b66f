//! Search and booking flow of the room booking page.
//!
//! The page moves `Idle -> Loading -> Ready | Error`; inside `Ready` the
//! booking moves `NoSelection -> Selected -> Submitting -> Confirmed |
//! SubmitFailed`. Network calls are issued as tickets: `begin_*` hands out a
//! ticket, the caller runs the request, `complete_*` applies the result only
//! if the ticket is still the current one and the flow was not abandoned.
//! `search`, `retry_search` and `submit` wrap that for callers that simply
//! await.

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::BookingError;
use crate::models::{
    bookings::{BookingDraft, CreateReservationRequest, DraftEdit},
    reservation::{Mutation, MutationPolicy, Reservation},
    room::Room,
    search::{RoomQuery, SearchCriteria},
    user::{GuestIdentity, GuestSession},
};
use crate::services::{
    availability_service::filter_available_rooms,
    booking_validator::{BookingField, BookingValidator, ValidationErrors},
    hotel_api::{ApiError, ReservationOperations, RoomOperations},
    pricing_service::{PriceBreakdown, PricingConfig, PricingService},
    stay_service::parse_stay_date,
};

pub const FETCH_ERROR_MESSAGE: &str = "Failed to load available rooms. Please try again.";
pub const SUBMIT_ERROR_MESSAGE: &str = "Failed to create reservation. Please try again.";

const DEFAULT_CHECK_IN_HOUR: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookingSettings {
    pub pricing: PricingConfig,
    /// Hour of day sent with every reservation
    pub check_in_hour: u8,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            check_in_hour: DEFAULT_CHECK_IN_HOUR,
        }
    }
}

impl BookingSettings {
    pub fn from_env() -> Self {
        Self {
            pricing: PricingConfig::from_env(),
            check_in_hour: env::var("BOOKING_CHECK_IN_HOUR")
                .ok()
                .and_then(|s| s.trim().parse::<u8>().ok())
                .filter(|hour| *hour < 24)
                .unwrap_or(DEFAULT_CHECK_IN_HOUR),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Idle,
    Loading,
    Ready,
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingStage {
    NoSelection,
    Selected,
    Submitting,
    Confirmed(Reservation),
    SubmitFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    ReservationList,
}

/// Whether a completed request changed the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    pub query: RoomQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    generation: u64,
    pub token: String,
    pub request: CreateReservationRequest,
}

pub struct BookingController {
    settings: BookingSettings,
    pricing: PricingService,
    criteria: SearchCriteria,
    page: PageState,
    rooms: Vec<Room>,
    rooms_stale: bool,
    stage: BookingStage,
    draft: Option<BookingDraft>,
    errors: ValidationErrors,
    generation: u64,
    pending_search: Option<u64>,
    pending_submit: Option<u64>,
    navigation: Option<Navigation>,
    abandoned: bool,
}

impl BookingController {
    pub fn new(settings: BookingSettings) -> Self {
        Self {
            settings,
            pricing: PricingService::new(settings.pricing),
            criteria: SearchCriteria::default(),
            page: PageState::Idle,
            rooms: Vec::new(),
            rooms_stale: false,
            stage: BookingStage::NoSelection,
            draft: None,
            errors: ValidationErrors::default(),
            generation: 0,
            pending_search: None,
            pending_submit: None,
            navigation: None,
            abandoned: false,
        }
    }

    /// Pick up a draft that was selected elsewhere, e.g. carried by the web
    /// client across page loads.
    pub fn resume(settings: BookingSettings, draft: BookingDraft) -> Self {
        let mut controller = Self::new(settings);
        controller.criteria = draft.criteria.clone();
        controller.rooms = vec![draft.room.clone()];
        controller.page = PageState::Ready;
        controller.stage = BookingStage::Selected;
        controller.draft = Some(draft);
        controller
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn stage(&self) -> &BookingStage {
        &self.stage
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Set after a reservation was created; the next search must refetch.
    pub fn rooms_need_refresh(&self) -> bool {
        self.rooms_stale
    }

    /// False while a submission is in flight, so the trigger can be disabled.
    pub fn can_submit(&self) -> bool {
        !self.abandoned
            && matches!(
                self.stage,
                BookingStage::Selected | BookingStage::SubmitFailed { .. }
            )
    }

    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }

    /// The guest left the page. Results of requests still in flight are
    /// dropped when they arrive.
    pub fn abandon(&mut self) {
        debug!("Booking flow abandoned");
        self.abandoned = true;
        self.pending_search = None;
        self.pending_submit = None;
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn ensure_active(&self) -> Result<(), BookingError> {
        if self.abandoned {
            Err(BookingError::InvalidState("booking flow was abandoned"))
        } else {
            Ok(())
        }
    }

    pub fn begin_search(&mut self, criteria: SearchCriteria) -> Result<SearchTicket, BookingError> {
        self.ensure_active()?;
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::InvalidState(
                "a reservation is being submitted",
            ));
        }
        if !criteria.has_valid_date_range() {
            let mut errors = ValidationErrors::default();
            errors.insert(
                BookingField::CheckOutDate,
                "Check-out date must be after check-in date",
            );
            return Err(BookingError::Validation(errors));
        }

        let generation = self.next_generation();
        let query = criteria.to_query();
        debug!("Search #{} started: {:?}", generation, query);

        self.criteria = criteria;
        self.page = PageState::Loading;
        self.stage = BookingStage::NoSelection;
        self.draft = None;
        self.errors = ValidationErrors::default();
        self.pending_search = Some(generation);

        Ok(SearchTicket { generation, query })
    }

    /// Re-issue the last search after a failed fetch.
    pub fn retry(&mut self) -> Result<SearchTicket, BookingError> {
        if !matches!(self.page, PageState::Error { .. }) {
            return Err(BookingError::InvalidState("there is no failed search to retry"));
        }
        self.begin_search(self.criteria.clone())
    }

    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Room>, ApiError>,
    ) -> Completion {
        if self.abandoned || self.pending_search != Some(ticket.generation) {
            debug!("Discarding room list of search #{}", ticket.generation);
            return Completion::Discarded;
        }
        self.pending_search = None;

        match result {
            Ok(rooms) => {
                self.rooms = filter_available_rooms(&rooms, &self.criteria);
                self.rooms_stale = false;
                self.page = PageState::Ready;
                debug!(
                    "Search #{} ready: {} of {} rooms match",
                    ticket.generation,
                    self.rooms.len(),
                    rooms.len()
                );
            }
            Err(err) => {
                warn!("Search #{} failed: {}", ticket.generation, err);
                // An error is shown instead of whatever was listed before
                self.rooms.clear();
                self.page = PageState::Error {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                };
            }
        }

        Completion::Applied
    }

    pub async fn search<B: RoomOperations>(
        &mut self,
        api: &B,
        criteria: SearchCriteria,
    ) -> Result<&[Room], BookingError> {
        let ticket = self.begin_search(criteria)?;
        let result = api.list_available_rooms(&ticket.query).await;
        self.finish_search(&ticket, result)
    }

    pub async fn retry_search<B: RoomOperations>(&mut self, api: &B) -> Result<&[Room], BookingError> {
        let ticket = self.retry()?;
        let result = api.list_available_rooms(&ticket.query).await;
        self.finish_search(&ticket, result)
    }

    fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Room>, ApiError>,
    ) -> Result<&[Room], BookingError> {
        if self.complete_search(ticket, result) == Completion::Discarded {
            return Err(BookingError::InvalidState("search result was discarded"));
        }
        match &self.page {
            PageState::Error { message } => Err(BookingError::Fetch(message.clone())),
            _ => Ok(&self.rooms),
        }
    }

    pub fn select_room(
        &mut self,
        room_id: i64,
        identity: Option<&GuestIdentity>,
    ) -> Result<&BookingDraft, BookingError> {
        self.ensure_active()?;
        if self.page != PageState::Ready {
            return Err(BookingError::InvalidState("rooms are not loaded"));
        }
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::InvalidState(
                "a reservation is being submitted",
            ));
        }

        let room = self
            .rooms
            .iter()
            .find(|room| room.id == room_id)
            .cloned()
            .ok_or_else(|| {
                BookingError::BadRequest(format!(
                    "Room {} is not among the available rooms",
                    room_id
                ))
            })?;

        debug!("Room {} selected", room.room_number);
        self.errors = ValidationErrors::default();
        self.stage = BookingStage::Selected;
        self.navigation = None;
        Ok(self
            .draft
            .insert(BookingDraft::from_selection(room, &self.criteria, identity)))
    }

    pub fn clear_selection(&mut self) -> Result<(), BookingError> {
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::InvalidState(
                "a reservation is being submitted",
            ));
        }
        self.stage = BookingStage::NoSelection;
        self.draft = None;
        self.errors = ValidationErrors::default();
        Ok(())
    }

    /// Apply one field change. Only that field's error is cleared; the rest
    /// stay until the next full validation.
    pub fn edit(&mut self, edit: DraftEdit) -> Result<(), BookingError> {
        if self.stage == BookingStage::Submitting {
            return Err(BookingError::InvalidState(
                "a reservation is being submitted",
            ));
        }
        let draft = self
            .draft
            .as_mut()
            .ok_or(BookingError::InvalidState("no room selected"))?;

        if let Some(field) = edited_field(&edit) {
            self.errors.clear(field);
        }
        draft.apply(edit);
        Ok(())
    }

    /// Validate the whole draft and keep the result for display.
    pub fn validate(&mut self, today: NaiveDate) -> &ValidationErrors {
        self.errors = match &self.draft {
            Some(draft) => BookingValidator::validate(draft, &draft.room, today),
            None => ValidationErrors::default(),
        };
        &self.errors
    }

    /// Price of the current draft, recomputed from its inputs.
    pub fn quote(&self) -> Option<PriceBreakdown> {
        self.draft.as_ref().map(|draft| {
            self.pricing.quote(
                draft.room.price_per_night,
                Some(&draft.check_in_date),
                Some(&draft.check_out_date),
            )
        })
    }

    /// Validate and, if clean and signed in, move to `Submitting`.
    pub fn begin_submit(
        &mut self,
        session: Option<&GuestSession>,
        today: NaiveDate,
    ) -> Result<SubmitTicket, BookingError> {
        self.ensure_active()?;
        match self.stage {
            BookingStage::Selected | BookingStage::SubmitFailed { .. } => {}
            BookingStage::Submitting => {
                return Err(BookingError::InvalidState(
                    "a reservation is already being submitted",
                ))
            }
            BookingStage::NoSelection | BookingStage::Confirmed(_) => {
                return Err(BookingError::InvalidState("no room selected"))
            }
        }

        let errors = self.validate(today).clone();
        if !errors.is_empty() {
            debug!("Submit blocked by {} invalid field(s)", errors.len());
            return Err(BookingError::Validation(errors));
        }
        let session = session.ok_or(BookingError::NotSignedIn)?;

        let draft = self
            .draft
            .as_ref()
            .ok_or(BookingError::InvalidState("no room selected"))?;
        let check_in_date = parse_stay_date(&draft.check_in_date)
            .ok_or(BookingError::InvalidState("check-in date could not be read"))?;
        let price = self.pricing.quote(
            draft.room.price_per_night,
            Some(&draft.check_in_date),
            Some(&draft.check_out_date),
        );

        let request = CreateReservationRequest {
            check_in_date,
            number_of_guests: draft.guest_count.max(1) as u32,
            total_price: price.total,
            duration: price.nights,
            hour: self.settings.check_in_hour,
            room_id: draft.room.id,
        };
        let room_number = draft.room.room_number.clone();

        let generation = self.next_generation();
        info!(
            "Submitting reservation #{} for room {} ({} nights)",
            generation, room_number, price.nights
        );
        self.stage = BookingStage::Submitting;
        self.pending_submit = Some(generation);

        Ok(SubmitTicket {
            generation,
            token: session.token.clone(),
            request,
        })
    }

    pub fn complete_submit(
        &mut self,
        ticket: &SubmitTicket,
        result: Result<Reservation, ApiError>,
    ) -> Completion {
        if self.abandoned || self.pending_submit != Some(ticket.generation) {
            debug!("Discarding submit result #{}", ticket.generation);
            return Completion::Discarded;
        }
        self.pending_submit = None;

        match result {
            Ok(reservation) => {
                info!("Reservation {} confirmed", reservation.id);
                self.draft = None;
                self.errors = ValidationErrors::default();
                if Mutation::CreateReservation.policy() == MutationPolicy::Refetch {
                    self.rooms_stale = true;
                }
                self.stage = BookingStage::Confirmed(reservation);
                self.navigation = Some(Navigation::ReservationList);
            }
            Err(err) => {
                warn!("Reservation #{} failed: {}", ticket.generation, err);
                self.stage = BookingStage::SubmitFailed {
                    message: submit_message(&err),
                };
            }
        }

        Completion::Applied
    }

    pub async fn submit<B: ReservationOperations>(
        &mut self,
        api: &B,
        session: Option<&GuestSession>,
        today: NaiveDate,
    ) -> Result<Reservation, BookingError> {
        let ticket = self.begin_submit(session, today)?;
        let result = api.create_reservation(&ticket.token, &ticket.request).await;

        if self.complete_submit(&ticket, result) == Completion::Discarded {
            return Err(BookingError::InvalidState("submit result was discarded"));
        }
        match &self.stage {
            BookingStage::Confirmed(reservation) => Ok(reservation.clone()),
            BookingStage::SubmitFailed { message } => Err(BookingError::Submit(message.clone())),
            _ => Err(BookingError::InvalidState("submission did not settle")),
        }
    }
}

fn edited_field(edit: &DraftEdit) -> Option<BookingField> {
    match edit {
        DraftEdit::CheckInDate(_) => Some(BookingField::CheckInDate),
        DraftEdit::CheckOutDate(_) => Some(BookingField::CheckOutDate),
        DraftEdit::GuestCount(_) => Some(BookingField::GuestCount),
        DraftEdit::GuestName(_) => Some(BookingField::GuestName),
        DraftEdit::GuestEmail(_) => Some(BookingField::GuestEmail),
        DraftEdit::GuestPhone(_) => Some(BookingField::GuestPhone),
        DraftEdit::SpecialRequests(_) => None,
    }
}

/// The backend's message verbatim, or the generic fallback.
pub fn submit_message(err: &ApiError) -> String {
    err.backend_message()
        .map(str::to_string)
        .unwrap_or_else(|| SUBMIT_ERROR_MESSAGE.to_string())
}
