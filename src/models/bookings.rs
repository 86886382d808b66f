use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{room::Room, search::SearchCriteria, user::GuestIdentity};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuestContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl GuestContact {
    pub fn from_identity(identity: &GuestIdentity) -> Self {
        Self {
            name: identity.full_name(),
            email: identity.email.clone(),
            phone: identity.phone.clone().unwrap_or_default(),
        }
    }
}

/// An in-progress booking, alive between "select room" and a confirmed
/// submission. Dates are kept as entered so half-typed input survives edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub room: Room,
    #[serde(default)]
    pub check_in_date: String,
    #[serde(default)]
    pub check_out_date: String,
    pub guest_count: i32,
    #[serde(default)]
    pub contact: GuestContact,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub criteria: SearchCriteria,
}

impl BookingDraft {
    pub fn from_selection(
        room: Room,
        criteria: &SearchCriteria,
        identity: Option<&GuestIdentity>,
    ) -> Self {
        Self {
            room,
            check_in_date: format_date(criteria.check_in),
            check_out_date: format_date(criteria.check_out),
            guest_count: criteria.guest_count.max(1),
            contact: identity.map(GuestContact::from_identity).unwrap_or_default(),
            special_requests: String::new(),
            criteria: criteria.clone(),
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::CheckInDate(value) => self.check_in_date = value,
            DraftEdit::CheckOutDate(value) => self.check_out_date = value,
            DraftEdit::GuestCount(value) => self.guest_count = value,
            DraftEdit::GuestName(value) => self.contact.name = value,
            DraftEdit::GuestEmail(value) => self.contact.email = value,
            DraftEdit::GuestPhone(value) => self.contact.phone = value,
            DraftEdit::SpecialRequests(value) => self.special_requests = value,
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// A single form field change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DraftEdit {
    CheckInDate(String),
    CheckOutDate(String),
    GuestCount(i32),
    GuestName(String),
    GuestEmail(String),
    GuestPhone(String),
    SpecialRequests(String),
}

/// Reservation creation payload in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReservationRequest {
    pub check_in_date: NaiveDate,
    pub number_of_guests: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub duration: u32,
    pub hour: u8,
    pub room_id: i64,
}
