use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::{bookings::BookingDraft, room::Room};
use crate::services::stay_service::{parse_stay_date, parse_stay_instant};

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 10;

/// Booking form fields, named as the form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    CheckInDate,
    CheckOutDate,
    GuestCount,
    GuestName,
    GuestEmail,
    GuestPhone,
}

impl BookingField {
    pub const ALL: [BookingField; 6] = [
        BookingField::CheckInDate,
        BookingField::CheckOutDate,
        BookingField::GuestCount,
        BookingField::GuestName,
        BookingField::GuestEmail,
        BookingField::GuestPhone,
    ];
}

/// Field to message map. Empty means the draft may be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<BookingField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: BookingField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: BookingField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop one field's message, leaving the others alone.
    pub fn clear(&mut self, field: BookingField) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BookingField, &String)> {
        self.0.iter()
    }

    /// The first message, in form order.
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: ValidationErrors,
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

pub struct BookingValidator;

impl BookingValidator {
    /// Check every field of `draft` against `room`. `today` is the caller's
    /// local calendar date.
    pub fn validate(draft: &BookingDraft, room: &Room, today: NaiveDate) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for field in BookingField::ALL {
            if let Some(message) = Self::validate_field(field, draft, room, today) {
                errors.insert(field, message);
            }
        }
        errors
    }

    pub fn validate_field(
        field: BookingField,
        draft: &BookingDraft,
        room: &Room,
        today: NaiveDate,
    ) -> Option<String> {
        match field {
            BookingField::CheckInDate => Self::check_in_date(&draft.check_in_date, today),
            BookingField::CheckOutDate => {
                Self::check_out_date(&draft.check_in_date, &draft.check_out_date)
            }
            BookingField::GuestCount => Self::guest_count(draft.guest_count, room),
            BookingField::GuestName => Self::guest_name(&draft.contact.name),
            BookingField::GuestEmail => Self::guest_email(&draft.contact.email),
            BookingField::GuestPhone => Self::guest_phone(&draft.contact.phone),
        }
    }

    fn check_in_date(check_in: &str, today: NaiveDate) -> Option<String> {
        if check_in.trim().is_empty() {
            return Some("Check-in date is required".to_string());
        }
        match parse_stay_date(check_in) {
            None => Some("Please enter a valid check-in date".to_string()),
            Some(date) if date < today => {
                Some("Check-in date cannot be in the past".to_string())
            }
            Some(_) => None,
        }
    }

    fn check_out_date(check_in: &str, check_out: &str) -> Option<String> {
        if check_out.trim().is_empty() {
            return Some("Check-out date is required".to_string());
        }
        let Some(check_out) = parse_stay_instant(check_out) else {
            return Some("Please enter a valid check-out date".to_string());
        };
        // Ordering is only checked against a usable check-in; a bad check-in
        // is reported on its own field
        match parse_stay_instant(check_in) {
            Some(check_in) if check_out <= check_in => {
                Some("Check-out date must be after check-in date".to_string())
            }
            _ => None,
        }
    }

    fn guest_count(guest_count: i32, room: &Room) -> Option<String> {
        if guest_count < 1 {
            Some("At least 1 guest is required".to_string())
        } else if guest_count as u32 > room.capacity {
            Some(format!(
                "Maximum {} guests allowed for this room",
                room.capacity
            ))
        } else {
            None
        }
    }

    fn guest_name(name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            Some("Guest name is required".to_string())
        } else if name.chars().count() < MIN_NAME_LEN {
            Some("Please enter a valid name".to_string())
        } else {
            None
        }
    }

    fn guest_email(email: &str) -> Option<String> {
        if email.is_empty() {
            Some("Email address is required".to_string())
        } else if !EMAIL_SHAPE.is_match(email) {
            Some("Please enter a valid email address".to_string())
        } else {
            None
        }
    }

    fn guest_phone(phone: &str) -> Option<String> {
        let phone = phone.trim();
        if phone.is_empty() {
            Some("Phone number is required".to_string())
        } else if phone.chars().count() < MIN_PHONE_LEN {
            Some("Please enter a valid phone number".to_string())
        } else {
            None
        }
    }
}
