use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::models::room::RoomType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::CheckedIn => "checked-in",
            ReservationStatus::CheckedOut => "checked-out",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// "checked-in" becomes "Checked In".
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reservation status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ReservationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "checked-in" => Ok(ReservationStatus::CheckedIn),
            "checked-out" => Ok(ReservationStatus::CheckedOut),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_number: String,
    pub room_type: RoomType,
    pub price_per_night: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub guest_count: u32,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub nights: u32,
    pub room: Option<RoomSummary>,
}

/// Query for the signed-in guest's reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFilter {
    #[serde(default, deserialize_with = "deserialize_status_filter")]
    pub status: Option<ReservationStatus>,
    #[serde(default = "default_ordering")]
    pub ordering: String,
}

impl Default for ReservationFilter {
    fn default() -> Self {
        Self {
            status: None,
            ordering: default_ordering(),
        }
    }
}

impl ReservationFilter {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        params.push(("ordering", self.ordering.clone()));
        params
    }
}

fn default_ordering() -> String {
    "-check_in_date".to_string()
}

fn deserialize_status_filter<'de, D>(deserializer: D) -> Result<Option<ReservationStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(status) => status.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// How a client's in-memory state is brought up to date after a mutation.
/// The booking controller follows `CreateReservation`; clients holding a
/// reservation list follow `CancelReservation` through `ReservationBook`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPolicy {
    /// Drop the local list and request it again before showing it.
    Refetch,
    /// Patch the local list with the record the backend returned.
    ApplyDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateReservation,
    CancelReservation,
}

impl Mutation {
    pub fn policy(&self) -> MutationPolicy {
        match self {
            // Availability of every listed room may have changed
            Mutation::CreateReservation => MutationPolicy::Refetch,
            Mutation::CancelReservation => MutationPolicy::ApplyDelta,
        }
    }
}

/// Client-side copy of the guest's reservation list as last fetched. The
/// gateway is stateless and answers a cancel with the updated record only;
/// a client holding the list passes that record to `apply` instead of
/// fetching the list again.
#[derive(Debug, Clone, Default)]
pub struct ReservationBook {
    reservations: Vec<Reservation>,
}

impl ReservationBook {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Self { reservations }
    }

    pub fn all(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn with_status(&self, status: Option<ReservationStatus>) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect()
    }

    /// Replace the stored record with the same id. Returns false when the
    /// record is not part of this list.
    pub fn apply(&mut self, updated: Reservation) -> bool {
        match self.reservations.iter_mut().find(|r| r.id == updated.id) {
            Some(existing) => {
                *existing = updated;
                true
            }
            None => false,
        }
    }
}
