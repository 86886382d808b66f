use serde::Deserialize;
use serde_json::Value;

use super::{text_or_empty, DecodeError, Field};
use crate::models::reservation::{Reservation, ReservationStatus, RoomSummary};
use crate::models::room::RoomType;
use crate::services::stay_service;

const RECORD: &str = "reservation";

#[derive(Debug, Clone, Deserialize)]
pub struct RoomDetailsRecord {
    pub room_number: Option<Value>,
    pub room_type: Option<String>,
    pub amenities: Option<String>,
    pub price_per_night: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationRecord {
    pub id: Option<Value>,
    pub check_in_date: Option<Value>,
    pub check_out_date: Option<Value>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub number_of_guests: Option<Value>,
    pub total_price: Option<Value>,
    pub status: Option<String>,
    pub number_of_nights: Option<Value>,
    pub room_details: Option<RoomDetailsRecord>,
}

/// `GET /reservations/my_reservations/` answers with either a bare list or a
/// paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReservationListPayload {
    Page { results: Vec<ReservationRecord> },
    Plain(Vec<ReservationRecord>),
}

impl ReservationListPayload {
    pub fn into_records(self) -> Vec<ReservationRecord> {
        match self {
            ReservationListPayload::Page { results } => results,
            ReservationListPayload::Plain(records) => records,
        }
    }
}

impl TryFrom<RoomDetailsRecord> for RoomSummary {
    type Error = DecodeError;

    fn try_from(record: RoomDetailsRecord) -> Result<Self, Self::Error> {
        let kind = record
            .room_type
            .or(record.amenities)
            .unwrap_or_default();

        Ok(RoomSummary {
            room_number: Field::new("room_details", "room_number").label(&record.room_number)?,
            room_type: RoomType::from_description(&kind),
            price_per_night: Field::new("room_details", "price_per_night")
                .decimal(&record.price_per_night)?,
        })
    }
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = DecodeError;

    fn try_from(record: ReservationRecord) -> Result<Self, Self::Error> {
        let id = Field::new(RECORD, "id").integer(&record.id)?;
        let check_in_date = Field::new(RECORD, "check_in_date").date(&record.check_in_date)?;
        let check_out_date =
            Field::new(RECORD, "check_out_date").optional_date(&record.check_out_date)?;
        let guest_count = Field::new(RECORD, "number_of_guests").count(&record.number_of_guests)?;
        let total_price = Field::new(RECORD, "total_price").decimal(&record.total_price)?;

        let status = match record.status.as_deref() {
            Some(raw) => raw.parse::<ReservationStatus>().map_err(|e| {
                DecodeError::Malformed {
                    record: RECORD,
                    field: "status",
                    reason: e.to_string(),
                }
            })?,
            None => {
                return Err(DecodeError::Missing {
                    record: RECORD,
                    field: "status",
                })
            }
        };

        let nights = match Field::new(RECORD, "number_of_nights")
            .optional_integer(&record.number_of_nights)?
        {
            Some(n) => n.max(0) as u32,
            None => check_out_date
                .map(|out| stay_service::nights_between_dates(check_in_date, out))
                .unwrap_or(0),
        };

        let room = record.room_details.map(RoomSummary::try_from).transpose()?;

        Ok(Reservation {
            id,
            check_in_date,
            check_out_date,
            guest_name: text_or_empty(record.guest_name),
            guest_email: text_or_empty(record.guest_email),
            guest_phone: text_or_empty(record.guest_phone),
            guest_count,
            total_price,
            status,
            nights,
            room,
        })
    }
}
