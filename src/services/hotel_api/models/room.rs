use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::{text_or_empty, DecodeError, Field};
use crate::models::room::{Room, RoomType};

const RECORD: &str = "room";

/// Room as served by `GET /rooms/` and `GET /rooms/available/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomRecord {
    pub id: Option<Value>,
    pub room_number: Option<Value>,
    pub room_type: Option<String>,
    pub amenities: Option<String>,
    pub scenery: Option<String>,
    pub is_available: Option<bool>,
    pub price_per_night: Option<Value>,
    pub capacity: Option<Value>,
    pub maintenance: Option<bool>,
}

impl TryFrom<RoomRecord> for Room {
    type Error = DecodeError;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        let id = Field::new(RECORD, "id").integer(&record.id)?;
        let room_number = Field::new(RECORD, "room_number").label(&record.room_number)?;

        let price_field = Field::new(RECORD, "price_per_night");
        let price_per_night = price_field.decimal(&record.price_per_night)?;
        if price_per_night < Decimal::ZERO {
            return Err(DecodeError::Malformed {
                record: RECORD,
                field: "price_per_night",
                reason: format!("negative price {}", price_per_night),
            });
        }

        let capacity = Field::new(RECORD, "capacity").count(&record.capacity)?;
        if capacity == 0 {
            return Err(DecodeError::Malformed {
                record: RECORD,
                field: "capacity",
                reason: "capacity must be at least one guest".to_string(),
            });
        }

        let amenities = text_or_empty(record.amenities);
        let room_type = match record.room_type.as_deref().map(str::trim) {
            Some(kind) if !kind.is_empty() => RoomType::from_description(kind),
            _ => RoomType::from_description(&amenities),
        };

        let under_maintenance = record.maintenance.unwrap_or(false);
        let is_available = record.is_available.unwrap_or(true) && !under_maintenance;

        Ok(Room {
            id,
            room_number,
            room_type,
            price_per_night,
            capacity,
            is_available,
            amenities,
            scenery: text_or_empty(record.scenery),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Result<Room, DecodeError> {
        let record: RoomRecord = serde_json::from_value(value).unwrap();
        Room::try_from(record)
    }

    #[test]
    fn test_decode_backend_room() {
        let room = decode(json!({
            "id": 7,
            "room_number": 204,
            "room_type": "Deluxe double",
            "amenities": "Deluxe double",
            "scenery": "Sea view",
            "is_available": true,
            "price_per_night": "149.99",
            "capacity": 4,
            "maintenance": false
        }))
        .unwrap();

        assert_eq!(room.id, 7);
        assert_eq!(room.room_number, "204");
        assert_eq!(room.room_type, RoomType::Deluxe);
        assert_eq!(room.price_per_night, Decimal::new(14999, 2));
        assert_eq!(room.capacity, 4);
        assert!(room.is_available);
        assert_eq!(room.scenery, "Sea view");
    }

    #[test]
    fn test_decode_defaults() {
        let room = decode(json!({
            "id": 1,
            "room_number": "12",
            "price_per_night": 80,
            "capacity": 2
        }))
        .unwrap();

        assert!(room.is_available);
        assert_eq!(room.room_type, RoomType::Standard);
        assert_eq!(room.amenities, "");
    }

    #[test]
    fn test_maintenance_room_is_unavailable() {
        let room = decode(json!({
            "id": 1,
            "room_number": 3,
            "price_per_night": 80,
            "capacity": 2,
            "is_available": true,
            "maintenance": true
        }))
        .unwrap();

        assert!(!room.is_available);
    }

    #[test]
    fn test_decode_fails_on_missing_capacity() {
        let err = decode(json!({
            "id": 1,
            "room_number": 3,
            "price_per_night": "80.00"
        }))
        .unwrap_err();

        assert_eq!(
            err,
            DecodeError::Missing {
                record: "room",
                field: "capacity"
            }
        );
    }

    #[test]
    fn test_decode_fails_on_zero_capacity_or_negative_price() {
        assert!(decode(json!({
            "id": 1, "room_number": 3, "price_per_night": "80.00", "capacity": 0
        }))
        .is_err());
        assert!(decode(json!({
            "id": 1, "room_number": 3, "price_per_night": "-5", "capacity": 2
        }))
        .is_err());
    }
}
