use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Executive,
    Presidential,
}

impl RoomType {
    pub const ALL: [RoomType; 5] = [
        RoomType::Standard,
        RoomType::Deluxe,
        RoomType::Suite,
        RoomType::Executive,
        RoomType::Presidential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "standard",
            RoomType::Deluxe => "deluxe",
            RoomType::Suite => "suite",
            RoomType::Executive => "executive",
            RoomType::Presidential => "presidential",
        }
    }

    /// Derive a room type from free text such as "Deluxe room, sea view".
    ///
    /// The backend only stores an amenities string, so the most specific
    /// keyword wins and anything unrecognised is a standard room.
    pub fn from_description(text: &str) -> RoomType {
        let text = text.to_lowercase();
        [
            RoomType::Presidential,
            RoomType::Executive,
            RoomType::Suite,
            RoomType::Deluxe,
        ]
        .into_iter()
        .find(|room_type| text.contains(room_type.as_str()))
        .unwrap_or(RoomType::Standard)
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room type '{0}'")]
pub struct UnknownRoomType(pub String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        RoomType::ALL
            .into_iter()
            .find(|room_type| room_type.as_str() == wanted)
            .ok_or_else(|| UnknownRoomType(s.to_string()))
    }
}

/// A bookable room as seen by the client. Read-only within a search session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub room_type: RoomType,
    pub price_per_night: Decimal,
    pub capacity: u32,
    pub is_available: bool,
    #[serde(default)]
    pub amenities: String,
    #[serde(default)]
    pub scenery: String,
}
