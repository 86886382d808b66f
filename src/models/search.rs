use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::room::{RoomType, UnknownRoomType};

/// Room type requested by a search. "all" disables the type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoomTypeFilter {
    #[default]
    All,
    Only(RoomType),
}

impl RoomTypeFilter {
    pub fn matches(&self, room_type: RoomType) -> bool {
        match self {
            RoomTypeFilter::All => true,
            RoomTypeFilter::Only(wanted) => *wanted == room_type,
        }
    }

    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            RoomTypeFilter::All => None,
            RoomTypeFilter::Only(room_type) => Some(room_type.as_str()),
        }
    }
}

impl TryFrom<String> for RoomTypeFilter {
    type Error = UnknownRoomType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(RoomTypeFilter::All);
        }
        trimmed.parse().map(RoomTypeFilter::Only)
    }
}

impl From<RoomTypeFilter> for String {
    fn from(filter: RoomTypeFilter) -> Self {
        filter.as_param().unwrap_or("all").to_string()
    }
}

fn default_guest_count() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default = "default_guest_count")]
    pub guest_count: i32,
    #[serde(default)]
    pub room_type: RoomTypeFilter,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            guest_count: default_guest_count(),
            room_type: RoomTypeFilter::All,
            min_price: None,
            max_price: None,
        }
    }
}

impl SearchCriteria {
    /// Guest count used for capacity filtering; anything below one means one.
    pub fn effective_guest_count(&self) -> u32 {
        self.guest_count.max(1) as u32
    }

    /// Both stay dates, only when check-out is strictly after check-in.
    pub fn stay_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) if check_out > check_in => {
                Some((check_in, check_out))
            }
            _ => None,
        }
    }

    /// False when both dates are present but out of order.
    pub fn has_valid_date_range(&self) -> bool {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => check_out > check_in,
            _ => true,
        }
    }

    pub fn to_query(&self) -> RoomQuery {
        let (check_in, check_out) = match self.stay_dates() {
            Some((check_in, check_out)) => (Some(check_in), Some(check_out)),
            None => (None, None),
        };

        RoomQuery {
            check_in,
            check_out,
            room_type: self.room_type,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// Parameters of the backend room listing call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomQuery {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub room_type: RoomTypeFilter,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl RoomQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(room_type) = self.room_type.as_param() {
            params.push(("room_type", room_type.to_string()));
        }
        if let Some(min_price) = self.min_price {
            params.push(("min_price", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            params.push(("max_price", max_price.to_string()));
        }
        // The backend only honours the date window when both ends are sent
        if let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out) {
            params.push(("check_in", check_in.format("%Y-%m-%d").to_string()));
            params.push(("check_out", check_out.format("%Y-%m-%d").to_string()));
        }

        params
    }
}
