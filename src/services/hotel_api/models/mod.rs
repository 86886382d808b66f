//! Wire shapes of the hotel backend and their decoding into the canonical
//! models. Backend payloads are loosely typed (numbers sent as strings, fields
//! that come and go), so every record passes through `TryFrom` here before
//! any booking logic sees it.

pub mod reservation;
pub mod room;
pub mod user;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{record}: missing required field '{field}'")]
    Missing {
        record: &'static str,
        field: &'static str,
    },
    #[error("{record}: field '{field}' is malformed ({reason})")]
    Malformed {
        record: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// Field location used in decode errors.
#[derive(Clone, Copy)]
pub(crate) struct Field {
    pub record: &'static str,
    pub name: &'static str,
}

impl Field {
    pub fn new(record: &'static str, name: &'static str) -> Self {
        Self { record, name }
    }

    fn missing(&self) -> DecodeError {
        DecodeError::Missing {
            record: self.record,
            field: self.name,
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::Malformed {
            record: self.record,
            field: self.name,
            reason: reason.into(),
        }
    }

    fn present<'a>(&self, value: &'a Option<Value>) -> Option<&'a Value> {
        match value {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    pub fn integer(&self, value: &Option<Value>) -> Result<i64, DecodeError> {
        self.optional_integer(value)?.ok_or_else(|| self.missing())
    }

    pub fn optional_integer(&self, value: &Option<Value>) -> Result<Option<i64>, DecodeError> {
        match self.present(value) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Ok(Some(i))
                } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                    Ok(Some(f as i64))
                } else {
                    Err(self.malformed(format!("expected an integer, got {}", n)))
                }
            }
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.malformed(format!("expected an integer, got '{}'", s))),
            Some(other) => Err(self.malformed(format!("expected an integer, got {}", other))),
        }
    }

    pub fn count(&self, value: &Option<Value>) -> Result<u32, DecodeError> {
        let n = self.integer(value)?;
        u32::try_from(n).map_err(|_| self.malformed(format!("expected a count, got {}", n)))
    }

    pub fn decimal(&self, value: &Option<Value>) -> Result<Decimal, DecodeError> {
        match self.present(value) {
            None => Err(self.missing()),
            Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map_err(|e| self.malformed(e.to_string())),
            Some(Value::String(s)) => {
                Decimal::from_str(s.trim()).map_err(|e| self.malformed(e.to_string()))
            }
            Some(other) => Err(self.malformed(format!("expected a decimal, got {}", other))),
        }
    }

    /// Integer or string, always returned as text.
    pub fn label(&self, value: &Option<Value>) -> Result<String, DecodeError> {
        match self.present(value) {
            None => Err(self.missing()),
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(self.malformed(format!("expected a label, got {}", other))),
        }
    }

    pub fn date(&self, value: &Option<Value>) -> Result<NaiveDate, DecodeError> {
        self.optional_date(value)?.ok_or_else(|| self.missing())
    }

    pub fn optional_date(&self, value: &Option<Value>) -> Result<Option<NaiveDate>, DecodeError> {
        match self.present(value) {
            None => Ok(None),
            Some(Value::String(s)) => {
                // Accept "2025-06-01" as well as "2025-06-01T00:00:00Z"
                let day = s.trim().get(..10).unwrap_or(s.trim());
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| self.malformed(format!("expected a date, got '{}'", s)))
            }
            Some(other) => Err(self.malformed(format!("expected a date, got {}", other))),
        }
    }
}

/// Text field where absence means empty.
pub(crate) fn text_or_empty(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELD: Field = Field {
        record: "room",
        name: "price_per_night",
    };

    #[test]
    fn test_decimal_accepts_string_and_number() {
        assert_eq!(
            FIELD.decimal(&Some(json!("120.50"))).unwrap(),
            Decimal::new(12050, 2)
        );
        assert_eq!(FIELD.decimal(&Some(json!(99))).unwrap(), Decimal::from(99));
        assert_eq!(
            FIELD.decimal(&Some(json!(89.9))).unwrap(),
            Decimal::new(899, 1)
        );
    }

    #[test]
    fn test_decimal_rejects_garbage() {
        assert_eq!(
            FIELD.decimal(&None),
            Err(DecodeError::Missing {
                record: "room",
                field: "price_per_night"
            })
        );
        assert_eq!(FIELD.decimal(&Some(Value::Null)), FIELD.decimal(&None));
        assert!(matches!(
            FIELD.decimal(&Some(json!("cheap"))),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_integer_and_label() {
        let field = Field::new("room", "room_number");
        assert_eq!(field.integer(&Some(json!("12"))).unwrap(), 12);
        assert_eq!(field.integer(&Some(json!(3.0))).unwrap(), 3);
        assert!(field.integer(&Some(json!(3.5))).is_err());
        assert_eq!(field.label(&Some(json!(101))).unwrap(), "101");
        assert_eq!(field.label(&Some(json!(" 2B "))).unwrap(), "2B");
        assert!(field.label(&Some(json!(""))).is_err());
        assert!(field.count(&Some(json!(-1))).is_err());
    }

    #[test]
    fn test_date_accepts_timestamp_prefix() {
        let field = Field::new("reservation", "check_in_date");
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(field.date(&Some(json!("2025-06-01"))).unwrap(), expected);
        assert_eq!(field.date(&Some(json!("2025-06-01T00:00:00Z"))).unwrap(), expected);
        assert!(field.date(&Some(json!("June 1st"))).is_err());
    }
}
