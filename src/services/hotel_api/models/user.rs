use serde::Deserialize;
use serde_json::Value;

use super::{text_or_empty, DecodeError, Field};
use crate::models::user::GuestIdentity;

const RECORD: &str = "user";

/// `GET /auth/me/` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl TryFrom<UserRecord> for GuestIdentity {
    type Error = DecodeError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let id = Field::new(RECORD, "id").integer(&record.id)?;
        let email = match record.email.map(|e| e.trim().to_string()) {
            Some(email) if !email.is_empty() => email,
            _ => {
                return Err(DecodeError::Missing {
                    record: RECORD,
                    field: "email",
                })
            }
        };

        Ok(GuestIdentity {
            id,
            first_name: text_or_empty(record.name),
            last_name: text_or_empty(record.surname),
            email,
            phone: record.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            role: record
                .role
                .map(|r| r.trim().to_uppercase())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "GUEST".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_current_user() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": 5,
            "name": "John",
            "surname": "Doe",
            "email": "john@example.com",
            "role": null
        }))
        .unwrap();

        let identity = GuestIdentity::try_from(record).unwrap();
        assert_eq!(identity.full_name(), "John Doe");
        assert_eq!(identity.role, "GUEST");
        assert_eq!(identity.phone, None);
    }

    #[test]
    fn test_decode_requires_email() {
        let record: UserRecord =
            serde_json::from_value(json!({"id": 5, "name": "John", "email": ""})).unwrap();
        assert!(GuestIdentity::try_from(record).is_err());
    }
}
