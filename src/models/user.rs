use serde::{Deserialize, Serialize};

/// The signed-in guest, used to prefill booking contact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestIdentity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
}

impl GuestIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A caller's session: the bearer token forwarded to the backend and, when
/// already resolved, who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestSession {
    pub token: String,
    pub identity: Option<GuestIdentity>,
}

impl GuestSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            identity: None,
        }
    }

    pub fn with_identity(token: impl Into<String>, identity: GuestIdentity) -> Self {
        Self {
            token: token.into(),
            identity: Some(identity),
        }
    }
}
