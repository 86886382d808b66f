use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, http::header::AUTHORIZATION, Error, FromRequest,
    HttpRequest,
};

use crate::models::user::GuestSession;

/// Bearer token of the calling guest. The gateway does not verify it; the
/// hotel backend does when the token is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedGuest {
    pub token: String,
}

impl AuthenticatedGuest {
    pub fn session(&self) -> GuestSession {
        GuestSession::new(self.token.clone())
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl FromRequest for AuthenticatedGuest {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match bearer_token(req) {
            Some(token) => ready(Ok(AuthenticatedGuest { token })),
            None => ready(Err(ErrorUnauthorized("No authorization header"))),
        }
    }
}
