use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::identity::Caller;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const AUTHORIZATION_TOKEN_ID_HEADER: &str = "x-authorization-token-id";

/// The caller as asserted by the gateway in front of this service.
///
/// The gateway authenticates the request and forwards the user and session
/// ids as headers; a request without them never reaches a handler.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Caller);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_headers(req.headers()).map(AuthenticatedUser))
    }
}

fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, AppError> {
    Ok(Caller {
        user_id: uuid_header(headers, USER_ID_HEADER)?,
        authorization_token_id: uuid_header(headers, AUTHORIZATION_TOKEN_ID_HEADER)?,
    })
}

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Uuid, AppError> {
    let value = headers
        .get(name)
        .ok_or_else(|| AppError::Unauthenticated(format!("missing {name} header")))?;
    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| AppError::Unauthenticated(format!("malformed {name} header")))
}
