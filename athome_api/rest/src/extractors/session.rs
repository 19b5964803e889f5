use std::convert::Infallible;

use athome_models::session::SessionId;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "athome_session";

/// Anonymous session of the visitor, identified by a cookie.
///
/// A fresh session is started if the cookie is missing or malformed. Using
/// the session as part of the response sets the cookie for new sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub new: bool,
}

#[async_trait]
impl<S: Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<SessionId>().ok());

        Ok(match id {
            Some(id) => Self { id, new: false },
            None => Self {
                id: Uuid::new_v4().into(),
                new: true,
            },
        })
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.new {
            return Ok(res);
        }

        let cookie = Cookie::build((SESSION_COOKIE, self.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        CookieJar::new().add(cookie).into_response_parts(res)
    }
}
