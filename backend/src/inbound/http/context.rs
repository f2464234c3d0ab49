//! Per-request actor resolution.
//!
//! [`RequestContext`] is extracted from the `Authorization` header
//! (`Token <key>` or `Bearer <key>`). A request without credentials is
//! anonymous; a request whose token is unknown fails with 401 even on
//! public routes, so clients notice a revoked token immediately.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, AuthToken, Error, UserId};
use crate::inbound::http::state::HttpState;

const SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Identity of the caller for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    actor: Option<Actor>,
    token: Option<AuthToken>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(actor: Actor, token: AuthToken) -> Self {
        Self {
            actor: Some(actor),
            token: Some(token),
        }
    }

    /// The caller's user id, or `None` for anonymous requests.
    pub fn viewer(&self) -> Option<UserId> {
        self.actor.as_ref().map(|actor| actor.user_id)
    }

    /// Require an authenticated caller or return `401 Unauthorized`.
    pub fn require_actor(&self) -> Result<&Actor, Error> {
        self.actor
            .as_ref()
            .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))
    }

    /// The token presented with this request, if authenticated.
    pub fn require_token(&self) -> Result<&AuthToken, Error> {
        self.token
            .as_ref()
            .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))
    }
}

/// Pull the token key out of the `Authorization` header.
///
/// Headers using another scheme are ignored; a recognised scheme with no
/// key is an error.
pub(crate) fn presented_token(headers: &HeaderMap) -> Result<Option<AuthToken>, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("invalid token header"))?;
    let mut parts = value.split_whitespace();
    let Some(scheme) = parts.next() else {
        return Ok(None);
    };
    if !SCHEMES.iter().any(|known| known.eq_ignore_ascii_case(scheme)) {
        return Ok(None);
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(Some(AuthToken::from_presented(key))),
        (None, _) => Err(Error::unauthorized(
            "invalid token header: no credentials provided",
        )),
        (Some(_), Some(_)) => Err(Error::unauthorized(
            "invalid token header: token string should not contain spaces",
        )),
    }
}

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token? else {
                return Ok(Self::anonymous());
            };
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let actor = state.login.authenticate(&token).await?;
            Ok(Self::authenticated(actor, token))
        })
    }
}
