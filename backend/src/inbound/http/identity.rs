//! Bearer-identity extractors for HTTP handlers.
//!
//! `RequiredIdentity` rejects with 401 when no usable token is presented;
//! `OptionalIdentity` degrades every failure to an anonymous caller. Both
//! resolve through [`IdentityResolver`], which consults the revocation set
//! before trusting a token.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, user::User};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

/// Extract the presented token from the `Authorization` header.
///
/// A `Bearer ` prefix is stripped when present; otherwise the raw header
/// value is treated as the token.
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}

fn state_of(req: &HttpRequest) -> Result<web::Data<HttpState>, ApiError> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| ApiError::from(Error::internal("HTTP state is not configured")))
}

/// The authenticated caller; extraction fails with 401 otherwise.
pub struct RequiredIdentity(pub User);

impl FromRequest for RequiredIdentity {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = state_of(req);
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state?;
            let token = token.ok_or_else(|| {
                ApiError::from(Error::unauthorized("Access denied. No token provided."))
            })?;
            let user = state
                .identity
                .authenticate(&token)
                .await
                .map_err(ApiError::from)?;
            Ok(Self(user))
        })
    }
}

/// The caller when a valid token was presented, anonymous otherwise.
pub struct OptionalIdentity(pub Option<User>);

impl FromRequest for OptionalIdentity {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = state_of(req);
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state?;
            let user = state.identity.maybe_authenticate(token.as_deref()).await;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_prefix_is_stripped() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bare_tokens_are_accepted_verbatim() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_yields_no_token() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
