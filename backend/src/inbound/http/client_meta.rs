//! Client request metadata: derived IP address and user agent.
//!
//! The IP is resolved through the forwarding-header priority chain used by
//! proxies and CDNs, falling back to the transport peer address and finally
//! the literal "unknown". Extraction is infallible.

use actix_web::http::header::USER_AGENT;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::ports::ClientInfo;
use crate::inbound::http::error::ApiError;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";
const CF_CONNECTING_IP: &str = "cf-connecting-ip";

/// Extracted request metadata for page-view recording.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded) = header_value(req, FORWARDED_FOR) {
        // The header may hold a chain; the first entry is the client.
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }
    if let Some(real_ip) = header_value(req, REAL_IP) {
        return real_ip;
    }
    if let Some(cf_ip) = header_value(req, CF_CONNECTING_IP) {
        return cf_ip;
    }
    req.peer_addr()
        .map_or_else(|| "unknown".to_owned(), |addr| addr.ip().to_string())
}

impl ClientMeta {
    /// Derive metadata from request headers and the peer address.
    pub fn from_http_request(req: &HttpRequest) -> Self {
        Self {
            ip_address: client_ip(req),
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
        }
    }
}

impl From<ClientMeta> for ClientInfo {
    fn from(value: ClientMeta) -> Self {
        Self {
            ip_address: value.ip_address,
            user_agent: value.user_agent,
        }
    }
}

impl FromRequest for ClientMeta {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_http_request(req)))
    }
}
