use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, Extensions, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Caller address and user agent, recorded on login attempts and audit rows.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Address resolved once per request by the rate limiter.
#[derive(Debug, Clone)]
pub struct ClientAddress(pub Option<String>);

impl ClientInfo {
    pub fn from_request(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let ip_address = match extensions.get::<ClientAddress>() {
            Some(ClientAddress(ip)) => ip.clone(),
            None => resolve_client_ip(headers, peer_address(extensions), false),
        };

        Self {
            ip_address,
            user_agent: headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.chars().take(512).collect()),
        }
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_request(&parts.headers, &parts.extensions))
    }
}

/// Socket address of the connection, present when served with connect info.
pub fn peer_address(extensions: &Extensions) -> Option<SocketAddr> {
    extensions.get::<ConnectInfo<SocketAddr>>().map(|info| info.0)
}

/// The peer address, unless the service sits behind a trusted proxy, in
/// which case the first `X-Forwarded-For` hop (then `X-Real-IP`) wins.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Option<String> {
    let forwarded = if trust_proxy { forwarded_ip(headers) } else { None };
    forwarded.or_else(|| peer.map(|addr| addr.ip().to_string()))
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}
