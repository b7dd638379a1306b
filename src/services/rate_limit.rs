use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{future::Future, num::NonZeroU32, pin::Pin, sync::Arc};
use tower::{Layer, Service};

use crate::services::client_info::{peer_address, resolve_client_ip, ClientAddress};

/// Requests are keyed by client address. Without one (in-process callers
/// that bypass the listener) they share a bucket.
pub type ClientRateLimiter = Arc<DefaultKeyedRateLimiter<String>>;

const UNKNOWN_CLIENT: &str = "unknown";

pub fn create_rate_limiter(per_minute: u32, burst: u32) -> ClientRateLimiter {
    let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::per_minute(per_minute).allow_burst(burst);
    Arc::new(RateLimiter::keyed(quota))
}

/// Drops buckets that have fully refilled. Returns how many keys remain.
pub fn prune(limiter: &ClientRateLimiter) -> usize {
    limiter.retain_recent();
    limiter.shrink_to_fit();
    limiter.len()
}

#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: ClientRateLimiter,
    trust_proxy: bool,
}

impl RateLimitLayer {
    pub fn new(limiter: ClientRateLimiter, trust_proxy: bool) -> Self {
        Self { limiter, trust_proxy }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
            trust_proxy: self.trust_proxy,
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: ClientRateLimiter,
    trust_proxy: bool,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let mut inner = self.inner.clone();

        let ip = resolve_client_ip(request.headers(), peer_address(request.extensions()), self.trust_proxy);
        let key = ip.clone().unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
        request.extensions_mut().insert(ClientAddress(ip));

        Box::pin(async move {
            if limiter.check_key(&key).is_err() {
                tracing::warn!(client = %key, "rate limit exceeded");
                return Ok(StatusCode::TOO_MANY_REQUESTS.into_response());
            }
            inner.call(request).await
        })
    }
}
