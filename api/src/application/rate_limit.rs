use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;

use super::http::server::{api_entities::api_error::ApiError, app_state::AppState};
use crate::args::RateLimitArgs;

pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

/// Key used when neither the socket address nor a forwarding header is known
const SHARED_CLIENT_KEY: &str = "unknown";

pub fn build_rate_limiter(args: &RateLimitArgs) -> Arc<ClientRateLimiter> {
    let per_minute = NonZeroU32::new(args.per_minute).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(args.burst).unwrap_or(per_minute);

    Arc::new(RateLimiter::keyed(
        Quota::per_minute(per_minute).allow_burst(burst),
    ))
}

/// Identify the caller: socket address first, then the first X-Forwarded-For hop
fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|hop| hop.trim().to_string())
        .filter(|hop| !hop.is_empty())
        .unwrap_or_else(|| SHARED_CLIENT_KEY.to_string())
}

pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&req);

    if state.rate_limiter.check_key(&key).is_err() {
        warn!(client = %key, "Rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};

    #[test]
    fn test_client_key_prefers_connect_info() {
        let mut req = http::Request::builder()
            .header("x-forwarded-for", "10.0.0.9")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 4], 5000))));

        assert_eq!(client_key(&req), "192.168.1.4");
    }

    #[test]
    fn test_client_key_falls_back_to_forwarded_for() {
        let req = http::Request::builder()
            .header("x-forwarded-for", " 203.0.113.7 , 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn test_client_key_shared_when_unknown() {
        let req = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&req), SHARED_CLIENT_KEY);
    }

    #[test]
    fn test_limiter_enforces_burst() {
        let limiter = build_rate_limiter(&RateLimitArgs {
            per_minute: 1,
            burst: 2,
        });
        let key = "198.51.100.1".to_string();

        assert!(limiter.check_key(&key).is_ok());
        assert!(limiter.check_key(&key).is_ok());
        assert!(limiter.check_key(&key).is_err());
        assert!(limiter.check_key(&"198.51.100.2".to_string()).is_ok());
    }
}
