use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

use super::{ApiError, AppState};
use crate::services::RateDecision;

/// Client address used as the limiter key.
///
/// `X-Forwarded-For` is only believed when the socket peer is a trusted
/// proxy; otherwise any client could pick its own key.
pub fn client_key(peer: Option<IpAddr>, headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = peer else {
        return "unknown".to_string();
    };

    if trusted_proxies.contains(&peer)
        && let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok())
    {
        return forwarded.to_string();
    }

    peer.to_string()
}

/// Fixed-window limit on login attempts per client.
pub async fn login_rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let key = client_key(peer, request.headers(), &state.shared.trusted_proxies);

    match state.login_limiter().check(&key).await {
        Ok(RateDecision::Allowed { .. }) => Ok(next.run(request).await),
        Ok(RateDecision::Limited { retry_after }) => {
            warn!(client = %key, "Rate limit exceeded for login");
            metrics::counter!("rate_limit_rejections_total", "route" => "login").increment(1);
            Err(ApiError::RateLimited {
                message: "Too many login attempts. Please try again later.".to_string(),
                retry_after_secs: retry_after.as_secs().max(1),
            })
        }
        Err(err) => {
            // Counter store unavailable: let the request through rather than
            // lock every user out.
            warn!(error = %err, "Rate limit store failed");
            Ok(next.run(request).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn untrusted_peer_ignores_forwarded_header() {
        let peer: IpAddr = "203.0.113.9".parse().unwrap();
        let key = client_key(Some(peer), &forwarded("198.51.100.1"), &[]);
        assert_eq!(key, "203.0.113.9");
    }

    #[test]
    fn trusted_proxy_forwards_first_hop() {
        let proxy: IpAddr = "10.0.0.1".parse().unwrap();
        let key = client_key(
            Some(proxy),
            &forwarded("198.51.100.1, 10.0.0.1"),
            &[proxy],
        );
        assert_eq!(key, "198.51.100.1");

        let garbage = client_key(Some(proxy), &forwarded("nonsense"), &[proxy]);
        assert_eq!(garbage, "10.0.0.1");
    }

    #[test]
    fn missing_peer_is_unknown() {
        assert_eq!(client_key(None, &HeaderMap::new(), &[]), "unknown");
    }
}
