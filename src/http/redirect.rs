//! HTTP to HTTPS redirect listener.
//!
//! Answers every plain HTTP request with a permanent redirect to the same
//! path on the HTTPS origin.

use std::net::SocketAddr;

use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::Redirect;
use axum::routing::any;
use axum::Router;

/// Spawn the redirect listener in the background.
pub fn spawn_redirect_server(http_port: u16, https_port: u16) {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], http_port));

        tracing::info!(http_port, https_port, "Starting HTTP->HTTPS redirect server");

        let app = Router::new().fallback(any(move |headers: HeaderMap, uri: Uri| async move {
            redirect_to_https(&headers, &uri, https_port)
        }));

        match axum_server::bind(addr).serve(app.into_make_service()).await {
            Ok(()) => tracing::debug!("HTTP redirect server stopped"),
            Err(e) => tracing::error!(error = %e, "HTTP redirect server failed"),
        }
    });
}

fn redirect_to_https(headers: &HeaderMap, uri: &Uri, https_port: u16) -> Result<Redirect, StatusCode> {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;

    let https_url = https_url(host, uri, https_port);
    tracing::debug!(from = %uri, to = %https_url, "Redirecting HTTP to HTTPS");

    Ok(Redirect::permanent(&https_url))
}

/// Host header without its port. Bracketed IPv6 literals keep their brackets.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

/// HTTPS URL for `uri` on `host`, replacing any port in the host header.
fn https_url(host: &str, uri: &Uri, https_port: u16) -> String {
    let host = strip_port(host);
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    if https_port == 443 {
        format!("https://{host}{path}")
    } else {
        format!("https://{host}:{https_port}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_omitted() {
        let uri: Uri = "/weatherforecast?x=1".parse().unwrap();
        assert_eq!(
            https_url("example.org:80", &uri, 443),
            "https://example.org/weatherforecast?x=1"
        );
    }

    #[test]
    fn test_custom_port_is_kept() {
        let uri: Uri = "/health".parse().unwrap();
        assert_eq!(
            https_url("example.org", &uri, 8443),
            "https://example.org:8443/health"
        );
    }

    #[test]
    fn test_ipv6_host_keeps_brackets() {
        let uri: Uri = "/health".parse().unwrap();
        assert_eq!(https_url("[::1]:8080", &uri, 8443), "https://[::1]:8443/health");
        assert_eq!(https_url("[::1]", &uri, 443), "https://[::1]/health");
    }

    #[test]
    fn test_missing_host_is_bad_request() {
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(
            redirect_to_https(&HeaderMap::new(), &uri, 443).err(),
            Some(StatusCode::BAD_REQUEST)
        );
    }
}
