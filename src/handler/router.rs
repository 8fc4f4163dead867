//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::{AppState, HealthConfig};
use crate::context::{self, RequestContext};
use crate::handler::page;
use crate::http::{self, QueryParams};
use crate::logger::{self, AccessLogEntry};
use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCEPT_LANGUAGE, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Paths served by the index page
const INDEX_PATHS: [&str; 3] = ["/", "/index", "/index.html"];

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_str(&req, REFERER.as_str()).map(ToString::to_string);
    entry.user_agent = header_str(&req, USER_AGENT.as_str()).map(ToString::to_string);

    let mut response = dispatch(&req, &state, &mut entry);

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate the request, then route it
fn dispatch<B>(
    req: &Request<B>,
    state: &AppState,
    entry: &mut AccessLogEntry,
) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Route by path
    let path = req.uri().path();
    if let Some(resp) = route_health(path, &state.config.health) {
        return resp;
    }

    if !is_index_path(path) {
        return http::build_404_response();
    }

    // 4. Resolve user, locale and timezone before rendering
    let query = QueryParams::parse(req.uri().query());
    let ctx = context::before_request(
        &query,
        header_str(req, ACCEPT_LANGUAGE.as_str()),
        state,
        Utc::now(),
    );
    entry.locale = Some(ctx.locale.clone());
    entry.timezone = Some(ctx.timezone.clone());
    entry.user = ctx.user.map(|u| u.name.clone());

    serve_index(&ctx, *req.method() == Method::HEAD)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Health check endpoints
fn route_health(path: &str, health: &HealthConfig) -> Option<Response<Full<Bytes>>> {
    if !health.enabled {
        return None;
    }
    if path == health.liveness_path || path == health.readiness_path {
        return Some(http::build_health_response("ok"));
    }
    None
}

/// Index matches with or without a trailing slash
fn is_index_path(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    INDEX_PATHS.contains(&normalized)
}

fn serve_index(ctx: &RequestContext<'_>, is_head: bool) -> Response<Full<Bytes>> {
    let html = page::render_index(ctx);
    http::build_html_response(html, &ctx.locale, is_head)
}

fn header_str<'r, B>(req: &'r Request<B>, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn version_label(version: hyper::Version) -> &'static str {
    if version == hyper::Version::HTTP_10 {
        "1.0"
    } else if version == hyper::Version::HTTP_2 {
        "2"
    } else if version == hyper::Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::users::UserTable;
    use http_body_util::BodyExt;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(&test_config(), UserTable::seeded()))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn get(uri: &str, accept_language: Option<&str>) -> Response<Full<Bytes>> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(al) = accept_language {
            builder = builder.header("Accept-Language", al);
        }
        handle_request(builder.body(()).unwrap(), state(), peer())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_anonymous() {
        let resp = get("/", None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Language"], "en");
        assert_eq!(resp.headers()["Server"], "locale-server/test");
        let body = body_text(resp).await;
        assert!(body.contains("You are not logged in."));
        assert!(body.contains("Timezone: UTC"));
    }

    #[tokio::test]
    async fn test_index_logged_in() {
        let body = body_text(get("/?login_as=1", None).await).await;
        assert!(body.contains("You are logged in as Balou."));
        assert!(body.contains(r#"<html lang="fr">"#));
        assert!(body.contains("Timezone: Europe/Paris"));
    }

    #[tokio::test]
    async fn test_index_query_overrides() {
        let resp = get("/?login_as=2&locale=fr&timezone=Europe%2FParis", Some("en")).await;
        assert_eq!(resp.headers()["Content-Language"], "fr");
        let body = body_text(resp).await;
        assert!(body.contains("You are logged in as Beyonce."));
        assert!(body.contains("Timezone: Europe/Paris"));
    }

    #[tokio::test]
    async fn test_index_browser_preference() {
        let resp = get("/index.html?locale=xx", Some("de, fr;q=0.5")).await;
        assert_eq!(resp.headers()["Content-Language"], "fr");
    }

    #[tokio::test]
    async fn test_invalid_timezone_uses_default() {
        let body = body_text(get("/?login_as=3", None).await).await;
        assert!(body.contains("You are logged in as Spock."));
        assert!(body.contains("Timezone: UTC"));
        assert!(body.contains(r#"<html lang="en">"#));
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_ne!(resp.headers()["Content-Length"], "0");
        assert!(body_text(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_health_and_not_found() {
        assert_eq!(get("/healthz", None).await.status(), 200);
        assert_eq!(get("/readyz", None).await.status(), 200);
        assert_eq!(get("/missing", None).await.status(), 404);
    }

    #[tokio::test]
    async fn test_method_checks() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(resp.status(), 405);

        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/")
            .header("Content-Length", "4096")
            .body(())
            .unwrap();
        let resp = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[test]
    fn test_index_paths() {
        assert!(is_index_path("/"));
        assert!(is_index_path("//"));
        assert!(is_index_path("/index/"));
        assert!(is_index_path("/index.html"));
        assert!(!is_index_path("/indexes"));
    }
}
