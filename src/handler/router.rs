//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: strips the routing prefix,
//! matches the endpoint, checks the method, dispatches, and writes the
//! access log line.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::time::Instant;

use super::context::{ConnectionInfo, RequestContext};
use super::{introspection, products};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

pub const REQUEST_HEADERS_PATH: &str = "/cabeceras-request";
pub const PRODUCT_PATHS: [&str; 3] = ["/productos.html", "/productos.xls", "/productos.json"];

/// Endpoints served inside the routing prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    RequestHeaders,
    Products,
}

impl Endpoint {
    pub fn resolve(servlet_path: &str) -> Option<Self> {
        if servlet_path == REQUEST_HEADERS_PATH {
            Some(Self::RequestHeaders)
        } else if PRODUCT_PATHS.contains(&servlet_path) {
            Some(Self::Products)
        } else {
            None
        }
    }
}

/// Main entry point for HTTP request handling
pub fn handle_request<B>(
    req: &Request<B>,
    state: &AppState,
    conn: ConnectionInfo,
) -> Response<Full<Bytes>> {
    let started = Instant::now();

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let mut response = route_request(req, state, conn);
    http::set_server_header(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let entry = access_entry(req, conn, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    response
}

/// Route request based on path and method
pub fn route_request<B>(
    req: &Request<B>,
    state: &AppState,
    conn: ConnectionInfo,
) -> Response<Full<Bytes>> {
    let Some(ctx) = RequestContext::from_request(req, conn, &state.context_path) else {
        return http::build_404_response();
    };

    let Some(endpoint) = Endpoint::resolve(&ctx.servlet_path) else {
        return http::build_404_response();
    };

    if !matches!(ctx.method, Method::GET | Method::HEAD) {
        logger::log_warning(&format!(
            "Method not allowed: {} {}",
            ctx.method, ctx.request_uri
        ));
        return http::build_405_response();
    }

    match endpoint {
        Endpoint::RequestHeaders => introspection::handle(&ctx),
        Endpoint::Products => products::handle(&ctx, state.product_source.as_ref())
            .unwrap_or_else(|err| {
                logger::log_handler_failure(ctx.method.as_str(), &ctx.request_uri, &err);
                http::build_500_response()
            }),
    }
}

fn access_entry<B>(
    req: &Request<B>,
    conn: ConnectionInfo,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        conn.remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version());
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_default();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

/// "HTTP/1.1" -> "1.1"
fn version_label(version: hyper::Version) -> String {
    format!("{version:?}").trim_start_matches("HTTP/").to_string()
}
