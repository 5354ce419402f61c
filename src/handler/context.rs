//! Request context
//!
//! A read-only snapshot of an inbound call: request line, routing split,
//! connection addresses and headers.

use hyper::header::HOST;
use hyper::{HeaderMap, Method, Request};
use std::borrow::Cow;
use std::net::SocketAddr;

/// Addresses of the connection a request arrived on
#[derive(Debug, Clone, Copy)]
pub struct ConnectionInfo {
    pub local_addr: SocketAddr,
    pub remote_addr: SocketAddr,
    pub scheme: &'static str,
}

impl ConnectionInfo {
    pub const fn http(local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            remote_addr,
            scheme: "http",
        }
    }
}

/// Snapshot of a request routed inside the application
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Request path without query string
    pub request_uri: String,
    pub query: Option<String>,
    /// Routing prefix the application is mounted on ("" for root)
    pub context_path: String,
    /// Endpoint path inside the application
    pub servlet_path: String,
    pub headers: HeaderMap,
    pub conn: ConnectionInfo,
}

impl RequestContext {
    /// Build the context for a request, or `None` when its path lies outside
    /// the application's routing prefix
    pub fn from_request<B>(req: &Request<B>, conn: ConnectionInfo, context_path: &str) -> Option<Self> {
        let path = req.uri().path();
        let servlet_path = split_context_path(path, context_path)?;

        Some(Self {
            method: req.method().clone(),
            request_uri: path.to_string(),
            query: req.uri().query().map(ToString::to_string),
            context_path: context_path.to_string(),
            servlet_path: servlet_path.to_string(),
            headers: req.headers().clone(),
            conn,
        })
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    pub const fn scheme(&self) -> &'static str {
        self.conn.scheme
    }

    /// First value of a header, lossily decoded
    pub fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }

    pub fn host_header(&self) -> Option<Cow<'_, str>> {
        self.header(HOST.as_str())
    }

    /// Every distinct header name with its first value, in header-map order
    pub fn header_pairs(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.headers.keys().map(|name| {
            let value = self
                .headers
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()))
                .unwrap_or_default();
            (name.as_str(), value)
        })
    }

    pub fn local_ip(&self) -> String {
        self.conn.local_addr.ip().to_string()
    }

    pub const fn local_port(&self) -> u16 {
        self.conn.local_addr.port()
    }

    pub fn remote_ip(&self) -> String {
        self.conn.remote_addr.ip().to_string()
    }

    /// Full request URL: the `Host` header names the authority, falling back
    /// to the local address when absent
    pub fn request_url(&self) -> String {
        let authority = self
            .host_header()
            .map_or_else(|| self.conn.local_addr.to_string(), Cow::into_owned);
        format!("{}://{authority}{}", self.scheme(), self.request_uri)
    }

    /// `scheme://{Host}{context}{servlet}`; a missing `Host` leaves the
    /// authority empty
    pub fn url_from_host_header(&self) -> String {
        format!(
            "{}://{}{}{}",
            self.scheme(),
            self.host_header().unwrap_or_default(),
            self.context_path,
            self.servlet_path
        )
    }

    /// `scheme://{local addr}:{local port}{context}{servlet}`
    pub fn url_from_local_addr(&self) -> String {
        format!(
            "{}://{}{}{}",
            self.scheme(),
            self.conn.local_addr,
            self.context_path,
            self.servlet_path
        )
    }
}

/// Strip the routing prefix from a request path
///
/// The prefix must end on a segment boundary: "/app" matches "/app/x" and
/// "/app" but not "/apples".
pub fn split_context_path<'a>(path: &'a str, context_path: &str) -> Option<&'a str> {
    if context_path.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(context_path)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
