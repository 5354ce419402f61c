//! HTTP response building module
//!
//! Builders for the responses the server produces. Builders never panic: a
//! failed build is logged and replaced by an empty response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

use super::mime::{TEXT_HTML, TEXT_PLAIN};

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_plain_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert("Allow", HeaderValue::from_static("GET, HEAD"));
    resp
}

/// Build 500 Internal Server Error response
///
/// The body is deliberately generic; details go to the error log.
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

fn build_plain_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(body.as_bytes())))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    build_content_response(content.into(), TEXT_HTML, None, is_head)
}

/// Build 200 response with the given content type
///
/// When `attachment` is set a `Content-Disposition` header asks the client to
/// save the body under that file name. `Content-Length` always reflects the
/// full body, also for HEAD requests.
pub fn build_content_response(
    data: Bytes,
    content_type: &str,
    attachment: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(filename) = attachment {
        builder = builder.header(CONTENT_DISPOSITION, format!("attachment; filename={filename}"));
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Stamp the `Server` header on an outgoing response
pub fn set_server_header(resp: &mut Response<Full<Bytes>>, server_name: &str) {
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            resp.headers_mut().insert(SERVER, value);
        }
        Err(e) => log_build_error("Server header", &e),
    }
}

/// Log response build error
fn log_build_error(what: &str, error: &dyn std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {what} response: {error}"));
}
