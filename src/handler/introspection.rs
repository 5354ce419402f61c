//! Request introspection endpoint
//!
//! Echoes the request line, routing split, connection addresses and every
//! header back as an HTML list.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::context::RequestContext;
use crate::http::{self, escape_html};

/// Serve `GET {context}/cabeceras-request`
pub fn handle(ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_html_response(render(ctx), ctx.is_head())
}

/// Render the introspection page
pub fn render(ctx: &RequestContext) -> String {
    let properties = [
        ("Método HTTP", ctx.method.to_string()),
        ("Request URI", ctx.request_uri.clone()),
        ("Request URL", ctx.request_url()),
        ("Context Path", ctx.context_path.clone()),
        ("Servlet Path", ctx.servlet_path.clone()),
        ("IP local del servidor", ctx.local_ip()),
        ("Puerto local del servidor", ctx.local_port().to_string()),
        ("Esquema (scheme)", ctx.scheme().to_string()),
        (
            "Host (cabecera)",
            ctx.host_header().unwrap_or_default().into_owned(),
        ),
        ("URL construida 1", ctx.url_from_host_header()),
        ("URL construida 2", ctx.url_from_local_addr()),
        ("IP del cliente remoto", ctx.remote_ip()),
    ];

    let mut out = String::from(concat!(
        "<!DOCTYPE html>\n",
        "<html>\n",
        "<head>\n",
        "  <meta charset=\"utf-8\">\n",
        "  <title>Cabeceras Http Request</title>\n",
        "</head>\n",
        "<body>\n",
        "<h1>Cabeceras HTTP Request</h1>\n",
        "<ul>\n",
    ));

    for (label, value) in &properties {
        push_item(&mut out, label, value);
    }

    out.push_str("<li><strong>CABECERAS:</strong></li>\n");
    for (name, value) in ctx.header_pairs() {
        push_item(&mut out, name, &value);
    }

    out.push_str("</ul>\n</body>\n</html>\n");
    out
}

fn push_item(out: &mut String, label: &str, value: &str) {
    out.push_str("<li>");
    out.push_str(&escape_html(label));
    out.push_str(": ");
    out.push_str(&escape_html(value));
    out.push_str("</li>\n");
}
