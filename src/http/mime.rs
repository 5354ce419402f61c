//! MIME type mapping module
//!
//! Content types served by the application, keyed by file extension.

pub const TEXT_HTML: &str = "text/html;charset=UTF-8";
pub const APPLICATION_JSON: &str = "application/json;charset=UTF-8";
pub const MS_EXCEL: &str = "application/vnd.ms-excel";
pub const TEXT_PLAIN: &str = "text/plain;charset=UTF-8";

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use productos::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("xls")), "application/vnd.ms-excel");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html" | "htm") => TEXT_HTML,
        Some("json") => APPLICATION_JSON,
        Some("xls") => MS_EXCEL,
        Some("txt") => TEXT_PLAIN,
        _ => "application/octet-stream",
    }
}
