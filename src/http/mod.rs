//! HTTP protocol layer module
//!
//! Response builders, content types and HTML escaping shared by the handlers.

pub mod escape;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use escape::escape_html;
pub use response::{
    build_404_response, build_405_response, build_500_response, build_content_response,
    build_html_response, set_server_header,
};
