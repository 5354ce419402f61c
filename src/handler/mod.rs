//! Request handler module
//!
//! Request routing plus the two application endpoints: the product listing
//! and the request introspection page.

pub mod context;
pub mod introspection;
pub mod products;
pub mod router;

// Re-export main entry point
pub use context::{ConnectionInfo, RequestContext};
pub use products::OutputFormat;
pub use router::handle_request;
