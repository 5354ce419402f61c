//! Product listing and request introspection server
//!
//! Serves a product catalog as HTML, as a spreadsheet download or as JSON
//! (selected by path suffix), plus a page that echoes request metadata.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use catalog::{Product, ProductSource};
pub use config::{AppState, Config};
pub use error::HandlerError;
pub use server::Server;
