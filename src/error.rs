//! Handler error types
//!
//! Failures a handler cannot recover from. The router turns every
//! `HandlerError` into a generic 500 response and logs the cause chain.

use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to list products")]
    Catalog(#[from] CatalogError),

    #[error("failed to serialize products")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to render response body")]
    Render(#[from] std::fmt::Error),
}
