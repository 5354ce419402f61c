//! Product catalog module
//!
//! Defines the product record, the `ProductSource` collaborator consumed by the
//! listing handler, and the in-memory source used by the server.

mod price;

pub use price::format_price;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single product record
///
/// Field names on the wire (JSON keys, config keys) follow the deployed service:
/// `id`, `nombre`, `tipo`, `precio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "precio")]
    pub price: f64,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, kind: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            price,
        }
    }
}

/// Errors raised by a product source
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the current, ordered list of products
///
/// Called once per listing request. Implementations must return products in
/// the order they should be displayed.
pub trait ProductSource: Send + Sync {
    fn list_all(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Product source backed by a fixed list
#[derive(Debug, Clone)]
pub struct StaticProductSource {
    products: Vec<Product>,
}

impl StaticProductSource {
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Source seeded from configuration, falling back to the built-in catalog
    pub fn from_config(products: Option<&[Product]>) -> Self {
        products.map_or_else(Self::default, |p| Self::new(p.to_vec()))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for StaticProductSource {
    fn default() -> Self {
        Self::new(default_products())
    }
}

impl ProductSource for StaticProductSource {
    fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

/// Built-in catalog served when no products are configured
pub fn default_products() -> Vec<Product> {
    vec![
        Product::new(1, "notebook", "computacion", 175_000.0),
        Product::new(2, "mesa escritorio", "oficina", 100_000.0),
        Product::new(3, "teclado mecanico", "computacion", 40_000.0),
    ]
}
