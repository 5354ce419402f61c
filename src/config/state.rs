// Application state module
// Holds the immutable configuration and the injected collaborators

use std::sync::Arc;

use super::types::Config;
use crate::catalog::{ProductSource, StaticProductSource};

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    /// Normalized routing prefix (see `Config::context_path`)
    pub context_path: String,
    pub product_source: Arc<dyn ProductSource>,
}

impl AppState {
    /// Create `AppState` with the product source described by the configuration
    pub fn new(config: &Config) -> Self {
        let source = StaticProductSource::from_config(config.catalog.products.as_deref());
        Self::with_product_source(config, Arc::new(source))
    }

    /// Create `AppState` with an explicit product source
    pub fn with_product_source(config: &Config, product_source: Arc<dyn ProductSource>) -> Self {
        Self {
            config: config.clone(),
            context_path: config.context_path(),
            product_source,
        }
    }
}
