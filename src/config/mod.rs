// Configuration module entry point
// Loads application configuration and builds the shared runtime state

mod state;
mod types;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, FileFormat};
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    CatalogConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; `SERVER_<SECTION>__<KEY>` environment variables override it
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::with_defaults(builder)?.build()?.try_deserialize()
    }

    /// Load configuration from an in-memory TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder =
            config::Config::builder().add_source(config::File::from_str(toml, FileFormat::Toml));

        Self::with_defaults(builder)?.build()?.try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.context_path", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "productos/0.1")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Routing prefix with a leading slash and no trailing slash ("" for root)
    pub fn context_path(&self) -> String {
        normalize_context_path(&self.server.context_path)
    }
}

/// Normalize a mount point: "app/" -> "/app", "/" -> ""
pub fn normalize_context_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
