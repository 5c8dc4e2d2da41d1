// Configuration module entry point
// Loads the optional config.toml and provides typed access to all settings

mod types;

use std::net::SocketAddr;

pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StaticConfig};

impl Config {
    /// Load configuration from the default "config.toml" in the working
    /// directory. A missing file yields the built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("static.root", "public")?
            .set_default("static.index_files", vec!["index.html".to_string()])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
