// Configuration module entry point
// Loads, validates and exposes the immutable application configuration

mod state;
mod types;

use std::net::SocketAddr;

use crate::i18n::{canonical_timezone, is_valid_timezone};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, I18nConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Default config file when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables such as
    /// `LOCALE_SERVER_SERVER__PORT` override it.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("LOCALE_SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "locale-server/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("i18n.languages", vec!["en", "fr"])?
            .set_default("i18n.default_locale", "en")?
            .set_default("i18n.default_timezone", "UTC")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        if let Some(name) = canonical_timezone(&cfg.i18n.default_timezone) {
            cfg.i18n.default_timezone = name.to_string();
        }
        Ok(cfg)
    }

    /// Reject settings the resolvers cannot honor
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let i18n = &self.i18n;
        if i18n.languages.is_empty() {
            return Err(invalid("i18n.languages must not be empty"));
        }
        if i18n.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(invalid("i18n.languages must not contain blank entries"));
        }
        if !i18n.languages.iter().any(|l| l.trim() == i18n.default_locale) {
            return Err(invalid(&format!(
                "i18n.default_locale '{}' is not one of {:?}",
                i18n.default_locale, i18n.languages
            )));
        }
        if !is_valid_timezone(&i18n.default_timezone) {
            return Err(invalid(&format!(
                "i18n.default_timezone '{}' is not a known timezone",
                i18n.default_timezone
            )));
        }
        if self.server.port == 0 {
            return Err(invalid("server.port must be non-zero"));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn invalid(message: &str) -> config::ConfigError {
    config::ConfigError::Message(message.to_string())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            workers: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        },
        http: HttpConfig {
            server_name: "locale-server/test".to_string(),
            enable_cors: false,
            max_body_size: 1024,
        },
        i18n: I18nConfig {
            languages: vec!["en".to_string(), "fr".to_string()],
            default_locale: "en".to_string(),
            default_timezone: "UTC".to_string(),
        },
        health: HealthConfig::default(),
    }
}
