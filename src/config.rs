use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(skip_serializing)]
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// WhatsApp Cloud API settings.
///
/// `verify_token` is the shared secret echoed back during webhook
/// registration; `token` is the bearer token for outbound sends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhatsAppConfig {
    pub api_base: String,
    pub phone_number_id: String,
    #[serde(skip_serializing)]
    pub token: SecretString,
    pub verify_token: String,
    pub send_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `CHOPLINE__` prefix and `__` separator
            // e.g., CHOPLINE__DATABASE__USER="my_user"
            .add_source(
                config::Environment::with_prefix("CHOPLINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Constructs the database connection string.
    pub fn connection_string(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database
        ))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: "password".to_string().into(),
            host: "localhost".to_string(),
            port: 5432,
            database: "chopline".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base: "https://graph.facebook.com/v18.0".to_string(),
            phone_number_id: String::new(),
            token: String::new().into(),
            verify_token: "change-me".to_string(),
            send_timeout_secs: 10,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use serde to serialize to pretty JSON
        // Secrets are automatically skipped due to #[serde(skip_serializing)]
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = Config::default();
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.server.port, 3000);
        assert!(config.whatsapp.api_base.starts_with("https://"));
    }

    #[test]
    fn display_skips_secrets() {
        let config = Config::default();
        let rendered = config.to_string();
        assert!(!rendered.contains("password"));
        assert!(!rendered.contains("\"token\""));
    }
}
