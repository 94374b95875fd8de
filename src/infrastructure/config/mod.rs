use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub generative: GenerativeConfig,
    pub webhooks: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    pub research_url: String,
    pub creative_url: String,
    pub remix_url: String,
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Layered load: `brandscope.toml`, then `BRANDSCOPE_*` environment
    /// variables (`__` separating nesting, e.g. `BRANDSCOPE_DATABASE__URL`).
    pub fn load() -> Result<Self> {
        Figment::new()
            .merge(Toml::file("brandscope.toml"))
            .merge(Env::prefixed("BRANDSCOPE_").split("__"))
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_max_connections() -> u32 {
    5
}

fn default_generative_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_webhook_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_unspecified_sections() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [database]
            url = "postgres://localhost/brandscope"

            [generative]
            api_key = "test-key"

            [webhooks]
            research_url = "https://hooks.example.com/research"
            creative_url = "https://hooks.example.com/creative"
            remix_url = "https://hooks.example.com/remix"
            "#,
        ));

        let config: AppConfig = figment.extract().expect("minimal config should extract");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.generative.model, "gemini-2.0-flash");
        assert_eq!(config.webhooks.timeout_secs, 60);
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [database]
            url = "postgres://localhost/brandscope"
            "#,
        ));

        assert!(figment.extract::<AppConfig>().is_err());
    }
}
