//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, JWT secret,
//! the ordered provider list, engine tuning, feature flags and audit retention.

use serde::Deserialize;
use spontaneity_audit::RetentionConfig;
use spontaneity_engine::EngineConfig;
use spontaneity_llm::{openai, MockAdapter, ModelAdapter, OllamaAdapter, OpenAiAdapter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A field is present but out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A provider's API key variable is not set
    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// JWT secret for signing tokens
    pub jwt_secret: String,

    /// Token expiry in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,

    /// SQLite path for the audit log (default: in-memory)
    #[serde(default = "default_audit_db_path")]
    pub audit_db_path: String,

    /// Orchestration engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Providers in priority order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Optional pipeline stages
    #[serde(default)]
    pub features: FeatureFlags,

    /// Audit retention
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// One entry of `[[providers]]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// OpenAI-compatible chat completions endpoint
    Openai {
        /// Display name (default: "openai:{model}")
        name: Option<String>,
        /// Base URL (default: api.openai.com)
        endpoint: Option<String>,
        /// Model identifier
        model: Option<String>,
        /// Environment variable holding the API key
        api_key_env: String,
    },

    /// Local Ollama server
    Ollama {
        /// Display name (default: "ollama:{model}")
        name: Option<String>,
        /// Base URL (default: localhost:11434)
        endpoint: Option<String>,
        /// Model identifier
        model: String,
    },

    /// Canned provider for demos and tests
    Mock {
        /// Display name
        name: String,
        /// Text returned on every call
        response: Option<String>,
        /// When set, every call fails with this message
        error: Option<String>,
        /// Artificial latency
        #[serde(default)]
        delay_ms: u64,
    },
}

/// Toggles for the optional pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeatureFlags {
    /// Moderation, trust metadata and why-now text
    #[serde(default = "default_true")]
    pub trust_layer: bool,

    /// Append an audit event per recommendation
    #[serde(default = "default_true")]
    pub audit_logging: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            trust_layer: true,
            audit_logging: true,
        }
    }
}

/// Default token expiry: 1 hour
fn default_token_expiry() -> u64 {
    3600
}

fn default_audit_db_path() -> String {
    ":memory:".to_string()
}

fn default_true() -> bool {
    true
}

/// Response of the development mock provider
pub const SAMPLE_RECOMMENDATION: &str = r#"{"title":"Sunset walk along the river","description":"Take an easy walk along the riverside trail and catch the sunset from the pedestrian bridge.","location":"Riverside trail","duration":"1 hour","category":"outdoors"}"#;

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;

        // Validate required fields
        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingField("jwt_secret".to_string()));
        }

        config
            .retention
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[retention] {}", e)))?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            jwt_secret: "test-secret-key-do-not-use-in-production".to_string(),
            token_expiry_secs: 3600,
            audit_db_path: default_audit_db_path(),
            engine: EngineConfig::default(),
            providers: vec![ProviderConfig::Mock {
                name: "mock".to_string(),
                response: Some(SAMPLE_RECOMMENDATION.to_string()),
                error: None,
                delay_ms: 0,
            }],
            features: FeatureFlags::default(),
            retention: RetentionConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

impl ProviderConfig {
    /// Construct the adapter, reading API keys from the environment
    pub fn build(&self) -> Result<Arc<dyn ModelAdapter>, ConfigError> {
        let adapter: Arc<dyn ModelAdapter> = match self {
            ProviderConfig::Openai {
                name,
                endpoint,
                model,
                api_key_env,
            } => {
                let api_key = std::env::var(api_key_env)
                    .map_err(|_| ConfigError::MissingEnv(api_key_env.clone()))?;
                let adapter = OpenAiAdapter::new(
                    endpoint.as_deref().unwrap_or(openai::DEFAULT_ENDPOINT),
                    model.as_deref().unwrap_or(openai::DEFAULT_MODEL),
                    api_key,
                );
                match name {
                    Some(name) => Arc::new(adapter.with_name(name.clone())),
                    None => Arc::new(adapter),
                }
            }
            ProviderConfig::Ollama {
                name,
                endpoint,
                model,
            } => {
                let adapter = match endpoint {
                    Some(endpoint) => OllamaAdapter::new(endpoint.clone(), model.clone()),
                    None => OllamaAdapter::default_endpoint(model.clone()),
                };
                match name {
                    Some(name) => Arc::new(adapter.with_name(name.clone())),
                    None => Arc::new(adapter),
                }
            }
            ProviderConfig::Mock {
                name,
                response,
                error,
                delay_ms,
            } => {
                let adapter = match (error, response) {
                    (Some(message), _) => MockAdapter::failing(name.clone(), message.clone()),
                    (None, Some(response)) => MockAdapter::new(name.clone(), response.clone()),
                    (None, None) => MockAdapter::new(name.clone(), SAMPLE_RECOMMENDATION),
                };
                Arc::new(adapter.with_delay(Duration::from_millis(*delay_ms)))
            }
        };
        Ok(adapter)
    }
}

/// Build every configured adapter, preserving priority order
pub fn build_adapters(providers: &[ProviderConfig]) -> Result<Vec<Arc<dyn ModelAdapter>>, ConfigError> {
    providers.iter().map(ProviderConfig::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.token_expiry_secs, 3600);
        assert_eq!(config.audit_db_path, ":memory:");
        assert_eq!(config.providers.len(), 1);
        assert!(config.features.trust_layer);
        assert!(config.retention.dry_run);
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            jwt_secret = "my-secret"
            token_expiry_secs = 7200
            audit_db_path = "/var/lib/spontaneity/audit.db"

            [engine]
            enable_fallback = false
            timeout_ms = 5000

            [engine.generation]
            temperature = 0.5
            max_tokens = 256

            [[providers]]
            kind = "openai"
            model = "gpt-4o"
            api_key_env = "OPENAI_API_KEY"

            [[providers]]
            kind = "ollama"
            name = "local"
            model = "llama3"

            [[providers]]
            kind = "mock"
            name = "canned"
            response = "{}"
            delay_ms = 25

            [features]
            audit_logging = false

            [retention]
            retention_days = 30
            dry_run = false
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.token_expiry_secs, 7200);
        assert!(!config.engine.enable_fallback);
        assert_eq!(config.engine.timeout_ms, 5000);
        assert_eq!(config.engine.default_config.temperature, Some(0.5));
        assert_eq!(config.engine.default_config.max_tokens, Some(256));
        assert_eq!(config.providers.len(), 3);
        assert!(matches!(
            &config.providers[1],
            ProviderConfig::Ollama { name: Some(name), .. } if name == "local"
        ));
        assert!(matches!(
            &config.providers[2],
            ProviderConfig::Mock { delay_ms: 25, .. }
        ));
        assert!(config.features.trust_layer);
        assert!(!config.features.audit_logging);
        assert_eq!(config.retention.retention_days, 30);
        assert_eq!(config.retention.sweep_interval_minutes, 60);
        assert!(!config.retention.dry_run);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            jwt_secret = ""
        "#;

        let result = ServerConfig::from_toml(toml);
        assert!(matches!(result, Err(ConfigError::MissingField(field)) if field == "jwt_secret"));
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            jwt_secret = "secret"

            [retention]
            sweep_interval_minutes = 0
        "#;

        let result = ServerConfig::from_toml(toml);
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("sweep_interval_minutes")));
    }

    #[test]
    fn test_out_of_range_retention_rejected() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            jwt_secret = "secret"

            [retention]
            retention_days = 4000000000
            sweep_interval_minutes = 9000000000
        "#;

        assert!(matches!(ServerConfig::from_toml(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_provider_kind_rejected() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            jwt_secret = "secret"

            [[providers]]
            kind = "carrier-pigeon"
            name = "coo"
        "#;

        assert!(matches!(ServerConfig::from_toml(toml), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_build_adapters_preserves_order() {
        let providers = vec![
            ProviderConfig::Mock {
                name: "first".to_string(),
                response: None,
                error: Some("down".to_string()),
                delay_ms: 0,
            },
            ProviderConfig::Ollama {
                name: None,
                endpoint: None,
                model: "llama3".to_string(),
            },
        ];

        let adapters = build_adapters(&providers).unwrap();
        let names: Vec<&str> = adapters.iter().map(|adapter| adapter.name()).collect();
        assert_eq!(names, vec!["first", "ollama:llama3"]);
    }

    #[test]
    fn test_missing_api_key_env() {
        let provider = ProviderConfig::Openai {
            name: None,
            endpoint: None,
            model: None,
            api_key_env: "SPONTANEITY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        };

        assert!(matches!(provider.build(), Err(ConfigError::MissingEnv(var)) if var.ends_with("NEVER_SET")));
    }
}
