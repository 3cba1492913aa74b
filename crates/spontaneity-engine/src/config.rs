//! Engine configuration

use serde::Deserialize;
use spontaneity_llm::GenerationConfig;
use std::time::Duration;

/// Default per-attempt timeout (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the orchestration engine
///
/// Immutable after the engine is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Sampling parameters used when a request does not override them
    #[serde(default, rename = "generation")]
    pub default_config: GenerationConfig,

    /// Continue with the next adapter after a failure
    ///
    /// When false, the first failure ends the request.
    #[serde(default = "default_enable_fallback")]
    pub enable_fallback: bool,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_enable_fallback() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_config: GenerationConfig {
                temperature: Some(0.8),
                max_tokens: Some(1024),
                top_p: Some(1.0),
            },
            enable_fallback: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Set the per-attempt timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Enable or disable fallback
    pub fn with_fallback(mut self, enable_fallback: bool) -> Self {
        self.enable_fallback = enable_fallback;
        self
    }

    /// Per-attempt timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.enable_fallback);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default().with_timeout_ms(50).with_fallback(false);
        assert_eq!(config.timeout(), Duration::from_millis(50));
        assert!(!config.enable_fallback);
    }

    #[test]
    fn test_parse_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            enable_fallback = false
            timeout_ms = 5000

            [generation]
            temperature = 0.3
            max_tokens = 256
            "#,
        )
        .unwrap();

        assert!(!config.enable_fallback);
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.default_config.temperature, Some(0.3));
        assert_eq!(config.default_config.max_tokens, Some(256));
        assert_eq!(config.default_config.top_p, None);
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert!(config.enable_fallback);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
