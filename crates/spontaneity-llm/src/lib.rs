//! Spontaneity Model Adapter Layer
//!
//! Every generative-AI provider sits behind the [`ModelAdapter`] trait so the
//! engine can try them in priority order without knowing which is which.
//!
//! # Adapters
//!
//! - `OpenAiAdapter`: OpenAI-compatible chat completions API
//! - `OllamaAdapter`: Local Ollama API integration
//! - `MockAdapter`: Deterministic mock for testing
//!
//! Adapters fail on any non-2xx response or malformed payload. They never
//! substitute placeholder text; that is the caller's job.
//!
//! # Examples
//!
//! ```
//! use spontaneity_llm::{GenerationConfig, MockAdapter, ModelAdapter};
//!
//! # tokio_test::block_on(async {
//! let adapter = MockAdapter::new("mock", r#"{"title":"Sunset hike"}"#);
//! let text = adapter
//!     .generate_recommendation("prompt", &GenerationConfig::default())
//!     .await
//!     .unwrap();
//! assert_eq!(text, r#"{"title":"Sunset hike"}"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;

/// Errors that can occur during a provider call
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Sampling parameters passed through to the provider
///
/// Accepts both `max_tokens` and the `maxTokens` spelling used by the web client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[serde(default, alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling mass
    #[serde(default, alias = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl GenerationConfig {
    /// Fill unset fields from `defaults`
    pub fn or(self, defaults: &GenerationConfig) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature.or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            top_p: self.top_p.or(defaults.top_p),
        }
    }
}

/// Uniform wrapper around one generative-AI provider
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Display name, reported as `adapterUsed` and recorded as the model version
    fn name(&self) -> &str;

    /// Generate recommendation text for a prompt
    ///
    /// Dropping the returned future aborts the in-flight request.
    async fn generate_recommendation(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, LlmError>;
}

/// Map a non-success HTTP status to an error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String, model: &str) -> LlmError {
    match status {
        reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

/// Mock adapter for deterministic testing
///
/// Returns a fixed response (or a fixed failure) after an optional delay,
/// without any network calls. Clones share their counters.
#[derive(Debug, Clone)]
pub struct MockAdapter {
    name: String,
    response: Result<String, String>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    completions: Arc<AtomicUsize>,
}

impl MockAdapter {
    /// Mock that always succeeds with `response`
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: Ok(response.into()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            completions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that always fails with `message`
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            ..Self::new(name, "")
        }
    }

    /// Wait this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times generation was started
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls that ran to completion (were not cancelled)
    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_recommendation(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.completions.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(LlmError::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter_response() {
        let adapter = MockAdapter::new("mock", "Test response");
        let result = adapter
            .generate_recommendation("any prompt", &GenerationConfig::default())
            .await;
        assert_eq!(result.unwrap(), "Test response");
        assert_eq!(adapter.name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_adapter_failure() {
        let adapter = MockAdapter::failing("broken", "boom");
        let result = adapter
            .generate_recommendation("prompt", &GenerationConfig::default())
            .await;
        assert!(matches!(result, Err(LlmError::Other(ref msg)) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_mock_adapter_counts_shared_between_clones() {
        let first = MockAdapter::new("mock", "ok");
        let second = first.clone();

        first
            .generate_recommendation("p", &GenerationConfig::default())
            .await
            .unwrap();

        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
        assert_eq!(second.completion_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_adapter_cancelled_call_never_completes() {
        let adapter = MockAdapter::new("slow", "late").with_delay(Duration::from_millis(200));
        let config = GenerationConfig::default();

        let result = tokio::time::timeout(
            Duration::from_millis(10),
            adapter.generate_recommendation("p", &config),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(adapter.call_count(), 1);
        assert_eq!(adapter.completion_count(), 0);
    }

    #[test]
    fn test_generation_config_aliases() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"temperature":0.7,"maxTokens":512,"topP":0.9}"#).unwrap();
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.top_p, Some(0.9));
    }

    #[test]
    fn test_generation_config_or() {
        let defaults = GenerationConfig {
            temperature: Some(0.8),
            max_tokens: Some(1024),
            top_p: Some(1.0),
        };
        let request = GenerationConfig {
            temperature: Some(0.2),
            ..GenerationConfig::default()
        };
        let merged = request.or(&defaults);
        assert_eq!(merged.temperature, Some(0.2));
        assert_eq!(merged.max_tokens, Some(1024));
        assert_eq!(merged.top_p, Some(1.0));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(reqwest::StatusCode::NOT_FOUND, String::new(), "m"),
            LlmError::ModelNotAvailable(ref m) if m == "m"
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new(), "m"),
            LlmError::RateLimitExceeded
        ));
        assert!(matches!(
            status_error(reqwest::StatusCode::BAD_GATEWAY, "upstream".to_string(), "m"),
            LlmError::Communication(_)
        ));
    }
}
