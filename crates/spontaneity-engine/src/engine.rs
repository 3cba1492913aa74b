//! Ordered-fallback orchestration over model adapters

use crate::{build_prompt, EngineConfig, EngineError};
use spontaneity_llm::{GenerationConfig, ModelAdapter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one adapter attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Adapter returned text
    Succeeded,
    /// Adapter returned an error
    Failed(String),
    /// Timer won the race
    TimedOut,
}

/// Log entry for one adapter attempt within a request
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    /// Adapter display name
    pub adapter: String,
    /// How the attempt ended
    pub outcome: AttemptOutcome,
    /// Time spent on the attempt
    pub elapsed: Duration,
}

/// Successful engine invocation
#[derive(Debug, Clone)]
pub struct EngineRun {
    /// Raw provider text
    pub text: String,
    /// Name of the adapter that produced `text`
    pub adapter_used: String,
    /// Every attempt made, in order; the last one succeeded
    pub attempts: Vec<AttemptRecord>,
    /// Total time across all attempts
    pub elapsed: Duration,
}

/// Holds the prioritized adapter list and runs requests against it
///
/// Stateless between requests: a failed adapter is tried again on the next
/// request.
pub struct SpontaneityEngine {
    adapters: Vec<Arc<dyn ModelAdapter>>,
    config: EngineConfig,
}

impl SpontaneityEngine {
    /// Create an engine; list order is priority order
    pub fn new(adapters: Vec<Arc<dyn ModelAdapter>>, config: EngineConfig) -> Self {
        Self { adapters, config }
    }

    /// Number of configured adapters
    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Adapter display names in priority order
    pub fn adapter_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a recommendation and return only the text
    pub async fn run_engine(&self, user_input: &str) -> Result<String, EngineError> {
        self.run(user_input).await.map(|run| run.text)
    }

    /// Generate a recommendation with the default sampling parameters
    pub async fn run(&self, user_input: &str) -> Result<EngineRun, EngineError> {
        self.run_with_config(user_input, None).await
    }

    /// Generate a recommendation, letting `overrides` replace default sampling parameters
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`] if the input is empty or whitespace
    /// - [`EngineError::NoAdapters`] if no adapters are configured
    /// - [`EngineError::AllAdaptersExhausted`] if no attempt succeeded
    pub async fn run_with_config(
        &self,
        user_input: &str,
        overrides: Option<&GenerationConfig>,
    ) -> Result<EngineRun, EngineError> {
        if user_input.trim().is_empty() {
            return Err(EngineError::InvalidInput);
        }
        if self.adapters.is_empty() {
            return Err(EngineError::NoAdapters);
        }

        let prompt = build_prompt(user_input);
        let config = match overrides {
            Some(overrides) => overrides.or(&self.config.default_config),
            None => self.config.default_config,
        };
        let timeout = self.config.timeout();
        let started = Instant::now();
        let mut attempts = Vec::with_capacity(self.adapters.len());
        let mut last_error = None;

        debug!(
            input_len = user_input.len(),
            adapters = self.adapters.len(),
            "Running engine"
        );

        for adapter in &self.adapters {
            let name = adapter.name().to_string();
            let attempt_start = Instant::now();

            // Dropping the losing future aborts the provider call
            let result =
                tokio::time::timeout(timeout, adapter.generate_recommendation(&prompt, &config)).await;
            let elapsed = attempt_start.elapsed();

            let error = match result {
                Ok(Ok(text)) => {
                    info!(adapter = %name, elapsed_ms = elapsed.as_millis() as u64, "Adapter succeeded");
                    attempts.push(AttemptRecord {
                        adapter: name.clone(),
                        outcome: AttemptOutcome::Succeeded,
                        elapsed,
                    });
                    return Ok(EngineRun {
                        text,
                        adapter_used: name,
                        attempts,
                        elapsed: started.elapsed(),
                    });
                }
                Ok(Err(source)) => EngineError::Adapter {
                    adapter: name.clone(),
                    source,
                },
                Err(_) => EngineError::Timeout {
                    adapter: name.clone(),
                    timeout_ms: self.config.timeout_ms,
                },
            };

            warn!(adapter = %name, error = %error, "Adapter attempt failed");
            attempts.push(AttemptRecord {
                adapter: name,
                outcome: match &error {
                    EngineError::Timeout { .. } => AttemptOutcome::TimedOut,
                    other => AttemptOutcome::Failed(other.to_string()),
                },
                elapsed,
            });
            last_error = Some(error);

            if !self.config.enable_fallback {
                break;
            }
        }

        let last_error = last_error.ok_or(EngineError::NoAdapters)?;
        Err(EngineError::AllAdaptersExhausted {
            count: attempts.len(),
            attempts,
            last_error: Box::new(last_error),
        })
    }
}
