//! Error types for the engine

use crate::AttemptRecord;
use spontaneity_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while running the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// User input was empty or whitespace
    #[error("Invalid input: user input must not be empty")]
    InvalidInput,

    /// Engine was built without adapters
    #[error("No model adapters configured")]
    NoAdapters,

    /// A single provider call failed
    #[error("Adapter {adapter} failed: {source}")]
    Adapter {
        /// Adapter display name
        adapter: String,
        /// Underlying provider error
        #[source]
        source: LlmError,
    },

    /// A single provider call did not settle in time
    #[error("Adapter {adapter} timed out after {timeout_ms}ms")]
    Timeout {
        /// Adapter display name
        adapter: String,
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// No adapter produced a result
    #[error("All adapters exhausted after {count} attempt(s); last error: {last_error}")]
    AllAdaptersExhausted {
        /// Number of adapters tried
        count: usize,
        /// Per-attempt log
        attempts: Vec<AttemptRecord>,
        /// Failure of the final attempt
        last_error: Box<EngineError>,
    },
}

impl EngineError {
    /// True for failures caused by the caller rather than the providers
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::InvalidInput)
    }
}
