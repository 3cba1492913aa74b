//! Spontaneity Engine
//!
//! Orchestrates recommendation generation across an ordered list of model
//! adapters.
//!
//! The engine:
//! - Rejects empty input before any provider is called
//! - Wraps the input in a fixed prompt template
//! - Tries adapters in priority order, each raced against a timeout
//! - Returns the first success; no further adapters are called
//! - Falls back to the next adapter on failure when fallback is enabled
//!
//! Timeouts are per attempt. Worst-case latency is the sum of the timeouts
//! of every adapter that fails.
//!
//! # Examples
//!
//! ```no_run
//! use spontaneity_engine::{EngineConfig, SpontaneityEngine};
//! use spontaneity_llm::MockAdapter;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), spontaneity_engine::EngineError> {
//! let engine = SpontaneityEngine::new(
//!     vec![Arc::new(MockAdapter::new("mock", "{}"))],
//!     EngineConfig::default(),
//! );
//! let text = engine.run_engine("Vibe: chill, Location: Denver").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod prompt;


pub use config::{EngineConfig, DEFAULT_TIMEOUT_MS};
pub use engine::{AttemptOutcome, AttemptRecord, EngineRun, SpontaneityEngine};
pub use error::EngineError;
pub use prompt::build_prompt;
