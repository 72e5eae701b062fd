//! Speech synthesis engines.
//!
//! The orchestrator is generic over [`SpeechEngine`], with two
//! implementations: [`EspeakEngine`] shells out to espeak-ng for real
//! synthesis, and [`MockEngine`] writes a placeholder artifact for tests.

pub mod espeak;
pub mod mock;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use espeak::EspeakEngine;
pub use mock::MockEngine;

/// Speech synthesis error
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary is missing or cannot start
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but did not produce usable audio
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A text-to-speech backend
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Engine name for logging
    fn name(&self) -> &'static str;

    /// File extension of the produced artifact (e.g., "wav")
    fn extension(&self) -> &'static str;

    /// Synthesizes the script into an audio file at `output`.
    ///
    /// On error the output file may be absent or truncated; callers
    /// synthesize into a staging path and rename on success.
    async fn synthesize(&self, script: &str, output: &Path) -> Result<(), EngineError>;
}
