//! Mock speech engine for tests.

use async_trait::async_trait;
use std::path::Path;

use super::{EngineError, SpeechEngine};

/// Test engine that writes the script bytes as a placeholder artifact,
/// or fails with a configured message.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    fail_with: Option<String>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine that always fails with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl SpeechEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn extension(&self) -> &'static str {
        "wav"
    }

    async fn synthesize(&self, script: &str, output: &Path) -> Result<(), EngineError> {
        if let Some(message) = &self.fail_with {
            return Err(EngineError::Synthesis(message.clone()));
        }

        tokio::fs::write(output, script.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("podcast.wav");

        MockEngine::new()
            .synthesize("a short script", &out)
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&out).await.unwrap();
        assert_eq!(written, "a short script");
    }

    #[tokio::test]
    async fn test_failing_mock_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("podcast.wav");

        let result = MockEngine::failing("boom").synthesize("script", &out).await;

        assert!(matches!(result, Err(EngineError::Synthesis(_))));
        assert!(!out.exists());
    }
}
