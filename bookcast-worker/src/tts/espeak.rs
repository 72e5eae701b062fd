//! espeak-ng speech engine.
//!
//! Shells out to the espeak-ng binary, feeding the script over stdin and
//! writing a WAV file with `-w`. The speech rate is words per minute and
//! matches the pacing assumption in the script generator.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{EngineError, SpeechEngine};

/// Default speech rate in words per minute
pub const DEFAULT_SPEECH_RATE: u32 = 160;

/// Text-to-speech via the espeak-ng subprocess
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    command: String,
    rate_wpm: u32,
}

impl EspeakEngine {
    pub fn new(command: impl Into<String>, rate_wpm: u32) -> Self {
        Self {
            command: command.into(),
            rate_wpm,
        }
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new("espeak-ng", DEFAULT_SPEECH_RATE)
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn extension(&self) -> &'static str {
        "wav"
    }

    async fn synthesize(&self, script: &str, output: &Path) -> Result<(), EngineError> {
        let mut child = Command::new(&self.command)
            .arg("-w")
            .arg(output)
            .arg("-s")
            .arg(self.rate_wpm.to_string())
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineError::Unavailable(format!("{} not found in PATH", self.command))
                } else {
                    EngineError::Io(e)
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes()).await?;
            // Closing stdin tells espeak-ng the script is complete
            drop(stdin);
        }

        let result = child.wait_with_output().await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(EngineError::Synthesis(format!(
                "{} exited with {}: {}",
                self.command,
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_config() {
        let engine = EspeakEngine::default();
        assert_eq!(engine.command, "espeak-ng");
        assert_eq!(engine.rate_wpm, DEFAULT_SPEECH_RATE);
        assert_eq!(engine.extension(), "wav");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let engine = EspeakEngine::new("definitely-not-a-real-tts-binary", 160);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.wav");

        let result = engine.synthesize("hello", &out).await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }
}
