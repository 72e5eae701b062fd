/// Configuration management for the worker
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `AUDIO_STORAGE_DIR`: Directory for generated audio (default: ./audio)
/// - `WORKER_POLL_INTERVAL_SECS`: Queue poll interval (default: 1)
/// - `WORKER_MAX_CONCURRENT_JOBS`: Concurrent generations (default: 4)
/// - `WORKER_CLAIM_BATCH_SIZE`: Jobs claimed per poll (default: 4)
/// - `TTS_COMMAND`: Speech synthesis binary (default: espeak-ng)
/// - `TTS_SPEECH_RATE`: Speech rate in words per minute (default: 160)
/// - `RUST_LOG`: Log level (default: info)

use crate::orchestrator::OrchestratorConfig;
use crate::tts::espeak::DEFAULT_SPEECH_RATE;
use std::env;
use std::path::PathBuf;

/// Complete worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Directory where audio artifacts are written
    pub audio_dir: PathBuf,

    /// Orchestrator loop tuning
    pub orchestrator: OrchestratorConfig,

    /// Speech synthesis binary
    pub tts_command: String,

    /// Speech rate in words per minute
    pub tts_speech_rate: u32,
}

impl WorkerConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or any numeric
    /// variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let audio_dir = env::var("AUDIO_STORAGE_DIR")
            .unwrap_or_else(|_| "./audio".to_string())
            .into();

        let defaults = OrchestratorConfig::default();

        let poll_interval_secs = env::var("WORKER_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| defaults.poll_interval_secs.to_string())
            .parse::<u64>()?;

        let max_concurrent_jobs = env::var("WORKER_MAX_CONCURRENT_JOBS")
            .unwrap_or_else(|_| defaults.max_concurrent_jobs.to_string())
            .parse::<usize>()?;

        if max_concurrent_jobs == 0 {
            anyhow::bail!("WORKER_MAX_CONCURRENT_JOBS must be at least 1");
        }

        let claim_batch_size = env::var("WORKER_CLAIM_BATCH_SIZE")
            .unwrap_or_else(|_| defaults.claim_batch_size.to_string())
            .parse::<usize>()?;

        let tts_command = env::var("TTS_COMMAND").unwrap_or_else(|_| "espeak-ng".to_string());

        let tts_speech_rate = env::var("TTS_SPEECH_RATE")
            .unwrap_or_else(|_| DEFAULT_SPEECH_RATE.to_string())
            .parse::<u32>()?;

        Ok(Self {
            database_url,
            max_connections,
            audio_dir,
            orchestrator: OrchestratorConfig {
                poll_interval_secs,
                max_concurrent_jobs,
                claim_batch_size,
            },
            tts_command,
            tts_speech_rate,
        })
    }
}
