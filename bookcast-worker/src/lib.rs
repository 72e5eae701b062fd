//! Podcast generation worker.
//!
//! Polls the podcasts table for queued jobs, claims them atomically, builds
//! a narration script from the book's catalog entry, synthesizes audio
//! through a [`tts::SpeechEngine`], and records the outcome on the row.

pub mod config;
pub mod orchestrator;
pub mod queue;
pub mod script;
pub mod tts;
