//! # Bookcast API Server Library
//!
//! This library provides the core functionality for the Bookcast API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `responder`: Keyword-matching chat assistant
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod responder;
pub mod routes;
