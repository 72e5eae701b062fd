//! Shared library for the Bookcast workspace.
//!
//! Contains everything the API server and the generation worker have in
//! common: database pool and migrations, the data models (users, books,
//! podcasts, favorites, chat), authentication primitives, and the audio
//! artifact store.

pub mod auth;
pub mod db;
pub mod models;
pub mod storage;
