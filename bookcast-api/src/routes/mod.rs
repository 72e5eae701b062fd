/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check and service status endpoints
/// - `auth`: Authentication endpoints (register, login, logout, token)
/// - `profile`: Profile management and password change
/// - `books`: Read-only book catalog
/// - `podcasts`: Podcast generation and lifecycle
/// - `favorites`: Favorite books
/// - `chat`: Chat assistant and history

pub mod auth;
pub mod books;
pub mod chat;
pub mod favorites;
pub mod health;
pub mod podcasts;
pub mod profile;
