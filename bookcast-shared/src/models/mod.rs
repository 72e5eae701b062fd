//! Data models and their database operations.

pub mod book;
pub mod chat;
pub mod favorite;
pub mod podcast;
pub mod user;

pub use book::{Book, BookFilter};
pub use chat::ChatMessage;
pub use favorite::FavoriteBook;
pub use podcast::{Podcast, PodcastStatus};
pub use user::User;
