//! Database access: connection pool and migrations.

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{close_pool, create_pool, health_check, normalize_database_url, DatabaseConfig};
