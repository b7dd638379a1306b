pub mod database;
pub mod environment;

pub use database::{init_db, run_migrations, DbPool};
pub use environment::{Config, ConfigError, Environment};
