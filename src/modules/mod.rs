pub mod admin;
pub mod analysis;
pub mod audit;
pub mod auth;
pub mod directory;
pub mod imports;
pub mod metrics;
pub mod notifications;
pub mod seed;
pub mod settings;
