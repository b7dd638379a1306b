pub mod controller;
pub mod guard;
pub mod model;
pub mod routes;
pub mod store;

pub use routes::settings_routes;
pub use store::SettingsStore;
