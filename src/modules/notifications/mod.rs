pub mod controller;
pub mod model;
pub mod routes;
pub mod schema;
pub mod store;

pub use routes::notification_routes;
pub use store::NotificationStore;
