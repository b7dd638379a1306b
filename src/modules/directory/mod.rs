pub mod controller;
pub mod interface;
pub mod model;
pub mod query;
pub mod routes;
pub mod schema;
pub mod store;

pub use interface::DirectoryError;
pub use routes::{admin_directory_routes, directory_routes};
pub use store::DirectoryStore;
