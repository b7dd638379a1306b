pub mod controller;
pub mod crud;
pub mod guard;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;

pub use interface::AuthError;
pub use routes::auth_routes;
