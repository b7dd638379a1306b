pub mod controller;
pub mod model;
pub mod routes;

pub use routes::import_routes;
