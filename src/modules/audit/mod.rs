pub mod controller;
pub mod crud;
pub mod model;
pub mod routes;
pub mod schema;

pub use crud::{AuditCrud, NewAuditLog};
pub use routes::audit_routes;
