pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod routes;
pub mod session;

pub use error::Error;
pub use handler::{sanitize, serialize_admin, serialize_buyer, serialize_influencer, Sanitize};
pub use session::{Principal, SessionData, UserRole};
