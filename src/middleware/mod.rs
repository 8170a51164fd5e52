pub mod auth;

pub use auth::{Claims, auth_middleware, generate_token, validate_token};
