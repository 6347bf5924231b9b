// Common types and utilities shared across the application

pub mod api_error;
pub mod auth;
pub mod entity_ids;
pub mod id;

pub use api_error::ApiError;
pub use auth::{Actor, AdminCapability, AuthError};
pub use entity_ids::*;
pub use id::Id;
