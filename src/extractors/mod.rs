//! Request extractors.

pub mod json;
pub mod user;

pub use json::JsonBody;
pub use user::{AdminUser, AuthUser};
