//! HTTP handlers

pub mod error;
pub mod health;
pub mod posts;
pub mod profiles;
pub mod users;

pub use error::ApiError;
pub use health::health;
