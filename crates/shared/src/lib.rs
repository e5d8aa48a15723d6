pub mod auth;
pub mod config;
pub mod errors;
pub mod tracing;

pub use auth::*;
pub use config::*;
pub use errors::*;
pub use tracing::*;
