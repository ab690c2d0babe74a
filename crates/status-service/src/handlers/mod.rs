//! HTTP request handlers for the Status Service.

pub mod auth;
pub mod greeting;
pub mod health;
pub mod metrics;
pub mod status;

pub use auth::{login, protected, refresh};
pub use greeting::greeting;
pub use health::health_check;
pub use metrics::metrics_handler;
pub use status::get_status;
