//! # Status Test Utilities
//!
//! Shared test utilities for the Build Status Service.
//!
//! This crate provides:
//! - Server test harness (`TestStatusServer` for E2E tests)
//! - Re-exports of the mock sources and the manual clock
//!
//! ## Usage
//!
//! ```rust,ignore
//! use status_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestStatusServer::builder().build_number("42").spawn().await?;
//!     let token = server.login().await?;
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/status", server.url()))
//!         .bearer_auth(&token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use common::clock::ManualClock;
pub use server_harness::*;
pub use status_service::services::mock::{MockMetadataSource, MockRevisionSource};
