//! Observability for the Status Service.
//!
//! Provides metrics definitions and the recorder setup.

pub mod metrics;
