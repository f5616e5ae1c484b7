//! HTTP backend for the Enrol console.
//!
//! [`ApiClient`] talks to the user/subject REST service and implements
//! [`enrol_core::service::AssignmentService`]. Backend JSON shapes are mapped
//! onto the core's entity types in [`wire`]; nothing backend-specific leaks
//! into `enrol-core`.

mod client;
mod wire;

pub mod error;

pub use client::{ApiClient, ApiConfig};
pub use error::{Error, Result};
