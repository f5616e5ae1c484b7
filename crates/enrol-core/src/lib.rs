//! Core types and editing logic for the Enrol administrative console.
//!
//! This crate is deliberately free of HTTP dependencies. The backend is
//! reached only through [`service::AssignmentService`], and operator feedback
//! goes through [`service::Operator`]; `enrol-client` and `enrol-cli` supply
//! the concrete implementations.

pub mod cache;
pub mod change;
pub mod console;
pub mod draft;
pub mod entity;
pub mod error;
pub mod selection;
pub mod service;
pub mod validate;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
