//! Core types and trait definitions for the Arah career-guidance service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod catalog;
pub mod consultation;
pub mod engine;
pub mod error;
pub mod rule;
pub mod store;

pub use error::{Error, Result};
