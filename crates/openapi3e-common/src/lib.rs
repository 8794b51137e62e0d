//! Shared utilities for the openapi3e crates
//!
//! Error-context helpers and one-time process initialization (`.env`
//! loading and tracing subscriber setup) used by the library and server
//! crates alike.

pub mod error;
pub mod init;

pub use error::ErrorContext;
pub use init::{TracingOptions, initialize_environment, initialize_tracing};
