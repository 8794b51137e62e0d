//! HTTP surface for cached OpenAPI documents
//!
//! `GET /openapi/{spec,uncloaked,spec.all}.{json,yml}` returns the matching
//! [`openapi3e::DocumentCache`] entry verbatim.

pub mod demo;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use state::AppState;
