//! HTTP errors for the document endpoints.
//!
//! The documents are built before the server starts, so the only failures
//! left at request time are requests for documents that do not exist.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use openapi3e::SpecVariant;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The file name does not name any document
    #[error("No document named '{file}'")]
    UnknownDocument { file: String },

    /// The variant exists but was not built under the current configuration
    #[error("The {variant} document is not enabled")]
    VariantNotBuilt { variant: SpecVariant },
}

/// Error body sent to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownDocument { .. } | Self::VariantNotBuilt { .. } => StatusCode::NOT_FOUND,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::UnknownDocument { .. } => "UNKNOWN_DOCUMENT",
            Self::VariantNotBuilt { .. } => "VARIANT_NOT_BUILT",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "Client error");

        let body = ApiErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
