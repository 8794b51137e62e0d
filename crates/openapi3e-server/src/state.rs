//! Application state for Axum handlers

use openapi3e::DocumentCache;
use std::sync::Arc;

/// Shared, read-only state built once at startup
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every built document variant, already serialized
    pub cache: Arc<DocumentCache>,
    /// `Content-Type` sent with YAML documents
    pub yaml_content_type: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(cache: DocumentCache, yaml_content_type: &str) -> Self {
        Self {
            cache: Arc::new(cache),
            yaml_content_type: Arc::from(yaml_content_type),
        }
    }
}
