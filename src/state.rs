//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::DynMappingService;

/// State cloned into each request by axum.
#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<DynMappingService>,
    /// Public prefix for building `short_url`; `None` omits the field.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(mapping_service: Arc<DynMappingService>, base_url: Option<String>) -> Self {
        Self {
            mapping_service,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Full short URL for `code`, when a public base URL is configured.
    pub fn short_url(&self, code: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{base}/{code}"))
    }
}
