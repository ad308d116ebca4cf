use std::sync::Arc;

use confserve_core::{FileResolver, Resolver};
use confserve_sdk::ConfigSource;

/// Shared state for the HTTP layer: both resolvers over one injected
/// repository, plus the label used when a request omits one.
pub struct AppState {
    pub resolver: Resolver,
    pub files: FileResolver,
    pub default_label: String,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn ConfigSource>, default_label: impl Into<String>) -> Self {
        Self {
            resolver: Resolver::new(Arc::clone(&source)),
            files: FileResolver::new(source),
            default_label: default_label.into(),
        }
    }
}
