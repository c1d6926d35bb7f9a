use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable text generator. Default: GeminiClient. Trait object so tests
    /// can stub the remote endpoint.
    pub llm: Arc<dyn TextGenerator>,
    #[allow(dead_code)]
    pub config: Config,
}
