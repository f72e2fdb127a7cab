use std::sync::Arc;
use ns_pipeline::Pipeline;

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: WebConfig,
}

#[derive(Debug, Clone, Default)]
pub struct WebConfig {
    /// Answer 404 instead of 200 when no articles were found.
    pub strict_status: bool,
}
