use extractor_service_cli::fetcher::Fetch;
use std::sync::Arc;

// Only the fetcher is shared; every request builds its own batch.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetch>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        AppState { fetcher }
    }
}
