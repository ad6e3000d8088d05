//! Application state.

use std::sync::Arc;
use talentflow_db::JobStore;
use talentflow_service::JobService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobService>,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            jobs: Arc::new(JobService::new(store)),
        }
    }
}
