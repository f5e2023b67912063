pub mod handlers;
pub mod pages;
pub mod routes;

pub use routes::*;

use crate::ingest::UploadStore;
use crate::ml::OwnerService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OwnerService>,
    pub uploads: UploadStore,
    pub max_upload_bytes: usize,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<OwnerService>, uploads: UploadStore) -> Self {
        Self {
            service,
            uploads,
            max_upload_bytes: 16 * 1024 * 1024,
            started_at: Instant::now(),
        }
    }

    /// Set the request body limit applied to uploads
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
