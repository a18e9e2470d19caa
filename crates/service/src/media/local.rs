use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::media::ImageStore;

/// Echo store for local development and tests. The returned URL is
/// derived from the payload itself, so it is deterministic regardless of
/// upload scheduling. Counts completed stores.
pub struct LocalImageStore {
    base: String,
    stored: AtomicUsize,
}

impl LocalImageStore {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), stored: AtomicUsize::new(0) }
    }

    /// Number of payloads accepted so far.
    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, data_uri: String) -> Result<String, ServiceError> {
        self.stored.fetch_add(1, Ordering::SeqCst);
        // Keep only the base64 payload so the URL stays compact
        let payload = data_uri.rsplit(',').next().unwrap_or_default();
        Ok(format!("{}/{}", self.base, payload))
    }
}
