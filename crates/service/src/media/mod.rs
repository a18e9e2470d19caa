//! Image upload pipeline. Binary payloads are encoded as data URIs and
//! pushed to the external image store concurrently; the batch either
//! yields every durable URL in input order or fails as a whole.

pub mod http_store;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use tracing::warn;

use crate::errors::ServiceError;

/// Capability: hand binary content (as a data URI) to the external
/// object store and get back a durable retrieval URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, data_uri: String) -> Result<String, ServiceError>;
}

/// One in-memory file part as read off a multipart request.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Batch bounds, mirrored from `configs::UploadConfig`.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self { max_files: 6, max_file_bytes: 5 * 1024 * 1024 }
    }
}

/// Self-describing payload: `data:<mime>;base64,<content>`.
pub fn to_data_uri(content_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", content_type, b64)
}

/// Upload every payload concurrently and return the durable URLs in the
/// same order as the input. All-or-nothing: every submission is awaited,
/// and if any failed the whole batch fails — the caller must not persist
/// partial results. Siblings of a failed upload are not cancelled, so
/// already-stored objects may be orphaned; that cost is accepted.
pub async fn upload_all(
    store: Arc<dyn ImageStore>,
    files: Vec<ImagePayload>,
    limits: &UploadLimits,
) -> Result<Vec<String>, ServiceError> {
    if files.len() > limits.max_files {
        return Err(ServiceError::invalid(format!(
            "At most {} images per request",
            limits.max_files
        )));
    }
    if files.iter().any(|f| f.bytes.len() > limits.max_file_bytes) {
        return Err(ServiceError::invalid(format!(
            "Each image must be at most {} bytes",
            limits.max_file_bytes
        )));
    }

    // Dispatch every upload before awaiting any of them.
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.store(to_data_uri(&file.content_type, &file.bytes)).await
            })
        })
        .collect();

    let mut urls = Vec::with_capacity(handles.len());
    let mut first_err: Option<ServiceError> = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(url)) => urls.push(url),
            Ok(Err(e)) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(ServiceError::Upstream(format!("upload task failed: {e}")));
                }
            }
        }
    }

    if let Some(e) = first_err {
        warn!(stored = urls.len(), err = %e, "image batch failed, discarding sibling uploads");
        return Err(e);
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::local::LocalImageStore;

    struct RejectingStore;

    #[async_trait]
    impl ImageStore for RejectingStore {
        async fn store(&self, data_uri: String) -> Result<String, ServiceError> {
            // "YmFk" is base64 for "bad"
            if data_uri.contains("YmFk") {
                Err(ServiceError::Upstream("provider rejected payload".into()))
            } else {
                Ok("https://img.test/ok".into())
            }
        }
    }

    fn payload(bytes: &[u8]) -> ImagePayload {
        ImagePayload { content_type: "image/jpeg".into(), bytes: bytes.to_vec() }
    }

    #[test]
    fn data_uri_is_self_describing() {
        assert_eq!(to_data_uri("image/png", b"a"), "data:image/png;base64,YQ==");
    }

    #[tokio::test]
    async fn urls_come_back_in_input_order() {
        let store = Arc::new(LocalImageStore::new("https://img.local"));
        let files = vec![payload(b"img-0"), payload(b"img-1"), payload(b"img-2")];
        let expected: Vec<String> = files
            .iter()
            .map(|f| format!("https://img.local/{}", base64::engine::general_purpose::STANDARD.encode(&f.bytes)))
            .collect();
        let urls = upload_all(store, files, &UploadLimits::default()).await.unwrap();
        assert_eq!(urls, expected);
    }

    #[tokio::test]
    async fn one_failure_fails_the_whole_batch() {
        let store = Arc::new(RejectingStore);
        let files = vec![payload(b"good"), payload(b"bad"), payload(b"fine")];
        let err = upload_all(store, files, &UploadLimits::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
    }

    #[tokio::test]
    async fn too_many_files_is_a_validation_failure() {
        let store = Arc::new(LocalImageStore::new("https://img.local"));
        let files = (0..7).map(|i| payload(format!("f{i}").as_bytes())).collect();
        let err = upload_all(Arc::clone(&store) as Arc<dyn ImageStore>, files, &UploadLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        // nothing was dispatched
        assert_eq!(store.stored(), 0);
    }

    #[tokio::test]
    async fn oversized_payload_is_a_validation_failure() {
        let store = Arc::new(LocalImageStore::new("https://img.local"));
        let limits = UploadLimits { max_files: 6, max_file_bytes: 8 };
        let files = vec![payload(b"tiny"), payload(b"way too large")];
        let err = upload_all(Arc::clone(&store) as Arc<dyn ImageStore>, files, &limits)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.stored(), 0);
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_urls() {
        let store = Arc::new(LocalImageStore::new("https://img.local"));
        let urls = upload_all(store, Vec::new(), &UploadLimits::default()).await.unwrap();
        assert!(urls.is_empty());
    }
}
