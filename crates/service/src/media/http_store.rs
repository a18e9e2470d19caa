use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::ServiceError;
use crate::media::ImageStore;

/// Image store client talking to the external upload endpoint. The data
/// URI goes out as a JSON body and the provider answers with the durable
/// retrieval URL. Every call is bounded by the client timeout; a timeout
/// surfaces as `Upstream` like any other provider failure.
pub struct HttpImageStore {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpImageStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn store(&self, data_uri: String) -> Result<String, ServiceError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "file": data_uri }))
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "image store returned {}",
                resp.status()
            )));
        }
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Upstream(format!("malformed image store response: {e}")))?;
        Ok(body.url)
    }
}
