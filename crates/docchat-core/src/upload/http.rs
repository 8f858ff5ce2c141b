//! Progress over the backend's HTTP API

use async_trait::async_trait;
use tracing::debug;

use super::{ProgressEnvelope, ProgressSnapshot, ProgressSource};
use crate::api::{ApiClient, ApiError};

/// `GET {base}/api/upload/progress/{document_id}`
#[async_trait]
impl ProgressSource for ApiClient {
    async fn fetch(&self, document_id: &str) -> Result<ProgressSnapshot, ApiError> {
        let url = self.endpoint(["api", "upload", "progress", document_id])?;
        debug!(%url, "Fetching upload progress");
        self.send::<ProgressEnvelope>(self.http().get(url)).await
    }
}
