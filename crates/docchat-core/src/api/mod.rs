//! Client for the document chat backend
//!
//! Every endpoint answers with a JSON envelope carrying `success` and, on
//! failure, an `error` message. Lookup failures (404/500) still carry that
//! envelope, so the body is decoded before the HTTP status is considered.

mod types;

#[cfg(test)]
pub(crate) mod test_server;

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::figure::FigureRequest;

pub use types::{ChatAnswer, ChatReply, ChatRequest, FigureReply, UploadReply};

/// Largest document the backend accepts
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Errors raised while talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base url cannot carry a path: {0}")]
    NotABaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("response carried no {0}")]
    MissingField(&'static str),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("document still processing after {0} polls")]
    TimedOut(u32),
}

/// A decoded response body that either carries a payload or a rejection
pub trait Envelope {
    type Payload;

    fn into_payload(self) -> Result<Self::Payload, ApiError>;
}

pub(crate) fn rejected(error: Option<String>) -> ApiError {
    ApiError::Rejected(error.unwrap_or_else(|| "unknown error".to_string()))
}

/// HTTP client rooted at the backend's base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::NotABaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint below the base URL; every segment is percent-encoded
    pub fn endpoint<I>(&self, segments: I) -> Result<Url, ApiError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::NotABaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a URL the backend returned (often server-relative)
    pub fn resolve(&self, reference: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(reference)?)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request and unwrap its envelope
    pub(crate) async fn send<E>(&self, request: RequestBuilder) -> Result<E::Payload, ApiError>
    where
        E: Envelope + DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<E>(&body) {
            Ok(envelope) => envelope.into_payload(),
            Err(_) if !status.is_success() => Err(ApiError::Status(status.as_u16())),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }

    /// Ask a question about a processed document
    pub async fn ask(&self, document_id: &str, question: &str) -> Result<ChatAnswer, ApiError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::InvalidRequest("question is empty".to_string()));
        }

        let url = self.endpoint(["api", "chat"])?;
        debug!(%url, document_id, "Asking question");
        let body = ChatRequest {
            document_id,
            question,
        };
        self.send::<ChatReply>(self.client.post(url).json(&body)).await
    }

    /// Upload a PDF for background processing, returning its document id
    ///
    /// Follow processing with [`crate::upload::ProgressPoller`].
    pub async fn upload(&self, path: &Path) -> Result<String, ApiError> {
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_pdf => name.to_string(),
            _ => {
                return Err(ApiError::InvalidRequest(format!(
                    "{} is not a PDF file",
                    path.display()
                )))
            }
        };

        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(ApiError::InvalidRequest(format!(
                "{} is larger than {} MB",
                file_name,
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let url = self.endpoint(["api", "upload", "with-progress"])?;
        info!(file = %file_name, size, "Uploading document");
        self.send::<UploadReply>(self.client.post(url).multipart(form))
            .await
    }

    /// Crop a figure out of a page, returning the URL of the saved image
    pub async fn extract_figure(
        &self,
        document_id: &str,
        page_number: u32,
        request: &FigureRequest,
    ) -> Result<String, ApiError> {
        let page = page_number.to_string();
        let url = self.endpoint([
            "api",
            "documents",
            document_id,
            "pages",
            page.as_str(),
            "extract_figure",
        ])?;
        debug!(%url, figure = %request.figure_name, "Extracting figure");
        self.send::<FigureReply>(self.client.post(url).json(request))
            .await
    }
}
