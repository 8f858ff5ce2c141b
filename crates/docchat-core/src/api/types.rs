//! Request and response bodies

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{rejected, ApiError, Envelope};
use crate::render::{render, AnswerKind};

/// Body of `POST /api/chat`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub document_id: &'a str,
    pub question: &'a str,
}

/// Response of `POST /api/chat`
///
/// Older backends answer with `answer` and `source_pages`, newer ones with
/// `answer_content`, `answer_type` and `relevant_pages`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub answer_content: Option<String>,
    #[serde(default)]
    pub answer_type: Option<String>,
    #[serde(default)]
    pub source_pages: Option<Vec<u32>>,
    #[serde(default)]
    pub relevant_pages: Option<Vec<u32>>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// An answer ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    pub content: String,
    pub kind: AnswerKind,
    pub source_pages: Vec<u32>,
    pub confidence: Option<f64>,
}

impl ChatAnswer {
    pub fn to_html(&self) -> String {
        render(&self.content, self.kind)
    }
}

impl Envelope for ChatReply {
    type Payload = ChatAnswer;

    fn into_payload(self) -> Result<ChatAnswer, ApiError> {
        if !self.success {
            return Err(rejected(self.error));
        }

        let content = [self.answer_content, self.answer]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .ok_or(ApiError::MissingField("answer"))?;

        // Unknown tags render as plain text answers
        let kind = match self.answer_type.as_deref() {
            None => AnswerKind::Text,
            Some(tag) => tag.parse::<AnswerKind>().unwrap_or_else(|_| {
                debug!(tag, "Unknown answer type");
                AnswerKind::Text
            }),
        };

        Ok(ChatAnswer {
            content,
            kind,
            source_pages: self
                .source_pages
                .or(self.relevant_pages)
                .unwrap_or_default(),
            confidence: self.confidence,
        })
    }
}

/// Response of `POST /api/upload/with-progress`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
}

impl Envelope for UploadReply {
    type Payload = String;

    fn into_payload(self) -> Result<String, ApiError> {
        if !self.success {
            return Err(rejected(self.error));
        }
        self.document_id.ok_or(ApiError::MissingField("document_id"))
    }
}

/// Response of `POST /api/documents/{id}/pages/{n}/extract_figure`
#[derive(Debug, Clone, Deserialize)]
pub struct FigureReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub figure_url: Option<String>,
}

impl Envelope for FigureReply {
    type Payload = String;

    fn into_payload(self) -> Result<String, ApiError> {
        if !self.success {
            return Err(rejected(self.error));
        }
        self.figure_url.ok_or(ApiError::MissingField("figure_url"))
    }
}
