//! Upload processing progress
//!
//! After a document is uploaded the backend processes it in the background
//! and exposes a progress snapshot per document. [`ProgressPoller`] fetches
//! that snapshot on a fixed interval until processing completes or fails;
//! [`crate::api::ApiClient`] is the HTTP source.

mod http;
mod poller;

use serde::{Deserialize, Serialize};

use crate::api::{rejected, ApiError, Envelope};

pub use poller::{PollOutcome, ProgressPoller, ProgressSource, DEFAULT_POLL_INTERVAL};

/// Where a document is in its processing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Processing,
    Completed,
    Failed,
}

/// One progress report for a document being processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Percentage, or -1 once processing has failed
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    /// Absent while processing; set once the backend reaches a verdict
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl ProgressSnapshot {
    /// Snapshot for a document still being processed
    pub fn processing(progress: f64, message: impl Into<String>) -> Self {
        Self {
            progress,
            message: message.into(),
            success: None,
            document_id: None,
            filename: None,
            total_pages: None,
            file_size: None,
        }
    }

    /// Classify the snapshot
    ///
    /// Completion needs both 100% and an explicit success flag; a -1 progress
    /// or an explicit `success: false` is a failure at any percentage.
    pub fn state(&self) -> ProgressState {
        if is_value(self.progress, 100.0) && self.success == Some(true) {
            ProgressState::Completed
        } else if is_value(self.progress, -1.0) || self.success == Some(false) {
            ProgressState::Failed
        } else {
            ProgressState::Processing
        }
    }

    /// Progress clamped for display as a bar fill
    pub fn percent(&self) -> f64 {
        if self.progress.is_nan() {
            return 0.0;
        }
        self.progress.clamp(0.0, 100.0)
    }
}

fn is_value(progress: f64, expected: f64) -> bool {
    (progress - expected).abs() < f64::EPSILON
}

/// Response body of the progress endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressEnvelope {
    pub success: bool,
    #[serde(default)]
    pub progress: Option<ProgressSnapshot>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope for ProgressEnvelope {
    type Payload = ProgressSnapshot;

    fn into_payload(self) -> Result<ProgressSnapshot, ApiError> {
        if !self.success {
            return Err(rejected(self.error));
        }
        self.progress.ok_or(ApiError::MissingField("progress"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(progress: f64, success: Option<bool>) -> ProgressSnapshot {
        ProgressSnapshot {
            success,
            ..ProgressSnapshot::processing(progress, "")
        }
    }

    #[test]
    fn test_state_classification() {
        assert_eq!(snapshot(0.0, None).state(), ProgressState::Processing);
        assert_eq!(snapshot(98.0, None).state(), ProgressState::Processing);
        assert_eq!(snapshot(100.0, Some(true)).state(), ProgressState::Completed);
        assert_eq!(snapshot(-1.0, None).state(), ProgressState::Failed);
        assert_eq!(snapshot(40.0, Some(false)).state(), ProgressState::Failed);
    }

    #[test]
    fn test_hundred_without_success_flag_keeps_polling() {
        assert_eq!(snapshot(100.0, None).state(), ProgressState::Processing);
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(snapshot(-1.0, Some(false)).percent(), 0.0);
        assert_eq!(snapshot(55.0, None).percent(), 55.0);
        assert_eq!(snapshot(120.0, None).percent(), 100.0);
    }

    #[test]
    fn test_envelope_with_completed_snapshot() {
        let body = r#"{
            "success": true,
            "progress": {
                "progress": 100,
                "message": "done",
                "success": true,
                "document_id": "doc-1",
                "total_pages": 12,
                "file_size": 2048,
                "filename": "paper.pdf"
            }
        }"#;
        let envelope: ProgressEnvelope = serde_json::from_str(body).unwrap();
        let snapshot = envelope.into_payload().unwrap();
        assert_eq!(snapshot.state(), ProgressState::Completed);
        assert_eq!(snapshot.document_id.as_deref(), Some("doc-1"));
        assert_eq!(snapshot.total_pages, Some(12));
    }

    #[test]
    fn test_envelope_in_progress_has_no_success_flag() {
        let body = r#"{"success": true, "progress": {"progress": 0, "message": "queued", "timestamp": 1.5}}"#;
        let envelope: ProgressEnvelope = serde_json::from_str(body).unwrap();
        let snapshot = envelope.into_payload().unwrap();
        assert_eq!(snapshot.success, None);
        assert_eq!(snapshot.state(), ProgressState::Processing);
    }

    #[test]
    fn test_rejected_envelope() {
        let body = r#"{"success": false, "error": "no such record"}"#;
        let envelope: ProgressEnvelope = serde_json::from_str(body).unwrap();
        match envelope.into_payload() {
            Err(ApiError::Rejected(msg)) => assert_eq!(msg, "no such record"),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }
}
