//! Fixed-interval progress polling

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{ProgressSnapshot, ProgressState};
use crate::api::ApiError;

/// Interval between progress requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Anything that can report processing progress for a document
#[async_trait]
pub trait ProgressSource: Send + Sync {
    async fn fetch(&self, document_id: &str) -> Result<ProgressSnapshot, ApiError>;
}

/// Terminal result of a watch
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(ProgressSnapshot),
    Failed(ProgressSnapshot),
}

impl PollOutcome {
    pub fn snapshot(&self) -> &ProgressSnapshot {
        match self {
            PollOutcome::Completed(s) | PollOutcome::Failed(s) => s,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed(_))
    }
}

/// Polls a [`ProgressSource`] until the document reaches a terminal state
pub struct ProgressPoller<S> {
    source: S,
    interval: Duration,
    max_polls: Option<u32>,
}

impl<S: ProgressSource> ProgressPoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Give up with [`ApiError::TimedOut`] after this many requests
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    /// Watch `document_id`, handing every snapshot to `on_update`
    ///
    /// The first request goes out immediately. A failed request ends the
    /// watch with that error; it is not retried.
    pub async fn watch<F>(
        &self,
        document_id: &str,
        mut on_update: F,
    ) -> Result<PollOutcome, ApiError>
    where
        F: FnMut(&ProgressSnapshot),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0u32;

        loop {
            if let Some(max_polls) = self.max_polls {
                if polls >= max_polls {
                    warn!(document_id, polls, "Gave up waiting for document processing");
                    return Err(ApiError::TimedOut(max_polls));
                }
            }

            ticker.tick().await;
            polls += 1;

            let snapshot = match self.source.fetch(document_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(document_id, error = %e, "Progress request failed");
                    return Err(e);
                }
            };

            debug!(
                document_id,
                progress = snapshot.progress,
                message = %snapshot.message,
                "Progress update"
            );
            on_update(&snapshot);

            match snapshot.state() {
                ProgressState::Processing => continue,
                ProgressState::Completed => return Ok(PollOutcome::Completed(snapshot)),
                ProgressState::Failed => return Ok(PollOutcome::Failed(snapshot)),
            }
        }
    }
}
