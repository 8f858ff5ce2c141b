//! `docchat watch`

use std::process::ExitCode;

use anyhow::{Context, Result};
use docchat_core::upload::{PollOutcome, ProgressPoller};
use docchat_core::Config;
use tracing::info;

/// Flag values that take precedence over config and environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub interval_ms: Option<u64>,
    pub max_polls: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.poll_interval_ms = interval_ms;
        }
        if self.max_polls.is_some() {
            config.max_polls = self.max_polls;
        }
    }
}

pub async fn run(document_id: &str, overrides: Overrides) -> Result<ExitCode> {
    let mut config = Config::load()?;
    overrides.apply(&mut config);
    info!(base_url = %config.base_url, document_id, "Watching document processing");

    let source = super::client_for(&config)?;
    let mut poller = ProgressPoller::new(source).with_interval(config.poll_interval());
    if let Some(max_polls) = config.max_polls {
        poller = poller.with_max_polls(max_polls);
    }

    let outcome = poller
        .watch(document_id, |snapshot| {
            eprintln!("{:>5.1}%  {}", snapshot.percent(), snapshot.message);
        })
        .await
        .context("Failed to follow processing progress")?;

    match outcome {
        PollOutcome::Completed(snapshot) => {
            println!(
                "Processed {} ({} pages)",
                snapshot.filename.as_deref().unwrap_or(document_id),
                snapshot.total_pages.unwrap_or(0)
            );
            Ok(ExitCode::SUCCESS)
        }
        PollOutcome::Failed(snapshot) => {
            let reason = if snapshot.message.is_empty() {
                "processing failed"
            } else {
                snapshot.message.as_str()
            };
            eprintln!("Processing failed: {reason}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config {
            max_polls: Some(5),
            ..Config::default()
        };
        Overrides {
            base_url: Some("http://other:9000".to_string()),
            interval_ms: Some(200),
            max_polls: None,
        }
        .apply(&mut config);

        assert_eq!(config.base_url, "http://other:9000");
        assert_eq!(config.poll_interval(), Duration::from_millis(200));
        assert_eq!(config.max_polls, Some(5));
    }
}
