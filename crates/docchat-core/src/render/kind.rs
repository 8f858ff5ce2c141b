//! Answer classification supplied by the chat backend

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content style of an assistant answer
///
/// The renderer accepts it alongside the message text but does not branch
/// on it; the presenter uses it to decide whether page images accompany the
/// message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    #[default]
    Text,
    Mixed,
    Visual,
}

impl AnswerKind {
    /// Whether source page images are shown next to this answer
    pub fn shows_page_images(self) -> bool {
        matches!(self, AnswerKind::Mixed | AnswerKind::Visual)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerKind::Text => "text",
            AnswerKind::Mixed => "mixed",
            AnswerKind::Visual => "visual",
        }
    }
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(AnswerKind::Text),
            "mixed" => Ok(AnswerKind::Mixed),
            "visual" => Ok(AnswerKind::Visual),
            other => Err(format!(
                "unknown answer kind '{}' (expected text, mixed, or visual)",
                other
            )),
        }
    }
}
