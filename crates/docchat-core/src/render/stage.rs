//! Rewrite stages
//!
//! Each markup pass is a pure `&str -> String` rewrite. The renderer keeps them
//! in one ordered list, so pass order is spelled out in a single place and every
//! stage can be exercised on its own.

use super::escape::escape_html;

/// One ordered text-rewrite pass
pub trait Stage: Send + Sync {
    /// Short identifier used in logs and tests
    fn name(&self) -> &'static str;

    /// Rewrite `text`, leaving anything the stage does not recognize untouched
    fn apply(&self, text: &str) -> String;
}

/// Escapes all unprotected text exactly once, ahead of every markup pass
pub struct EscapeText;

impl Stage for EscapeText {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn apply(&self, text: &str) -> String {
        escape_html(text).into_owned()
    }
}

/// Wrap maximal runs of adjacent member lines in a container
///
/// Members of one run are concatenated onto a single line; any non-member
/// line, blank lines included, ends the run.
pub(crate) fn group_runs(
    text: &str,
    open: &str,
    close: &str,
    is_member: impl Fn(&str) -> bool,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut run: Option<String> = None;

    for line in text.split('\n') {
        if is_member(line) {
            run.get_or_insert_with(|| open.to_string()).push_str(line);
            continue;
        }
        if let Some(mut finished) = run.take() {
            finished.push_str(close);
            lines.push(finished);
        }
        lines.push(line.to_string());
    }

    if let Some(mut finished) = run {
        finished.push_str(close);
        lines.push(finished);
    }

    lines.join("\n")
}
