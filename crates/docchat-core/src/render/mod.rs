//! Message content rendering
//!
//! Turns raw assistant or user text into an HTML fragment for the chat view.
//! Rendering is a fixed sequence of passes:
//!
//! 1. Code and math regions are lifted out and replaced by tokens
//!    ([`regions`]), so no later pass can touch their content.
//! 2. All remaining text is escaped once.
//! 3. Block passes (headings, lists, tables, quotes, rules) rewrite whole lines.
//! 4. Inline passes (links, images, emphasis, strikethrough) and finally
//!    newline-to-`<br>` conversion.
//! 5. Tokens are swapped back for their rendered HTML.
//!
//! Malformed markup never fails: whatever a pass does not recognize is left
//! as escaped literal text.

use once_cell::sync::Lazy;
use tracing::trace;

mod blocks;
mod escape;
mod inline;
mod kind;
mod regions;
mod stage;

pub use escape::escape_html;
pub use kind::AnswerKind;
pub use regions::{ProtectedRegions, RegionKind};
pub use stage::Stage;

use regions::scrub_token_chars;

/// Markup passes in application order
static MARKUP_STAGES: Lazy<Vec<Box<dyn Stage>>> = Lazy::new(|| {
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(stage::EscapeText),
        Box::new(blocks::Headings),
        Box::new(blocks::UnorderedItems),
        Box::new(blocks::OrderedItems),
        Box::new(blocks::ListGrouping),
        Box::new(inline::Links),
        Box::new(inline::Images),
        Box::new(blocks::TableRows),
        Box::new(blocks::TableGrouping),
        Box::new(blocks::Blockquotes),
        Box::new(blocks::HorizontalRules),
        Box::new(inline::Emphasis),
        Box::new(inline::Strikethrough),
        Box::new(inline::LineBreaks),
    ];
    stages
});

/// The ordered markup passes applied between extraction and restoration
pub fn stages() -> &'static [Box<dyn Stage>] {
    &MARKUP_STAGES
}

/// Render message text to an HTML fragment
///
/// `kind` is accepted so callers can pass the backend's classification
/// through unchanged; it does not alter the output.
///
/// Input is normalized before escaping: CRLF becomes LF and the private-use
/// characters U+E000/U+E001 become U+FFFD.
pub fn render(content: &str, kind: AnswerKind) -> String {
    if content.is_empty() {
        return String::new();
    }

    let normalized = content.replace("\r\n", "\n");
    let mut text = scrub_token_chars(&normalized).into_owned();

    let mut regions = ProtectedRegions::new();
    for region in RegionKind::EXTRACTION_ORDER {
        text = regions.extract(region, &text);
    }

    trace!(
        kind = %kind,
        len = content.len(),
        code_blocks = regions.count(RegionKind::CodeBlock),
        inline_code = regions.count(RegionKind::InlineCode),
        display_math = regions.count(RegionKind::DisplayMath),
        inline_math = regions.count(RegionKind::InlineMath),
        "rendering message"
    );

    let text = MARKUP_STAGES
        .iter()
        .fold(text, |text, stage| stage.apply(&text));

    regions.restore(&text)
}
