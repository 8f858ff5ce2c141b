//! Protected regions
//!
//! Fenced code, inline code, and math are lifted out of the message before any
//! markup pass runs. Each region is escaped once, stored as finished HTML, and
//! replaced by a placeholder token. The tokens are bracketed by private-use
//! characters that are scrubbed from the input beforehand, so message text can
//! never forge one.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::escape::escape_html;

pub(super) const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

/// Fenced code: optional language tag, content up to the next fence
static CODE_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w*)\n?(.*?)```").unwrap());

static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static DISPLAY_MATH_DOLLAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap());

static DISPLAY_MATH_BRACKET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\\[(.*?)\\\]").unwrap());

static INLINE_MATH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$\n]+)\$").unwrap());

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{TOKEN_OPEN}([CIDM])([0-9]+){TOKEN_CLOSE}")).unwrap());

/// Kind of opaque region, in extraction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    CodeBlock,
    InlineCode,
    DisplayMath,
    InlineMath,
}

impl RegionKind {
    /// Order in which regions are extracted; restoration walks it backwards
    pub const EXTRACTION_ORDER: [RegionKind; 4] = [
        RegionKind::CodeBlock,
        RegionKind::InlineCode,
        RegionKind::DisplayMath,
        RegionKind::InlineMath,
    ];

    fn tag(self) -> char {
        match self {
            RegionKind::CodeBlock => 'C',
            RegionKind::InlineCode => 'I',
            RegionKind::DisplayMath => 'D',
            RegionKind::InlineMath => 'M',
        }
    }

    fn slot(self) -> usize {
        match self {
            RegionKind::CodeBlock => 0,
            RegionKind::InlineCode => 1,
            RegionKind::DisplayMath => 2,
            RegionKind::InlineMath => 3,
        }
    }
}

/// Replace token delimiter characters in untrusted input
pub fn scrub_token_chars(text: &str) -> Cow<'_, str> {
    if text.contains([TOKEN_OPEN, TOKEN_CLOSE]) {
        Cow::Owned(text.replace([TOKEN_OPEN, TOKEN_CLOSE], "\u{FFFD}"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Rendered HTML for every extracted region, one list per kind
#[derive(Debug, Default)]
pub struct ProtectedRegions {
    slots: [Vec<String>; 4],
}

impl ProtectedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of regions of `kind` extracted so far
    pub fn count(&self, kind: RegionKind) -> usize {
        self.slots[kind.slot()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    /// Rendered HTML of the `index`-th region of `kind`
    pub fn get(&self, kind: RegionKind, index: usize) -> Option<&str> {
        self.slots[kind.slot()].get(index).map(String::as_str)
    }

    /// Store rendered HTML and return the token that stands in for it
    fn store(&mut self, kind: RegionKind, html: String) -> String {
        let slot = &mut self.slots[kind.slot()];
        let token = format!("{TOKEN_OPEN}{}{}{TOKEN_CLOSE}", kind.tag(), slot.len());
        slot.push(html);
        token
    }

    /// Lift every region of `kind` out of `text`
    ///
    /// Unterminated delimiters never match and stay in the text as-is.
    pub fn extract(&mut self, kind: RegionKind, text: &str) -> String {
        match kind {
            RegionKind::CodeBlock => CODE_BLOCK_REGEX
                .replace_all(text, |caps: &Captures| {
                    let lang = match &caps[1] {
                        "" => "text",
                        lang => lang,
                    };
                    let html = format!(
                        "<pre class=\"code-block\"><code class=\"language-{}\">{}</code></pre>",
                        lang,
                        escape_html(caps[2].trim())
                    );
                    self.store(kind, html)
                })
                .into_owned(),
            RegionKind::InlineCode => INLINE_CODE_REGEX
                .replace_all(text, |caps: &Captures| {
                    let html = format!("<code class=\"inline-code\">{}</code>", escape_html(&caps[1]));
                    self.store(kind, html)
                })
                .into_owned(),
            RegionKind::DisplayMath => {
                let text = self.extract_display_math(&DISPLAY_MATH_DOLLAR_REGEX, text);
                self.extract_display_math(&DISPLAY_MATH_BRACKET_REGEX, &text)
            }
            RegionKind::InlineMath => INLINE_MATH_REGEX
                .replace_all(text, |caps: &Captures| {
                    let html = format!("<span class=\"math-inline\">{}</span>", escape_html(&caps[1]));
                    self.store(kind, html)
                })
                .into_owned(),
        }
    }

    fn extract_display_math(&mut self, regex: &Regex, text: &str) -> String {
        regex
            .replace_all(text, |caps: &Captures| {
                let html = format!("<div class=\"math-block\">{}</div>", escape_html(caps[1].trim()));
                self.store(RegionKind::DisplayMath, html)
            })
            .into_owned()
    }

    /// Substitute stored HTML back for every token
    ///
    /// Kinds are restored in reverse extraction order: a region extracted later
    /// may carry the token of an earlier one (inline code inside `$$ .. $$`),
    /// which then surfaces and is resolved by a following round.
    pub fn restore(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }

        let mut restored = text.to_string();
        for kind in RegionKind::EXTRACTION_ORDER.iter().rev() {
            if self.count(*kind) == 0 {
                continue;
            }
            restored = self.restore_kind(*kind, &restored);
        }
        restored
    }

    fn restore_kind(&self, kind: RegionKind, text: &str) -> String {
        TOKEN_REGEX
            .replace_all(text, |caps: &Captures| {
                let matches_kind = caps[1].starts_with(kind.tag());
                let stored = caps[2]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.get(kind, index));
                match stored {
                    Some(html) if matches_kind => html.to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
