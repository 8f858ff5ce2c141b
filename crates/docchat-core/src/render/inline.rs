//! Inline passes: links, images, emphasis, strikethrough, line breaks

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::regions::TOKEN_OPEN;
use super::stage::Stage;

/// The optional `!` is captured so image syntax can be skipped here
static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)\n]+)\)").unwrap());

static IMAGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\n]+)\)").unwrap());

static BOLD_ITALIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*([^*\n]+)\*\*\*").unwrap());

static BOLD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());

static ITALIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());

static STRIKETHROUGH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~([^~\n]+)~~").unwrap());

/// Schemes that would run script when the element is activated or loaded
const SCRIPT_SCHEMES: [&str; 2] = ["javascript:", "vbscript:"];

/// Whether a link or image target would execute script
///
/// Browsers ignore embedded whitespace and control characters in the scheme,
/// so they are ignored here too.
fn is_script_url(url: &str) -> bool {
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    SCRIPT_SCHEMES.iter().any(|s| scheme.starts_with(s))
}

/// Characters that later passes read as markup: emphasis, strikethrough, table cells
const MARKUP_CHARS: [char; 3] = ['*', '~', '|'];

/// Percent-encode markup characters in a link or image target
fn encode_target(url: &str) -> Cow<'_, str> {
    if !url.contains(MARKUP_CHARS) {
        return Cow::Borrowed(url);
    }
    let mut out = String::with_capacity(url.len() + 8);
    for c in url.chars() {
        match c {
            '*' => out.push_str("%2A"),
            '~' => out.push_str("%7E"),
            '|' => out.push_str("%7C"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Replace markup characters with numeric references, which display the same
fn neutralize_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(MARKUP_CHARS) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '*' => out.push_str("&#42;"),
            '~' => out.push_str("&#126;"),
            '|' => out.push_str("&#124;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Whether an attribute value would receive restored region HTML
fn holds_region(value: &str) -> bool {
    value.contains(TOKEN_OPEN)
}

/// `[text](url)`, opened in a new browsing context without opener access
pub struct Links;

impl Stage for Links {
    fn name(&self) -> &'static str {
        "links"
    }

    fn apply(&self, text: &str) -> String {
        LINK_REGEX
            .replace_all(text, |caps: &Captures| {
                let url = &caps[3];
                if !caps[1].is_empty() || is_script_url(url) || holds_region(url) {
                    return caps[0].to_string();
                }
                // `|` only; emphasis inside link text is still wanted
                let label = caps[2].replace('|', "&#124;");
                format!(
                    "<a href=\"{}\" class=\"markdown-link\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    encode_target(url),
                    label
                )
            })
            .into_owned()
    }
}

/// `![alt](url)`
pub struct Images;

impl Stage for Images {
    fn name(&self) -> &'static str {
        "images"
    }

    fn apply(&self, text: &str) -> String {
        IMAGE_REGEX
            .replace_all(text, |caps: &Captures| {
                let (alt, url) = (&caps[1], &caps[2]);
                if is_script_url(url) || holds_region(url) || holds_region(alt) {
                    return caps[0].to_string();
                }
                format!(
                    "<img src=\"{}\" alt=\"{}\" class=\"markdown-image\" />",
                    encode_target(url),
                    neutralize_markup(alt)
                )
            })
            .into_owned()
    }
}

/// Emphasis, longest delimiter first so `***x***` never leaves a stray `*`
pub struct Emphasis;

impl Stage for Emphasis {
    fn name(&self) -> &'static str {
        "emphasis"
    }

    fn apply(&self, text: &str) -> String {
        let text = BOLD_ITALIC_REGEX.replace_all(text, "<strong><em>$1</em></strong>");
        let text = BOLD_REGEX.replace_all(&text, "<strong>$1</strong>");
        ITALIC_REGEX.replace_all(&text, "<em>$1</em>").into_owned()
    }
}

/// `~~struck~~`
pub struct Strikethrough;

impl Stage for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn apply(&self, text: &str) -> String {
        STRIKETHROUGH_REGEX
            .replace_all(text, "<del class=\"markdown-del\">$1</del>")
            .into_owned()
    }
}

/// Every remaining newline becomes `<br>`; must be the last line-aware pass
pub struct LineBreaks;

impl Stage for LineBreaks {
    fn name(&self) -> &'static str {
        "line-breaks"
    }

    fn apply(&self, text: &str) -> String {
        text.replace('\n', "<br>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link() {
        assert_eq!(
            Links.apply("see [docs](http://x)"),
            "see <a href=\"http://x\" class=\"markdown-link\" target=\"_blank\" rel=\"noopener noreferrer\">docs</a>"
        );
    }

    #[test]
    fn test_link_pass_leaves_images_alone() {
        assert_eq!(Links.apply("![chart](c.png)"), "![chart](c.png)");
        assert_eq!(
            Images.apply("![chart](c.png)"),
            "<img src=\"c.png\" alt=\"chart\" class=\"markdown-image\" />"
        );
    }

    #[test]
    fn test_image_with_empty_alt() {
        assert_eq!(
            Images.apply("![](a.png)"),
            "<img src=\"a.png\" alt=\"\" class=\"markdown-image\" />"
        );
    }

    #[test]
    fn test_script_urls_stay_literal() {
        assert_eq!(Links.apply("[x](javascript:alert(1)"), "[x](javascript:alert(1)");
        assert_eq!(Links.apply("[x]( JavaScript:go)"), "[x]( JavaScript:go)");
        assert_eq!(Images.apply("![x](vbscript:go)"), "![x](vbscript:go)");
    }

    #[test]
    fn test_is_script_url_ignores_whitespace() {
        assert!(is_script_url("java\tscript:alert"));
        assert!(!is_script_url("https://example.com/javascript:"));
    }

    #[test]
    fn test_markup_chars_in_targets_are_encoded() {
        assert_eq!(
            Links.apply("[a](http://x/~~y~~)"),
            "<a href=\"http://x/%7E%7Ey%7E%7E\" class=\"markdown-link\" target=\"_blank\" rel=\"noopener noreferrer\">a</a>"
        );
        assert_eq!(
            Images.apply("![*b* ~~c~~](p*q|r.png)"),
            "<img src=\"p%2Aq%7Cr.png\" alt=\"&#42;b&#42; &#126;&#126;c&#126;&#126;\" class=\"markdown-image\" />"
        );
    }

    #[test]
    fn test_targets_holding_regions_stay_literal() {
        let link = "[x](\u{E000}I0\u{E001})";
        assert_eq!(Links.apply(link), link);
        let image = "![\u{E000}M0\u{E001}](a.png)";
        assert_eq!(Images.apply(image), image);
    }

    #[test]
    fn test_target_does_not_span_lines() {
        assert_eq!(Links.apply("[a](b\nc)"), "[a](b\nc)");
    }

    #[test]
    fn test_emphasis_priority() {
        assert_eq!(
            Emphasis.apply("***both*** **bold** *it*"),
            "<strong><em>both</em></strong> <strong>bold</strong> <em>it</em>"
        );
    }

    #[test]
    fn test_emphasis_does_not_span_lines() {
        assert_eq!(Emphasis.apply("2 * 3\n4 * 5"), "2 * 3\n4 * 5");
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(
            Strikethrough.apply("~~old~~ new"),
            "<del class=\"markdown-del\">old</del> new"
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(LineBreaks.apply("a\n\nb"), "a<br><br>b");
    }
}
