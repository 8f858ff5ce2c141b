//! Line-oriented block passes: headings, lists, tables, quotes, rules
//!
//! Every pattern here is anchored to a whole line, so these passes must run
//! before newlines are turned into `<br>`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::stage::{group_runs, Stage};

static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").unwrap());

static UNORDERED_ITEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)[*+-][ \t]+(.+)$").unwrap());

static ORDERED_ITEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)[0-9]+\.[ \t]+(.+)$").unwrap());

static TABLE_ROW_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\|(.+)\|[ \t]*$").unwrap());

/// Text is already escaped when this runs, so the marker is `&gt;`
static BLOCKQUOTE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^&gt;[ \t]+(.+)$").unwrap());

static RULE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:\*{3,}|-{3,}|_{3,})$").unwrap());

const UNORDERED_ITEM_PREFIX: &str = "<li class=\"markdown-li ";
const ORDERED_ITEM_PREFIX: &str = "<li class=\"markdown-oli ";
const TABLE_ROW_PREFIX: &str = "<tr class=\"markdown-tr\">";

/// Nesting level from leading indentation: two columns per level
fn nesting_level(indent: &str) -> usize {
    indent.chars().count() / 2 + 1
}

/// `# Title` through `###### Title`
pub struct Headings;

impl Stage for Headings {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn apply(&self, text: &str) -> String {
        HEADING_REGEX
            .replace_all(text, |caps: &Captures| {
                let level = caps[1].len();
                format!(
                    "<h{level} class=\"markdown-h{level}\">{}</h{level}>",
                    caps[2].trim()
                )
            })
            .into_owned()
    }
}

/// `- item`, `* item`, `+ item`
pub struct UnorderedItems;

impl Stage for UnorderedItems {
    fn name(&self) -> &'static str {
        "unordered-items"
    }

    fn apply(&self, text: &str) -> String {
        UNORDERED_ITEM_REGEX
            .replace_all(text, |caps: &Captures| {
                format!(
                    "{}markdown-li-{}\">{}</li>",
                    UNORDERED_ITEM_PREFIX,
                    nesting_level(&caps[1]),
                    caps[2].trim()
                )
            })
            .into_owned()
    }
}

/// `1. item`
pub struct OrderedItems;

impl Stage for OrderedItems {
    fn name(&self) -> &'static str {
        "ordered-items"
    }

    fn apply(&self, text: &str) -> String {
        ORDERED_ITEM_REGEX
            .replace_all(text, |caps: &Captures| {
                format!(
                    "{}markdown-oli-{}\">{}</li>",
                    ORDERED_ITEM_PREFIX,
                    nesting_level(&caps[1]),
                    caps[2].trim()
                )
            })
            .into_owned()
    }
}

/// Wraps runs of unordered items in `<ul>`, then runs of ordered items in `<ol>`
pub struct ListGrouping;

impl Stage for ListGrouping {
    fn name(&self) -> &'static str {
        "list-grouping"
    }

    fn apply(&self, text: &str) -> String {
        let text = group_runs(text, "<ul class=\"markdown-ul\">", "</ul>", |line| {
            line.starts_with(UNORDERED_ITEM_PREFIX) && line.ends_with("</li>")
        });
        group_runs(&text, "<ol class=\"markdown-ol\">", "</ol>", |line| {
            line.starts_with(ORDERED_ITEM_PREFIX) && line.ends_with("</li>")
        })
    }
}

/// `| a | b |` lines become rows; empty cells are dropped
pub struct TableRows;

impl Stage for TableRows {
    fn name(&self) -> &'static str {
        "table-rows"
    }

    fn apply(&self, text: &str) -> String {
        TABLE_ROW_REGEX
            .replace_all(text, |caps: &Captures| {
                let cells: String = caps[1]
                    .split('|')
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .map(|cell| format!("<td class=\"markdown-td\">{}</td>", cell))
                    .collect();
                format!("{TABLE_ROW_PREFIX}{cells}</tr>")
            })
            .into_owned()
    }
}

/// Wraps runs of rows in a table; no header-row detection
pub struct TableGrouping;

impl Stage for TableGrouping {
    fn name(&self) -> &'static str {
        "table-grouping"
    }

    fn apply(&self, text: &str) -> String {
        group_runs(
            text,
            "<table class=\"markdown-table\"><tbody>",
            "</tbody></table>",
            |line| line.starts_with(TABLE_ROW_PREFIX) && line.ends_with("</tr>"),
        )
    }
}

/// `> quoted`, one line per quote element
pub struct Blockquotes;

impl Stage for Blockquotes {
    fn name(&self) -> &'static str {
        "blockquotes"
    }

    fn apply(&self, text: &str) -> String {
        BLOCKQUOTE_REGEX
            .replace_all(text, "<blockquote class=\"markdown-blockquote\">$1</blockquote>")
            .into_owned()
    }
}

/// `***`, `---`, `___`
pub struct HorizontalRules;

impl Stage for HorizontalRules {
    fn name(&self) -> &'static str {
        "horizontal-rules"
    }

    fn apply(&self, text: &str) -> String {
        RULE_REGEX
            .replace_all(text, "<hr class=\"markdown-hr\" />")
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            Headings.apply("# Title  \n### Third"),
            "<h1 class=\"markdown-h1\">Title</h1>\n<h3 class=\"markdown-h3\">Third</h3>"
        );
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert_eq!(Headings.apply("####### too deep"), "####### too deep");
    }

    #[test]
    fn test_heading_needs_text_on_same_line() {
        assert_eq!(Headings.apply("#\nnext"), "#\nnext");
    }

    #[test]
    fn test_unordered_item_nesting() {
        assert_eq!(
            UnorderedItems.apply("- top\n    * nested"),
            "<li class=\"markdown-li markdown-li-1\">top</li>\n\
             <li class=\"markdown-li markdown-li-3\">nested</li>"
        );
    }

    #[test]
    fn test_ordered_item() {
        assert_eq!(
            OrderedItems.apply("  12. twelfth"),
            "<li class=\"markdown-oli markdown-oli-2\">twelfth</li>"
        );
    }

    #[test]
    fn test_marker_without_space_is_not_an_item() {
        assert_eq!(UnorderedItems.apply("-dash"), "-dash");
        assert_eq!(OrderedItems.apply("3.14 is pi"), "3.14 is pi");
    }

    #[test]
    fn test_list_grouping_by_kind() {
        let text = UnorderedItems.apply("- a\n- b\n1. c");
        let text = OrderedItems.apply(&text);
        assert_eq!(
            ListGrouping.apply(&text),
            "<ul class=\"markdown-ul\">\
             <li class=\"markdown-li markdown-li-1\">a</li>\
             <li class=\"markdown-li markdown-li-1\">b</li></ul>\n\
             <ol class=\"markdown-ol\"><li class=\"markdown-oli markdown-oli-1\">c</li></ol>"
        );
    }

    #[test]
    fn test_table_rows_drop_outer_segments() {
        assert_eq!(
            TableRows.apply("| a | b |"),
            "<tr class=\"markdown-tr\"><td class=\"markdown-td\">a</td><td class=\"markdown-td\">b</td></tr>"
        );
    }

    #[test]
    fn test_table_grouping() {
        let text = TableRows.apply("|a|\n|b|\n\n|c|");
        assert_eq!(
            TableGrouping.apply(&text),
            "<table class=\"markdown-table\"><tbody>\
             <tr class=\"markdown-tr\"><td class=\"markdown-td\">a</td></tr>\
             <tr class=\"markdown-tr\"><td class=\"markdown-td\">b</td></tr></tbody></table>\n\n\
             <table class=\"markdown-table\"><tbody>\
             <tr class=\"markdown-tr\"><td class=\"markdown-td\">c</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_blockquote_matches_escaped_marker() {
        assert_eq!(
            Blockquotes.apply("&gt; quoted"),
            "<blockquote class=\"markdown-blockquote\">quoted</blockquote>"
        );
        assert_eq!(Blockquotes.apply("&gt;tight"), "&gt;tight");
    }

    #[test]
    fn test_horizontal_rules() {
        assert_eq!(
            HorizontalRules.apply("---\n***\n___\n--"),
            "<hr class=\"markdown-hr\" />\n<hr class=\"markdown-hr\" />\n<hr class=\"markdown-hr\" />\n--"
        );
        assert_eq!(HorizontalRules.apply("-*-"), "-*-");
    }
}
