//! Plain-text renderings of parsed pages and bounded excerpts.

use scraper::{Html, Node};

/// Upper bound, in characters, for every `raw_text_extract`.
pub const EXTRACT_MAX_CHARS: usize = 500;

/// Appended to excerpts cut at [`EXTRACT_MAX_CHARS`].
pub const ELLIPSIS: &str = "...";

const SENTENCE_LIMIT: usize = 5;

const PRICING_KEYWORDS: [&str; 7] = [
    "pricing",
    "price",
    "cost",
    "plan",
    "subscription",
    "billing",
    "fee",
];

/// Elements whose text never reaches a reader.
const NON_VISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Every text node of the document, concatenated without separators.
///
/// Script and style content is included: many pricing pages ship their
/// plan table as hydration data.
#[must_use]
pub fn plain_text(document: &Html) -> String {
    document.root_element().text().collect()
}

/// Text of the document with script, style, noscript and template content
/// removed.
#[must_use]
pub fn visible_text(document: &Html) -> String {
    let root = document.root_element();
    let mut out = String::new();
    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| NON_VISIBLE_TAGS.contains(&el.name()))
            });
            if !hidden {
                out.push_str(text);
            }
        }
    }
    out
}

/// Replaces non-breaking and narrow no-break spaces with ASCII spaces.
///
/// Swedish and French price labels (`1 695 kr`) are usually typeset with
/// U+00A0 or U+202F between digit groups.
#[must_use]
pub fn normalize_spaces(text: &str) -> String {
    text.replace(['\u{a0}', '\u{202f}'], " ")
}

#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to `max_chars` characters and appends [`ELLIPSIS`] when
/// anything was removed.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Pricing-focused excerpt of the visible page text.
///
/// Keeps the first five sentences mentioning a pricing keyword; when none
/// do, keeps the first [`EXTRACT_MAX_CHARS`] characters. The result is
/// bounded by [`EXTRACT_MAX_CHARS`] plus [`ELLIPSIS`].
#[must_use]
pub fn pricing_excerpt(document: &Html) -> String {
    let cleaned = collapse_whitespace(&normalize_spaces(&visible_text(document)));
    excerpt_from_text(&cleaned)
}

pub(crate) fn excerpt_from_text(cleaned: &str) -> String {
    let sentences: Vec<&str> = cleaned
        .split('.')
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            PRICING_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .map(str::trim)
        .take(SENTENCE_LIMIT)
        .collect();

    let extract = if sentences.is_empty() {
        cleaned.chars().take(EXTRACT_MAX_CHARS).collect::<String>()
    } else {
        sentences.join(". ")
    };

    truncate_with_ellipsis(&extract, EXTRACT_MAX_CHARS)
}
