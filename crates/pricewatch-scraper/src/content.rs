//! Boilerplate-stripping main-content extraction.
//!
//! Picks the most likely content root (`main`, `article`, ...) and renders
//! it as newline-separated text blocks, dropping navigation, page chrome,
//! forms, and consent banners along the way.

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;
use crate::text::collapse_whitespace;

/// Content roots tried in order; `body` is the last resort.
const CONTENT_ROOTS: [&str; 6] = [
    "main",
    "article",
    "[role=main]",
    "#content",
    ".content",
    "body",
];

const SKIPPED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "template", "svg", "nav", "header", "footer", "aside", "form",
    "iframe",
];

/// `id`/`class` fragments marking overlays rather than content.
const SKIPPED_MARKERS: [&str; 4] = ["cookie", "consent", "newsletter", "breadcrumb"];

const BLOCK_TAGS: [&str; 27] = [
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

/// Extracts the main textual content of a page, one block per line.
///
/// Returns `Ok(None)` when the page has no readable content left after
/// stripping.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidSelector`] if a content-root selector
/// fails to parse.
pub fn main_content(document: &Html) -> Result<Option<String>, ExtractionError> {
    let Some(root) = find_content_root(document)? else {
        return Ok(None);
    };

    let rendered = render_blocks(root);
    let lines: Vec<String> = rendered
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(lines.join("\n")))
    }
}

fn find_content_root(document: &Html) -> Result<Option<ElementRef<'_>>, ExtractionError> {
    for css in CONTENT_ROOTS {
        let selector = parse_selector(css)?;
        if let Some(root) = document.select(&selector).next() {
            return Ok(Some(root));
        }
    }
    Ok(None)
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        selector: css.to_owned(),
        reason: e.to_string(),
    })
}

fn render_blocks(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_children(root, &mut out);
    out
}

/// Block elements get a line break on both sides, so text trailing a
/// closed block lands on its own line.
fn render_children(parent: ElementRef<'_>, out: &mut String) {
    for child in parent.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(element) = ElementRef::wrap(child) else {
            continue;
        };
        let el = element.value();
        if SKIPPED_TAGS.contains(&el.name())
            || el.id().is_some_and(is_boilerplate_marker)
            || el.classes().any(is_boilerplate_marker)
        {
            continue;
        }

        let block = el.name() == "br" || BLOCK_TAGS.contains(&el.name());
        if block {
            out.push('\n');
        }
        render_children(element, out);
        if block {
            out.push('\n');
        }
    }
}

fn is_boilerplate_marker(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    SKIPPED_MARKERS.iter().any(|marker| lower.contains(marker))
}
