//! Strips non-content markup from raw HTML and collapses the remaining
//! text into a single plain-text blob suitable for prompting.

use once_cell::sync::Lazy;
use regex::Regex;
use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

/// Tags whose subtrees never carry question content: scripts, chrome,
/// interactive controls, embedded frames and vector graphics.
const STRIP_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "button", "form", "input", "select", "textarea",
    "noscript", "iframe", "svg", "link", "meta", "template",
];

/// Class names that mark UI chrome on the quiz platforms we ingest from.
const STRIP_CLASSES: &[&str] = &[
    "breadcrumb",
    "drawer-toggles",
    "notifications",
    "sidebar",
    "menu",
];

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract the textual content of `markup`, skipping structural/non-content
/// elements, with all whitespace runs collapsed to single spaces and no
/// leading/trailing whitespace.
pub fn normalize(markup: &str) -> String {
    let document = Html::parse_document(markup);

    let body_selector = Selector::parse("body").expect("static selector");
    let mut text = String::new();
    if let Some(body) = document.select(&body_selector).next() {
        collect_text(*body, &mut text);
    }

    collapse_whitespace(&text)
}

/// Collapse every whitespace run (including newlines) to a single space and
/// trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUNS.replace_all(text, " ").trim().to_string()
}

/// Hard cut at `max` characters. Not sentence-aware; the extraction prompt
/// tolerates a truncated tail.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(t) => {
            out.push_str(&t);
            out.push(' ');
        }
        Node::Element(el) => {
            if is_chrome(&el) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn is_chrome(el: &scraper::node::Element) -> bool {
    let name = el.name();
    if STRIP_TAGS.contains(&name) {
        return true;
    }
    el.classes()
        .any(|class| STRIP_CLASSES.contains(&class.to_ascii_lowercase().as_str()))
}
