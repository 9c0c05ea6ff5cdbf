//! Visible-text extraction for job descriptions fetched from a URL.

use scraper::{Html, Selector};

/// Elements whose subtrees never contain job-description prose.
const CHROME_SELECTOR: &str = "script, style, header, footer, nav, aside";

/// Strips page chrome and returns the visible text, one fragment per line.
pub fn visible_text(html: &str) -> String {
    let mut document = Html::parse_document(html);

    let selector = Selector::parse(CHROME_SELECTOR).expect("static selector");
    let chrome: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in chrome {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
