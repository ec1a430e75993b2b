// * DOM Tree Shaking & Content Region Selection
// * Strips excluded regions (nav, footers, sidebars) from the parsed page, then picks the
// * first configured selector whose first match carries visible text.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::RefineryError;

static SELECTOR_BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// The part of the page handed to text conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRegion {
    /// Serialized HTML of the chosen region
    pub html: String,
    /// Selector that produced the region; `None` means the body/document fallback
    pub matched_selector: Option<String>,
}

fn parse_selector(raw: &str) -> Result<Selector, RefineryError> {
    Selector::parse(raw).map_err(|_| RefineryError::InvalidSelector(raw.to_string()))
}

fn has_visible_text(element: &ElementRef) -> bool {
    element.text().any(|t| !t.trim().is_empty())
}

/// Removes every element matched by any exclude selector. Class selectors (`.name`)
/// match by CSS class, bare tokens by tag name.
pub fn strip_excluded(document: &mut Html, exclude_selectors: &[String]) -> Result<usize, RefineryError> {
    let mut removed = 0;

    for raw in exclude_selectors {
        let selector = parse_selector(raw)?;
        let doomed: Vec<_> = document.select(&selector).map(|el| el.id()).collect();

        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
    }

    Ok(removed)
}

/// Parses a page, strips excluded regions and returns the content region.
///
/// Each content selector only considers its first match in document order; an empty
/// first match moves on to the next selector. With no usable match the `<body>` is
/// used, or the whole document when there is no body.
pub fn select_content_region(
    html: &str,
    content_selectors: &[String],
    exclude_selectors: &[String],
) -> Result<ContentRegion, RefineryError> {
    let mut document = Html::parse_document(html);
    let removed = strip_excluded(&mut document, exclude_selectors)?;
    tracing::debug!(removed, "Stripped excluded regions");

    for raw in content_selectors {
        let selector = parse_selector(raw)?;
        if let Some(element) = document.select(&selector).next() {
            if has_visible_text(&element) {
                return Ok(ContentRegion {
                    html: element.html(),
                    matched_selector: Some(raw.clone()),
                });
            }
        }
    }

    // * Fallback: whole body, or the document itself
    let html = match document.select(&SELECTOR_BODY).next() {
        Some(body) => body.html(),
        None => document.html(),
    };

    Ok(ContentRegion {
        html,
        matched_selector: None,
    })
}
