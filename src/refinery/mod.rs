// * The Refinery (Extraction Pipeline)
// * Turns a fetched documentation page into display text:
// * 1. strip excluded regions and pick the content region (region)
// * 2. convert HTML to text and collapse whitespace (text)
// * 3. reflow into capped display blocks (layout)

pub mod layout;
pub mod region;
pub mod text;

pub use layout::{count_blocks, format_for_display};
pub use region::{select_content_region, ContentRegion};
pub use text::{collapse_whitespace, html_to_text, unescape_markdown};

use thiserror::Error;

use crate::knowledge::PlatformSpec;

#[derive(Debug, Error)]
pub enum RefineryError {
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("HTML conversion failed: {0}")]
    Conversion(#[from] std::io::Error),
}

/// Converts an HTML fragment into formatted display text
pub fn extract_text(html_fragment: &str) -> Result<String, RefineryError> {
    let raw = html_to_text(html_fragment)?;
    let cleaned = collapse_whitespace(&raw);
    Ok(format_for_display(&cleaned))
}

/// Full page pipeline using a platform's selectors
pub fn extract_document(html: &str, platform: &PlatformSpec) -> Result<String, RefineryError> {
    let region = select_content_region(
        html,
        platform.content_selectors(),
        platform.exclude_selectors(),
    )?;
    tracing::debug!(
        platform = platform.name(),
        selector = region.matched_selector.as_deref().unwrap_or("<body>"),
        "Selected content region"
    );
    extract_text(&region.html)
}
