// * HTML -> plain text conversion
// * Links keep their targets inline as [text](href); images, scripts and styles are dropped.
// * No wrapping is applied, so one source block stays on one line.
// * Markdown backslash escapes are undone so literal text ("user_id", "2*3") survives verbatim.

use htmd::HtmlToMarkdown;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::RefineryError;

static PATTERN_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid blank-run regex"));

static PATTERN_SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("Invalid space-run regex"));

// * `(^)?` marks an escape at the start of a line
static PATTERN_MD_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^)?\\([\\`*_{}\[\]()<>#+\-.!|~])").expect("Invalid markdown-escape regex")
});

const SKIPPED_TAGS: &[&str] = &["img", "script", "style", "noscript"];

/// Converts an HTML fragment to text
pub fn html_to_text(html: &str) -> Result<String, RefineryError> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();

    let markdown = converter.convert(html)?;
    Ok(unescape_markdown(&markdown))
}

/// Drops the backslash from Markdown escapes. A line-leading `\-` or `\+` keeps it,
/// so list-marker-looking text is not mistaken for a step later on.
pub fn unescape_markdown(text: &str) -> String {
    PATTERN_MD_ESCAPE
        .replace_all(text, |caps: &Captures| {
            let escaped = &caps[2];
            if caps.get(1).is_some() && (escaped == "-" || escaped == "+") {
                format!("\\{}", escaped)
            } else {
                escaped.to_string()
            }
        })
        .into_owned()
}

/// Collapses 3+ newlines to exactly two and 2+ spaces to one
pub fn collapse_whitespace(text: &str) -> String {
    let text = PATTERN_BLANK_RUN.replace_all(text, "\n\n");
    PATTERN_SPACE_RUN.replace_all(&text, " ").into_owned()
}
