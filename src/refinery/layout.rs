// * Display reflow
// * Turns cleaned page text into lightly structured blocks: upper-cased headers,
// * renumbered steps, flagged code lines and notes. Output is capped at a fixed
// * number of blocks.

use crate::config::constants::MAX_DISPLAY_BLOCKS;

// * Characters dropped from a step line. Assumes two-character markers ("1.", "- ", "* "),
// * so "-item" loses its first letter and "10." is not a step marker at all.
const STEP_MARKER_WIDTH: usize = 2;
const NOTE_PREFIX: &str = "note:";

fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

/// Reflows every non-blank line, keeps the first `MAX_DISPLAY_BLOCKS` blocks and
/// joins them with a blank line. The step counter runs across the whole text.
pub fn format_for_display(text: &str) -> String {
    format_with_cap(text, MAX_DISPLAY_BLOCKS)
}

pub fn format_with_cap(text: &str, max_blocks: usize) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut step_counter = 1;

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let block = if line.ends_with(':') {
            format!("\n{}", line.to_uppercase())
        } else if line.starts_with("1.") || line.starts_with('-') || line.starts_with('*') {
            let step = format!("{}. {}", step_counter, skip_chars(line, STEP_MARKER_WIDTH).trim());
            step_counter += 1;
            step
        } else if line.contains('`') {
            format!("Code example: `{}`", line)
        } else if line.to_lowercase().starts_with(NOTE_PREFIX) {
            format!("Note: {}", skip_chars(line, NOTE_PREFIX.len()))
        } else {
            line.to_string()
        };

        blocks.push(block);
    }

    blocks.truncate(max_blocks);
    blocks.join("\n\n")
}

/// Number of display blocks in formatted output
pub fn count_blocks(formatted: &str) -> usize {
    if formatted.is_empty() {
        return 0;
    }
    // * Headers carry a leading newline, so a plain split would over-count them
    formatted.split("\n\n").filter(|b| !b.trim().is_empty()).count()
}
