use crate::config::LayoutConfig;
use crate::theme::NodeStyle;

use super::TextBlock;

const ELLIPSIS_LINE: &str = "...";
const MAX_LABEL_LINES: usize = 4;

/// Characters that fit on one line of a box, from its pixel width and font size.
pub fn max_chars_per_line(style: &NodeStyle, config: &LayoutConfig) -> usize {
    let char_width = style.font_size * config.char_width_factor;
    if char_width <= 0.0 {
        return 1;
    }
    ((style.box_width / char_width) as usize).max(1)
}

/// Greedy word wrap. A word that does not fit on the current line starts a new one;
/// an oversized word gets a line of its own. Output is capped at four lines, with the
/// fourth replaced by `"..."` when the label runs longer.
pub fn wrap_label(label: &str, max_chars_per_line: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in label.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > max_chars_per_line {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(current);
    }

    if lines.len() > MAX_LABEL_LINES {
        lines.truncate(MAX_LABEL_LINES - 1);
        lines.push(ELLIPSIS_LINE.to_string());
    }
    lines
}

pub(super) fn label_block(label: &str, style: &NodeStyle, config: &LayoutConfig) -> TextBlock {
    let lines = wrap_label(label, max_chars_per_line(style, config));
    let line_height = style.font_size * config.label_line_height;
    let height = lines.len() as f32 * line_height;
    TextBlock {
        lines,
        line_height,
        height,
    }
}
