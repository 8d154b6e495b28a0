#![forbid(unsafe_code)]

//! Buffer to plain-text conversion, used by tests and snapshot tooling.

use crate::buffer::Buffer;

/// Convert a `Buffer` to a plain text string.
///
/// Each row becomes one line. Empty cells become spaces and continuation
/// cells are skipped, so wide characters keep their natural display width.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let capacity = (buf.width() as usize + 1) * buf.height() as usize;
    let mut out = String::with_capacity(capacity);

    for y in 0..buf.height() {
        if y > 0 {
            out.push('\n');
        }
        for cell in buf.row_cells(y) {
            if cell.is_continuation() {
                continue;
            }
            out.push(cell.content.as_char().unwrap_or(' '));
        }
    }
    out
}

/// Like [`buffer_to_text`] with trailing spaces removed from every line.
pub fn buffer_to_trimmed_lines(buf: &Buffer) -> Vec<String> {
    buffer_to_text(buf)
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}
