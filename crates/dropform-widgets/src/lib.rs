#![forbid(unsafe_code)]

//! Widgets for dropform: a schema-driven [`FormEngine`] with text inputs,
//! file drop targets, validation on submit and a busy-aware submit control.

pub mod dropzone;
pub mod form;
pub mod schema;
pub mod spinner;
pub mod validation;
pub mod value;

pub use dropzone::{AcceptList, DropPolicy, DropZone};
pub use form::{
    EngineBuilder, FieldError, Focus, FormEngine, FormLayout, FormStyles, SubmitOutcome,
};
pub use schema::{FieldDescriptor, FieldKind, FormSchema, SchemaError};
pub use spinner::{Spinner, SpinnerState};
pub use validation::{Rules, Ruleset, ValidationResult};
pub use value::{FieldValue, FileHandle, FormValues};

use dropform_core::geometry::Rect;
use dropform_render::buffer::Buffer;
use dropform_render::cell::Cell;
use dropform_render::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Buffer` within a given `Rect` and must
/// never write outside it.
pub trait Widget {
    /// Render the widget into the buffer at the given area.
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the buffer with mutable state.
    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut Self::State);
}

/// Apply a style to all cells in a rectangular area.
///
/// This modifies existing cells, preserving their content.
pub(crate) fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                style.apply(cell);
            }
        }
    }
}

/// Draw a text span into a buffer at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive).
pub(crate) fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x as usize + w > max_x as usize {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            style.apply(&mut cell);
            buf.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}

/// Display width of a string in cells.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Number of grapheme clusters in `s`.
pub(crate) fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte offset of the grapheme at `index`, or `s.len()` past the end.
pub(crate) fn grapheme_byte_offset(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map_or(s.len(), |(offset, _)| offset)
}

/// Display width of the first `index` graphemes.
pub(crate) fn grapheme_display_width(s: &str, index: usize) -> usize {
    s.graphemes(true).take(index).map(UnicodeWidthStr::width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropform_render::cell::PackedRgba;

    #[test]
    fn set_style_area_partial_rect() {
        let mut buf = Buffer::new(5, 5);
        let style = Style::new().fg(PackedRgba::rgb(99, 99, 99));
        set_style_area(&mut buf, Rect::new(1, 1, 2, 2), style);

        assert_eq!(buf.get(1, 1).unwrap().fg, PackedRgba::rgb(99, 99, 99));
        assert_eq!(buf.get(2, 2).unwrap().fg, PackedRgba::rgb(99, 99, 99));
        assert_ne!(buf.get(0, 0).unwrap().fg, PackedRgba::rgb(99, 99, 99));
    }

    #[test]
    fn set_style_area_empty_style_is_noop() {
        let mut buf = Buffer::new(2, 2);
        set_style_area(&mut buf, Rect::from_size(2, 2), Style::default());
        assert!(buf.cells().iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn draw_text_span_basic() {
        let mut buf = Buffer::new(10, 1);
        let end_x = draw_text_span(&mut buf, 0, 0, "ABC", Style::default(), 10);
        assert_eq!(end_x, 3);
        assert_eq!(buf.get(0, 0).unwrap().content.as_char(), Some('A'));
        assert_eq!(buf.get(2, 0).unwrap().content.as_char(), Some('C'));
    }

    #[test]
    fn draw_text_span_clipped_at_max_x() {
        let mut buf = Buffer::new(10, 1);
        let end_x = draw_text_span(&mut buf, 0, 0, "ABCDEF", Style::default(), 3);
        assert_eq!(end_x, 3);
        assert!(buf.get(3, 0).unwrap().is_empty());
    }

    #[test]
    fn draw_text_span_wide_char_does_not_straddle_edge() {
        let mut buf = Buffer::new(10, 1);
        let end_x = draw_text_span(&mut buf, 0, 0, "a漢", Style::default(), 2);
        assert_eq!(end_x, 1);
        assert!(buf.get(1, 0).unwrap().is_empty());
    }

    #[test]
    fn grapheme_helpers() {
        let s = "ae\u{301}漢";
        assert_eq!(grapheme_count(s), 3);
        assert_eq!(grapheme_byte_offset(s, 1), 1);
        assert_eq!(grapheme_byte_offset(s, 2), 4);
        assert_eq!(grapheme_byte_offset(s, 9), s.len());
        assert_eq!(grapheme_display_width(s, 3), 4);
    }
}
