#![forbid(unsafe_code)]

//! Layout and rendering for [`FormEngine`].
//!
//! ```text
//! Label            Label           <- text field: label,
//! value___________ value__________ <-   input,
//! error            error           <-   error
//! Avatar                           <- file field: label,
//! ┌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┐ <-   3-row drop box,
//! ╎        Drop a file here      ╎
//! └╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┘
//! error                            <-   error
//!                                  <- blank
//!            [ Submit ]            <- submit control
//! Toggle label                     <- toggle control
//! ```

use dropform_core::geometry::Rect;
use dropform_layout::GridItem;
use dropform_render::buffer::Buffer;
use dropform_render::cell::StyleFlags;
use dropform_render::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::{Focus, FormEngine};
use crate::dropzone::{DEFAULT_DROP_HINT, DROP_ZONE_HEIGHT, DropZone};
use crate::schema::{FieldDescriptor, FieldKind};
use crate::spinner::{LINE, Spinner};
use crate::{StatefulWidget, Widget, draw_text_span, set_style_area};

/// Rows of a text-like field: label, input, error.
pub const TEXT_FIELD_HEIGHT: u16 = 3;
/// Rows of a file field: label, drop box, error.
pub const FILE_FIELD_HEIGHT: u16 = 1 + DROP_ZONE_HEIGHT + 1;

const MASK: char = '•';

/// Where each part of a form lands for a given area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormLayout {
    /// One rect per field, in schema order. Empty when clipped away.
    pub fields: Vec<Rect>,
    pub submit: Rect,
    pub toggle: Rect,
}

impl FormEngine {
    fn grid_items(&self) -> Vec<GridItem> {
        self.schema
            .iter()
            .map(|f| GridItem::new(f.span, field_height(f.kind)))
            .collect()
    }

    /// Compute where fields and controls go inside `area`.
    pub fn layout(&self, area: Rect) -> FormLayout {
        let items = self.grid_items();
        let fields = self.grid.split(area, &items);
        let content = self.grid.content_height(&items, area.width);

        // Blank line, then submit, then toggle.
        let submit_y = area.y as u32 + content as u32 + 1;
        let row = |y: u32| {
            let y = y.min(u16::MAX as u32) as u16;
            area.intersection(&Rect::new(area.x, y, area.width, 1))
        };

        FormLayout {
            fields,
            submit: row(submit_y),
            toggle: row(submit_y + 1),
        }
    }

    /// Rows needed to draw the whole form at `width`.
    pub fn preferred_height(&self, width: u16) -> u16 {
        let content = self.grid.content_height(&self.grid_items(), width);
        content.saturating_add(3)
    }

    fn render_text_field(&self, index: usize, field: &FieldDescriptor, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == Focus::Field(index);
        self.render_label(field, focused, area, buf);

        let input = area.row(1);
        if !input.is_empty() {
            let input_style = if focused {
                self.styles.input.patch(self.styles.focused)
            } else {
                self.styles.input
            };
            set_style_area(buf, input, input_style);

            let value = self.text_at(index);
            if value.is_empty() {
                if let Some(placeholder) = &field.placeholder {
                    let style = input_style.patch(self.styles.placeholder);
                    draw_text_span(buf, input.x, input.y, placeholder, style, input.right());
                }
            } else {
                let shown = match field.kind {
                    FieldKind::Password => mask(value),
                    _ => value.to_string(),
                };
                let cursor = if focused { self.cursor } else { 0 };
                let (visible, cursor_col) = visible_window(&shown, cursor, input.width);
                draw_text_span(buf, input.x, input.y, visible, input_style, input.right());
                if focused {
                    self.draw_cursor(input, cursor_col, buf);
                }
            }
            if focused && value.is_empty() {
                self.draw_cursor(input, 0, buf);
            }
        }

        self.render_error(field, area.row(2), buf);
    }

    fn draw_cursor(&self, input: Rect, col: u16, buf: &mut Buffer) {
        let x = input.x.saturating_add(col);
        if x < input.right()
            && let Some(cell) = buf.get_mut(x, input.y)
        {
            cell.flags ^= StyleFlags::REVERSE;
        }
    }

    fn render_file_field(&self, index: usize, field: &FieldDescriptor, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == Focus::Field(index);
        self.render_label(field, focused, area, buf);

        let zone = Rect::new(
            area.x,
            area.y.saturating_add(1),
            area.width,
            DROP_ZONE_HEIGHT.min(area.height.saturating_sub(1)),
        );
        let border = if focused {
            self.styles.focused
        } else {
            Style::default()
        };
        DropZone::new(self.file_at(index))
            .hint(field.placeholder.as_deref().unwrap_or(DEFAULT_DROP_HINT))
            .hint_style(self.styles.placeholder)
            .border_style(border)
            .render(zone, buf);

        self.render_error(field, area.row(1 + DROP_ZONE_HEIGHT), buf);
    }

    fn render_label(&self, field: &FieldDescriptor, focused: bool, area: Rect, buf: &mut Buffer) {
        let row = area.row(0);
        if row.is_empty() {
            return;
        }
        let style = if focused {
            self.styles.label.patch(self.styles.focused)
        } else {
            self.styles.label
        };
        draw_text_span(buf, row.x, row.y, &field.label, style, row.right());
    }

    fn render_error(&self, field: &FieldDescriptor, row: Rect, buf: &mut Buffer) {
        if row.is_empty() {
            return;
        }
        if let Some(message) = self.errors.get(&field.name) {
            draw_text_span(buf, row.x, row.y, message, self.styles.error, row.right());
        }
    }

    fn render_submit(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        if self.busy {
            let style = self.styles.disabled;
            // The spinner frame stands in for the label.
            let spinner = Spinner::new().frames(LINE).style(style);
            let inner = spinner.width();
            let total = inner.saturating_add(4);
            let x = centered_x(area, total);
            let after_open = draw_text_span(buf, x, area.y, "[ ", style, area.right());
            let spin_area = area.intersection(&Rect::new(after_open, area.y, inner, 1));
            let mut state = self.spinner;
            spinner.render(spin_area, buf, &mut state);
            draw_text_span(
                buf,
                after_open.saturating_add(inner),
                area.y,
                " ]",
                style,
                area.right(),
            );
            return;
        }

        let text = format!("[ {} ]", self.submit_label);
        let style = if self.focus == Focus::Submit {
            self.styles.label.patch(self.styles.focused)
        } else {
            self.styles.label
        };
        let width = UnicodeWidthStr::width(text.as_str()).min(u16::MAX as usize) as u16;
        draw_text_span(buf, centered_x(area, width), area.y, &text, style, area.right());
    }

    fn render_toggle(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.toggle_label.is_empty() {
            return;
        }
        let style = if self.focus == Focus::Toggle {
            self.styles.toggle.patch(self.styles.focused)
        } else {
            self.styles.toggle
        };
        draw_text_span(buf, area.x, area.y, &self.toggle_label, style, area.right());
    }
}

impl Widget for FormEngine {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let _span = dropform_core::debug_span!(
            "widget_render",
            widget = "FormEngine",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        set_style_area(buf, area, self.styles.base);

        let layout = self.layout(area);
        for (index, (field, rect)) in self.schema.iter().zip(&layout.fields).enumerate() {
            if rect.is_empty() {
                continue;
            }
            match field.kind {
                FieldKind::Text | FieldKind::Password | FieldKind::Email => {
                    self.render_text_field(index, field, *rect, buf)
                }
                FieldKind::File => self.render_file_field(index, field, *rect, buf),
            }
        }
        self.render_submit(layout.submit, buf);
        self.render_toggle(layout.toggle, buf);
    }
}

fn field_height(kind: FieldKind) -> u16 {
    match kind {
        FieldKind::File => FILE_FIELD_HEIGHT,
        _ => TEXT_FIELD_HEIGHT,
    }
}

fn mask(value: &str) -> String {
    value.graphemes(true).map(|_| MASK).collect()
}

fn centered_x(area: Rect, width: u16) -> u16 {
    area.x + area.width.saturating_sub(width) / 2
}

/// The part of `text` to show in `width` cells so the cursor stays visible,
/// and the cursor column within it.
fn visible_window(text: &str, cursor: usize, width: u16) -> (&str, u16) {
    let width = width as usize;
    if width == 0 {
        return ("", 0);
    }
    let cursor_col = crate::grapheme_display_width(text, cursor);
    // Keep one cell for the cursor itself.
    let skip_cols = (cursor_col + 1).saturating_sub(width);
    if skip_cols == 0 {
        return (text, cursor_col as u16);
    }

    let mut skipped = 0;
    for (offset, g) in text.grapheme_indices(true) {
        if skipped >= skip_cols {
            return (&text[offset..], (cursor_col - skipped) as u16);
        }
        skipped += UnicodeWidthStr::width(g);
    }
    ("", 0)
}
