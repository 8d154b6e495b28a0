#![forbid(unsafe_code)]

//! File drop targets.
//!
//! A drop zone is a dashed box that shows either a hint or the name of the
//! file dropped on it. Which files a zone accepts is an [`AcceptList`];
//! whether that list is enforced when the file arrives or only when the form
//! is submitted is a [`DropPolicy`].

use crate::value::FileHandle;
use crate::{Widget, draw_text_span, set_style_area};
use dropform_core::geometry::Rect;
use dropform_render::buffer::Buffer;
use dropform_render::cell::Cell;
use dropform_render::style::Style;

/// Hint shown in an empty drop zone without its own placeholder.
pub const DEFAULT_DROP_HINT: &str = "Drop a file here";

/// Rows a drop zone needs: top border, content, bottom border.
pub const DROP_ZONE_HEIGHT: u16 = 3;

/// File extensions a drop target accepts. An empty list accepts anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcceptList {
    extensions: Vec<String>,
}

impl AcceptList {
    /// Build from extensions, with or without the leading dot, any case.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !out.contains(&ext) {
                out.push(ext);
            }
        }
        Self { extensions: out }
    }

    /// Parse a comma or whitespace separated list such as `".jpg,.jpeg,.png"`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(|c: char| c == ',' || c.is_whitespace()))
    }

    /// `.jpg`, `.jpeg` and `.png`.
    pub fn images() -> Self {
        Self::new(["jpg", "jpeg", "png"])
    }

    /// Accept every file.
    pub fn any() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    pub fn is_any(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn accepts(&self, file: &FileHandle) -> bool {
        if self.is_any() {
            return true;
        }
        file.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }

    /// Human-readable form, e.g. `.jpg, .jpeg, .png`.
    pub fn describe(&self) -> String {
        if self.is_any() {
            return "any file".to_string();
        }
        self.extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for AcceptList {
    fn default() -> Self {
        Self::images()
    }
}

/// When the accept list is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropPolicy {
    /// Any file is stored on drop; the accept list is checked on submit.
    #[default]
    Advisory,
    /// Files outside the accept list are refused on drop and the field
    /// shows the error immediately.
    Strict,
}

/// A dashed box showing the current file of a file field.
///
/// The file is passed in explicitly so the box always reflects the
/// current value, including one supplied as an initial value.
#[derive(Debug, Clone)]
pub struct DropZone<'a> {
    file: Option<&'a FileHandle>,
    hint: &'a str,
    style: Style,
    hint_style: Style,
    border_style: Style,
}

impl<'a> DropZone<'a> {
    pub fn new(file: Option<&'a FileHandle>) -> Self {
        Self {
            file,
            hint: DEFAULT_DROP_HINT,
            style: Style::default(),
            hint_style: Style::default(),
            border_style: Style::default(),
        }
    }

    /// Text shown while empty.
    #[must_use]
    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = hint;
        self
    }

    /// Style for the whole box and the file name.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn hint_style(mut self, style: Style) -> Self {
        self.hint_style = style;
        self
    }

    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    fn draw_border(&self, area: Rect, buf: &mut Buffer) {
        let style = self.style.patch(self.border_style);
        let put = |buf: &mut Buffer, x: u16, y: u16, c: char| {
            let mut cell = Cell::from_char(c);
            style.apply(&mut cell);
            buf.set(x, y, cell);
        };

        let right = area.right() - 1;
        let bottom = area.bottom() - 1;
        for x in area.x + 1..right {
            put(buf, x, area.y, '╌');
            put(buf, x, bottom, '╌');
        }
        for y in area.y + 1..bottom {
            put(buf, area.x, y, '╎');
            put(buf, right, y, '╎');
        }
        put(buf, area.x, area.y, '┌');
        put(buf, right, area.y, '┐');
        put(buf, area.x, bottom, '└');
        put(buf, right, bottom, '┘');
    }
}

impl Widget for DropZone<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let _span = dropform_core::debug_span!(
            "widget_render",
            widget = "DropZone",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        set_style_area(buf, area, self.style);

        let (text, text_style) = match self.file {
            Some(file) => (file.name.as_str(), self.style),
            None => (self.hint, self.style.patch(self.hint_style)),
        };

        // Too small for a border: just the text.
        if area.width < 3 || area.height < 3 {
            draw_text_span(buf, area.x, area.y, text, text_style, area.right());
            return;
        }

        self.draw_border(area, buf);

        let inner_left = area.x + 2;
        let inner_right = area.right().saturating_sub(2);
        let inner_width = inner_right.saturating_sub(inner_left);
        let text_width = crate::display_width(text).min(inner_width as usize) as u16;
        let x = inner_left + (inner_width - text_width) / 2;
        let y = area.y + (area.height - 1) / 2;
        draw_text_span(buf, x, y, text, text_style, inner_right);
    }
}
