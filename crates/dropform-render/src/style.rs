#![forbid(unsafe_code)]

//! Styles: optional foreground, background and attribute overrides.

use crate::cell::{Cell, PackedRgba, StyleFlags};

/// A partial style. `None` fields leave the target cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags, keeping any already set.
    #[must_use]
    pub fn add(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.add(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.add(StyleFlags::DIM)
    }

    #[must_use]
    pub fn underline(self) -> Self {
        self.add(StyleFlags::UNDERLINE)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.add(StyleFlags::REVERSE)
    }

    /// True when applying this style changes nothing.
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: match (self.attrs, other.attrs) {
                (Some(a), Some(b)) => Some(a | b),
                (a, b) => b.or(a),
            },
        }
    }

    /// Apply to a cell, preserving its content.
    pub fn apply(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(attrs) = self.attrs {
            cell.flags |= attrs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_sets_fg_and_keeps_content() {
        let mut cell = Cell::from_char('Z');
        Style::new().fg(PackedRgba::RED).apply(&mut cell);
        assert_eq!(cell.fg, PackedRgba::RED);
        assert_eq!(cell.content.as_char(), Some('Z'));
    }

    #[test]
    fn empty_style_is_noop() {
        let mut cell = Cell::default();
        Style::default().apply(&mut cell);
        assert_eq!(cell, Cell::default());
        assert!(Style::default().is_empty());
    }

    #[test]
    fn attrs_accumulate() {
        let style = Style::new().bold().underline();
        assert_eq!(
            style.attrs,
            Some(StyleFlags::BOLD | StyleFlags::UNDERLINE)
        );
    }

    #[test]
    fn patch_prefers_other() {
        let base = Style::new().fg(PackedRgba::WHITE).bold();
        let top = Style::new().fg(PackedRgba::RED).dim();
        let merged = base.patch(top);
        assert_eq!(merged.fg, Some(PackedRgba::RED));
        assert_eq!(merged.attrs, Some(StyleFlags::BOLD | StyleFlags::DIM));
    }
}
