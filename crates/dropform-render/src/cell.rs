#![forbid(unsafe_code)]

//! Cell types.
//!
//! A [`Cell`] is one terminal grid position. Wide characters occupy a head
//! cell holding the character and one or more [`CellContent::Continuation`]
//! cells to its right.

use unicode_width::UnicodeWidthChar;

/// What a cell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    /// Nothing drawn (renders as a space).
    #[default]
    Empty,
    /// A single character.
    Char(char),
    /// Trailing cell of a wide character to the left.
    Continuation,
}

impl CellContent {
    /// Display width in cells. Empty and continuation cells report 0.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            Self::Char(c) => c.width().unwrap_or(1).max(1),
            Self::Empty | Self::Continuation => 0,
        }
    }

    /// The character, if this cell holds one.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Empty | Self::Continuation => None,
        }
    }
}

/// A compact RGBA color, laid out as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);

    /// Create an opaque RGB color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }
}

bitflags::bitflags! {
    /// 8-bit cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD          = 0b0000_0001;
        const DIM           = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const UNDERLINE     = 0b0000_1000;
        const REVERSE       = 0b0010_0000;
        const STRIKETHROUGH = 0b0100_0000;
    }
}

impl Default for StyleFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One terminal grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub content: CellContent,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub flags: StyleFlags,
}

impl Cell {
    /// Placeholder written to the tail of wide characters.
    pub const CONTINUATION: Self = Self {
        content: CellContent::Continuation,
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        flags: StyleFlags::empty(),
    };

    /// A cell with the given content and default colors.
    #[inline]
    pub fn new(content: CellContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// A cell holding one character.
    #[inline]
    pub fn from_char(c: char) -> Self {
        Self::new(CellContent::Char(c))
    }

    /// True if nothing is drawn here.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }

    /// True for the trailing cells of a wide character.
    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.content == CellContent::Continuation
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: CellContent::Empty,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::TRANSPARENT,
            flags: StyleFlags::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_channels_round_trip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    }

    #[test]
    fn content_widths() {
        assert_eq!(CellContent::Char('a').width(), 1);
        assert_eq!(CellContent::Char('漢').width(), 2);
        assert_eq!(CellContent::Empty.width(), 0);
        assert_eq!(CellContent::Continuation.width(), 0);
    }

    #[test]
    fn default_cell_is_empty() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert!(!cell.is_continuation());
        assert_eq!(cell.fg, PackedRgba::WHITE);
    }

    #[test]
    fn continuation_is_not_empty() {
        assert!(!Cell::CONTINUATION.is_empty());
        assert!(Cell::CONTINUATION.is_continuation());
    }
}
