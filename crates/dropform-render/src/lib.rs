#![forbid(unsafe_code)]

//! Render kernel: cells, styles and the cell buffer widgets draw into.

pub mod buffer;
pub mod cell;
pub mod style;
pub mod text;

pub use buffer::Buffer;
pub use cell::{Cell, CellContent, PackedRgba, StyleFlags};
pub use style::Style;
pub use text::{buffer_to_text, buffer_to_trimmed_lines};
