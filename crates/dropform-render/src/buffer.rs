#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! Cells are stored row-major: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A wide character is written whole or not at all; its tail cells are
//!    always [`Cell::CONTINUATION`]

use crate::cell::Cell;
use dropform_core::geometry::Rect;

/// A 2D grid of terminal cells.
///
/// ```
/// use dropform_render::buffer::Buffer;
/// use dropform_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// assert_eq!(buffer.get(0, 0).and_then(|c| c.content.as_char()), Some('H'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with default cells. Zero sizes are allowed and
    /// produce a buffer that ignores every write.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Cell at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable cell at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell. Out-of-bounds writes are ignored, and so is a wide
    /// character whose tail would fall off the right edge.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1);
        if x as usize + width > self.width as usize || y >= self.height {
            return;
        }

        for i in 0..width {
            self.clear_overlap(x + i as u16, y);
        }

        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
        for i in 1..width {
            if let Some(idx) = self.index(x + i as u16, y) {
                self.cells[idx] = Cell::CONTINUATION;
            }
        }
    }

    /// Before overwriting (x, y), blank any wide character that owns it.
    fn clear_overlap(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else { return };
        let current = self.cells[idx];

        if current.content.width() > 1 {
            for i in 1..current.content.width() {
                if let Some(tail) = self.index(x + i as u16, y)
                    && self.cells[tail].is_continuation()
                {
                    self.cells[tail] = Cell::default();
                }
            }
        } else if current.is_continuation() {
            let mut head_x = x;
            while head_x > 0 {
                head_x -= 1;
                let Some(head) = self.index(head_x, y) else { break };
                if !self.cells[head].is_continuation() {
                    let head_width = self.cells[head].content.width();
                    self.cells[head] = Cell::default();
                    for i in 1..head_width {
                        if let Some(tail) = self.index(head_x + i as u16, y) {
                            self.cells[tail] = Cell::default();
                        }
                    }
                    break;
                }
            }
        }
    }

    /// Fill the part of `rect` inside the buffer with `cell`.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = self.bounds().intersection(&rect);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y` (empty when out of bounds).
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_blank() {
        let buf = Buffer::new(4, 2);
        assert_eq!(buf.cells().len(), 8);
        assert!(buf.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn zero_sized_buffer_ignores_writes() {
        let mut buf = Buffer::new(0, 0);
        buf.set(0, 0, Cell::from_char('x'));
        assert!(buf.get(0, 0).is_none());
    }

    #[test]
    fn set_out_of_bounds_is_noop() {
        let mut buf = Buffer::new(2, 2);
        buf.set(5, 5, Cell::from_char('x'));
        assert!(buf.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn wide_char_writes_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.set(1, 0, Cell::from_char('漢'));
        assert_eq!(buf.get(1, 0).unwrap().content.as_char(), Some('漢'));
        assert!(buf.get(2, 0).unwrap().is_continuation());
    }

    #[test]
    fn wide_char_at_edge_is_dropped() {
        let mut buf = Buffer::new(2, 1);
        buf.set(1, 0, Cell::from_char('漢'));
        assert!(buf.get(1, 0).unwrap().is_empty());
    }

    #[test]
    fn overwriting_tail_clears_head() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('漢'));
        buf.set(1, 0, Cell::from_char('a'));
        assert!(buf.get(0, 0).unwrap().is_empty());
        assert_eq!(buf.get(1, 0).unwrap().content.as_char(), Some('a'));
    }

    #[test]
    fn overwriting_head_clears_tail() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('漢'));
        buf.set(0, 0, Cell::from_char('b'));
        assert!(buf.get(1, 0).unwrap().is_empty());
    }

    #[test]
    fn fill_clips_to_bounds() {
        let mut buf = Buffer::new(3, 3);
        buf.fill(Rect::new(2, 2, 10, 10), Cell::from_char('#'));
        assert_eq!(buf.get(2, 2).unwrap().content.as_char(), Some('#'));
        assert!(buf.get(1, 1).unwrap().is_empty());
    }

    #[test]
    fn row_cells_out_of_range_is_empty() {
        let buf = Buffer::new(3, 1);
        assert_eq!(buf.row_cells(0).len(), 3);
        assert!(buf.row_cells(1).is_empty());
    }
}
