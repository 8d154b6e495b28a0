#![forbid(unsafe_code)]

//! Span grid layout.
//!
//! Forms lay their fields out on a fixed number of equal columns. Each item
//! claims `span` columns and items are auto-placed in order: an item that
//! does not fit in what is left of the current row starts a new row. Below
//! a collapse width the grid degrades to a single stacked column.
//!
//! ```
//! use dropform_core::geometry::Rect;
//! use dropform_layout::{GridItem, SpanGrid};
//!
//! let grid = SpanGrid::default();
//! let rects = grid.split(
//!     Rect::from_size(80, 10),
//!     &[GridItem::new(2, 3), GridItem::new(2, 3), GridItem::new(4, 3)],
//! );
//! assert_eq!(rects[0].y, rects[1].y);
//! assert!(rects[2].y > rects[0].y);
//! ```

use dropform_core::geometry::Rect;

/// How the grid arranges items at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridMode {
    /// Items keep their spans.
    Columns,
    /// Every item takes a full row.
    Stacked,
}

impl GridMode {
    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            GridMode::Columns => "columns",
            GridMode::Stacked => "stacked",
        }
    }
}

impl std::fmt::Display for GridMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One item to place: how many columns it wants and how tall it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridItem {
    pub span: u16,
    pub height: u16,
}

impl GridItem {
    pub const fn new(span: u16, height: u16) -> Self {
        Self { span, height }
    }
}

/// Where an item landed, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Zero-based row index.
    pub row: u16,
    /// Zero-based first column.
    pub column: u16,
    /// Columns covered (already clamped).
    pub span: u16,
}

/// A fixed-column grid with sequential auto-placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanGrid {
    columns: u16,
    column_gap: u16,
    row_gap: u16,
    collapse_below: u16,
}

impl SpanGrid {
    /// Four columns, gap 2, no row gap, stacked below 40 columns.
    pub const DEFAULT: Self = Self {
        columns: 4,
        column_gap: 2,
        row_gap: 0,
        collapse_below: 40,
    };

    /// A grid with `columns` columns (at least one) and default spacing.
    pub const fn new(columns: u16) -> Self {
        Self {
            columns: if columns == 0 { 1 } else { columns },
            ..Self::DEFAULT
        }
    }

    #[must_use]
    pub const fn column_gap(mut self, gap: u16) -> Self {
        self.column_gap = gap;
        self
    }

    #[must_use]
    pub const fn row_gap(mut self, gap: u16) -> Self {
        self.row_gap = gap;
        self
    }

    /// Widths strictly below `width` stack every item. Zero disables it.
    #[must_use]
    pub const fn collapse_below(mut self, width: u16) -> Self {
        self.collapse_below = width;
        self
    }

    #[inline]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    #[inline]
    pub const fn gap(&self) -> u16 {
        self.column_gap
    }

    /// Mode used for an area of the given width.
    #[inline]
    pub const fn mode_for(&self, width: u16) -> GridMode {
        if width < self.collapse_below {
            GridMode::Stacked
        } else {
            GridMode::Columns
        }
    }

    /// Span an item actually receives at `width`.
    #[inline]
    pub fn effective_span(&self, span: u16, width: u16) -> u16 {
        match self.mode_for(width) {
            GridMode::Stacked => self.columns,
            GridMode::Columns => span.clamp(1, self.columns),
        }
    }

    /// Sequentially auto-place spans into rows.
    pub fn place(&self, spans: &[u16], width: u16) -> Vec<Placement> {
        let mut out = Vec::with_capacity(spans.len());
        let mut row = 0u16;
        let mut column = 0u16;

        for &span in spans {
            let span = self.effective_span(span, width);
            if column + span > self.columns {
                row = row.saturating_add(1);
                column = 0;
            }
            out.push(Placement { row, column, span });
            column += span;
        }
        out
    }

    /// Width of each column for a track of `width` cells.
    ///
    /// Leftover cells from the integer division go to the leading columns,
    /// so the widths plus gaps never exceed `width`.
    pub fn column_widths(&self, width: u16) -> Vec<u16> {
        let cols = self.columns as usize;
        let total_gap = (self.columns as u32 - 1) * self.column_gap as u32;
        let available = (width as u32).saturating_sub(total_gap);
        let base = available / cols as u32;
        let rem = (available % cols as u32) as usize;

        (0..cols)
            .map(|i| (base + u32::from(i < rem)) as u16)
            .collect()
    }

    /// Number of rows the items occupy at `width`.
    pub fn row_count(&self, spans: &[u16], width: u16) -> u16 {
        self.place(spans, width)
            .last()
            .map_or(0, |p| p.row.saturating_add(1))
    }

    /// Height of every row: the tallest item placed in it.
    pub fn row_heights(&self, items: &[GridItem], width: u16) -> Vec<u16> {
        let spans: Vec<u16> = items.iter().map(|i| i.span).collect();
        let placements = self.place(&spans, width);
        let mut heights = vec![0u16; self.row_count(&spans, width) as usize];
        for (item, p) in items.iter().zip(&placements) {
            let h = &mut heights[p.row as usize];
            *h = (*h).max(item.height);
        }
        heights
    }

    /// Total height the items need at `width`, row gaps included.
    pub fn content_height(&self, items: &[GridItem], width: u16) -> u16 {
        let heights = self.row_heights(items, width);
        let gaps = (heights.len().saturating_sub(1) as u32) * self.row_gap as u32;
        let sum: u32 = heights.iter().map(|&h| h as u32).sum::<u32>() + gaps;
        sum.min(u16::MAX as u32) as u16
    }

    /// One rect per item, in order, clipped to `area`.
    ///
    /// Items that fall entirely outside the area get an empty rect.
    pub fn split(&self, area: Rect, items: &[GridItem]) -> Vec<Rect> {
        if items.is_empty() {
            return Vec::new();
        }

        let spans: Vec<u16> = items.iter().map(|i| i.span).collect();
        let placements = self.place(&spans, area.width);
        let widths = self.column_widths(area.width);
        let heights = self.row_heights(items, area.width);

        // Row tops relative to the area.
        let mut tops = Vec::with_capacity(heights.len());
        let mut y = 0u32;
        for h in &heights {
            tops.push(y);
            y += *h as u32 + self.row_gap as u32;
        }

        placements
            .iter()
            .zip(items)
            .map(|(p, item)| {
                let col = p.column as usize;
                let end = col + p.span as usize;
                let x_off: u32 = widths[..col].iter().map(|&w| w as u32).sum::<u32>()
                    + col as u32 * self.column_gap as u32;
                let w: u32 = widths[col..end].iter().map(|&w| w as u32).sum::<u32>()
                    + (p.span as u32 - 1) * self.column_gap as u32;
                let top = tops[p.row as usize];

                let rect = Rect::new(
                    clamp_u16(area.x as u32 + x_off),
                    clamp_u16(area.y as u32 + top),
                    clamp_u16(w),
                    item.height,
                );
                area.intersection(&rect)
            })
            .collect()
    }
}

impl Default for SpanGrid {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[inline]
fn clamp_u16(v: u32) -> u16 {
    v.min(u16::MAX as u32) as u16
}
