#![forbid(unsafe_code)]

//! Buffer presentation.
//!
//! [`Presenter`] writes a whole [`Buffer`] to a terminal writer, one row per
//! cursor move, tracking the current SGR state so runs of equally styled
//! cells emit a single style sequence.

use std::io::{self, BufWriter, Write};

use dropform_render::buffer::Buffer;
use dropform_render::cell::{Cell, PackedRgba, StyleFlags};

const BUFFER_CAPACITY: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    flags: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            flags: cell.flags,
        }
    }
}

/// State-tracked ANSI presenter.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// `None` = unknown, after a reset or before the first frame.
    current_style: Option<CellStyle>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
        }
    }

    /// Write every row of `buffer` and flush.
    pub fn present(&mut self, buffer: &Buffer) -> io::Result<()> {
        let _span = tracing::trace_span!(
            "present",
            width = buffer.width(),
            height = buffer.height()
        )
        .entered();

        // Synchronized output keeps the frame from tearing.
        self.writer.write_all(b"\x1b[?2026h")?;
        for y in 0..buffer.height() {
            write!(self.writer, "\x1b[{};1H", y + 1)?;
            for cell in buffer.row_cells(y) {
                self.emit_cell(cell)?;
            }
        }
        self.writer.write_all(b"\x1b[0m")?;
        self.current_style = None;
        self.writer.write_all(b"\x1b[?2026l")?;
        self.writer.flush()
    }

    /// Clear the screen and forget the tracked style.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\x1b[0m\x1b[2J")?;
        self.current_style = None;
        self.writer.flush()
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        if cell.is_continuation() {
            return Ok(());
        }
        let style = CellStyle::from_cell(cell);
        if self.current_style != Some(style) {
            self.emit_style(style)?;
            self.current_style = Some(style);
        }
        match cell.content.as_char() {
            Some(ch) => {
                let mut utf8 = [0u8; 4];
                self.writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())
            }
            None => self.writer.write_all(b" "),
        }
    }

    // Reset then apply: simpler than incremental SGR updates.
    fn emit_style(&mut self, style: CellStyle) -> io::Result<()> {
        self.writer.write_all(b"\x1b[0m")?;
        if style.fg.a() > 0 {
            write!(
                self.writer,
                "\x1b[38;2;{};{};{}m",
                style.fg.r(),
                style.fg.g(),
                style.fg.b()
            )?;
        }
        if style.bg.a() > 0 {
            write!(
                self.writer,
                "\x1b[48;2;{};{};{}m",
                style.bg.r(),
                style.bg.g(),
                style.bg.b()
            )?;
        }
        for (flag, code) in [
            (StyleFlags::BOLD, 1),
            (StyleFlags::DIM, 2),
            (StyleFlags::ITALIC, 3),
            (StyleFlags::UNDERLINE, 4),
            (StyleFlags::REVERSE, 7),
            (StyleFlags::STRIKETHROUGH, 9),
        ] {
            if style.flags.contains(flag) {
                write!(self.writer, "\x1b[{code}m")?;
            }
        }
        Ok(())
    }
}
