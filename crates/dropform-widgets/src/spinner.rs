#![forbid(unsafe_code)]

//! Spinner widget, shown on the submit control while the form is busy.

use crate::{StatefulWidget, draw_text_span, set_style_area};
use dropform_core::geometry::Rect;
use dropform_render::buffer::Buffer;
use dropform_render::style::Style;

/// Braille dot spinner animation frames.
pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// ASCII line spinner animation frames.
pub const LINE: &[&str] = &["|", "/", "-", "\\"];

/// A widget to display a spinner.
#[derive(Debug, Clone)]
pub struct Spinner<'a> {
    style: Style,
    frames: &'a [&'a str],
    label: Option<&'a str>,
}

impl Default for Spinner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Spinner<'a> {
    /// Create a new spinner with default dot frames.
    pub fn new() -> Self {
        Self {
            style: Style::default(),
            frames: DOTS,
            label: None,
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn frames(mut self, frames: &'a [&'a str]) -> Self {
        self.frames = frames;
        self
    }

    /// Text drawn one cell after the frame.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Cells needed to draw the frame and label.
    pub fn width(&self) -> u16 {
        let frame = self
            .frames
            .iter()
            .map(|f| crate::display_width(f))
            .max()
            .unwrap_or(0);
        let label = self.label.map_or(0, |l| crate::display_width(l) + 1);
        (frame + label).min(u16::MAX as usize) as u16
    }
}

/// Mutable state for a [`Spinner`] widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpinnerState {
    /// Index of the currently displayed animation frame.
    pub current_frame: usize,
}

impl SpinnerState {
    /// Advance to the next animation frame.
    pub fn tick(&mut self) {
        self.current_frame = self.current_frame.wrapping_add(1);
    }
}

impl StatefulWidget for Spinner<'_> {
    type State = SpinnerState;

    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let _span = dropform_core::debug_span!(
            "widget_render",
            widget = "Spinner",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() || self.frames.is_empty() {
            return;
        }

        set_style_area(buf, area, self.style);

        let frame = self.frames[state.current_frame % self.frames.len()];
        let mut x = draw_text_span(buf, area.x, area.y, frame, self.style, area.right());

        if let Some(label) = self.label {
            x = x.saturating_add(1);
            draw_text_span(buf, x, area.y, label, self.style, area.right());
        }
    }
}
