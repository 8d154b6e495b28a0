#![forbid(unsafe_code)]

//! Focus and event handling for [`FormEngine`].

use dropform_core::drop::DropEvent;
use dropform_core::event::{Event, KeyCode, KeyEvent};

use super::{FileDrop, FormEngine};
use crate::schema::FieldKind;

/// The element that receives key input.
///
/// Focus cycles through every field in schema order, then the submit
/// control, then the toggle control. The submit control is skipped while
/// the form is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    /// Field at this schema index.
    Field(usize),
    Submit,
    Toggle,
}

impl FormEngine {
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Move focus to the field named `name`.
    pub fn focus_field(&mut self, name: &str) -> Result<(), super::FieldError> {
        let (index, _) = self.field(name)?;
        self.set_focus(Focus::Field(index));
        Ok(())
    }

    /// Move focus. Returns false if the target does not exist or is the
    /// disabled submit control.
    pub fn set_focus(&mut self, focus: Focus) -> bool {
        if !self.focus_ring().contains(&focus) {
            return false;
        }
        self.focus = focus;
        self.sync_cursor();
        true
    }

    /// Grapheme cursor position in the focused text field.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Focusable elements in order.
    pub fn focus_ring(&self) -> Vec<Focus> {
        let mut ring: Vec<Focus> = (0..self.schema.len()).map(Focus::Field).collect();
        if !self.busy {
            ring.push(Focus::Submit);
        }
        ring.push(Focus::Toggle);
        ring
    }

    pub(super) fn first_focus(&self) -> Focus {
        self.focus_ring().first().copied().unwrap_or(Focus::Toggle)
    }

    /// Position in the full (unfiltered) order, so focus can move on from
    /// an element that just left the ring.
    fn order(&self, focus: Focus) -> usize {
        let n = self.schema.len();
        match focus {
            Focus::Field(i) => i,
            Focus::Submit => n,
            Focus::Toggle => n + 1,
        }
    }

    pub fn focus_next(&mut self) {
        let ring = self.focus_ring();
        let current = self.order(self.focus);
        let next = ring
            .iter()
            .copied()
            .find(|f| self.order(*f) > current)
            .or_else(|| ring.first().copied());
        if let Some(next) = next {
            self.focus = next;
            self.sync_cursor();
        }
    }

    pub fn focus_prev(&mut self) {
        let ring = self.focus_ring();
        let current = self.order(self.focus);
        let prev = ring
            .iter()
            .rev()
            .copied()
            .find(|f| self.order(*f) < current)
            .or_else(|| ring.last().copied());
        if let Some(prev) = prev {
            self.focus = prev;
            self.sync_cursor();
        }
    }

    /// Put the cursor at the end of the newly focused text field.
    pub(super) fn sync_cursor(&mut self) {
        self.cursor = match self.focus {
            Focus::Field(i) => crate::grapheme_count(self.text_at(i)),
            _ => 0,
        };
    }

    fn focused_kind(&self) -> Option<(usize, FieldKind)> {
        match self.focus {
            Focus::Field(i) => self.schema.fields().get(i).map(|f| (i, f.kind)),
            _ => None,
        }
    }

    fn focused_text_field(&self) -> Option<usize> {
        self.focused_kind()
            .and_then(|(i, kind)| kind.is_text_like().then_some(i))
    }

    fn focused_file_field(&self) -> Option<usize> {
        self.focused_kind()
            .and_then(|(i, kind)| (kind == FieldKind::File).then_some(i))
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Handle an input event. Returns `true` if anything visible changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            Event::Paste(paste) => self.handle_paste(&paste.text),
            Event::Drop(drop) => self.handle_drop(drop),
            Event::Tick if self.busy => {
                self.tick();
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                true
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Char(' ') if matches!(self.focus, Focus::Submit | Focus::Toggle) => {
                self.activate()
            }
            KeyCode::Char(c) if !key.ctrl() => self.insert_text(&c.to_string()),
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_cursor(|cursor, _| cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor(|cursor, len| (cursor + 1).min(len)),
            KeyCode::Home => self.move_cursor(|_, _| 0),
            KeyCode::End => self.move_cursor(|_, len| len),
            _ => false,
        }
    }

    /// Enter on a field or the submit control submits unless busy; on the
    /// toggle control it toggles.
    fn activate(&mut self) -> bool {
        match self.focus {
            Focus::Toggle => {
                self.toggle();
                true
            }
            Focus::Field(_) | Focus::Submit => {
                if self.busy {
                    dropform_core::debug!("submit ignored while busy");
                    return false;
                }
                self.submit();
                true
            }
        }
    }

    fn handle_paste(&mut self, text: &str) -> bool {
        if self.focused_file_field().is_some() {
            return match DropEvent::from_paste(text) {
                Some(drop) => self.handle_drop(&drop),
                None => false,
            };
        }
        // Single-line inputs: line breaks become spaces.
        let flat: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.insert_text(&flat)
    }

    fn handle_drop(&mut self, drop: &DropEvent) -> bool {
        let Some(index) = self.focused_file_field() else {
            dropform_core::debug!(files = drop.len(), "drop ignored: no file field focused");
            return false;
        };
        match self.offer_files(index, drop.paths.iter().cloned()) {
            FileDrop::Stored | FileDrop::Refused => true,
            FileDrop::Empty | FileDrop::Unchanged => false,
        }
    }

    fn insert_text(&mut self, text: &str) -> bool {
        let Some(index) = self.focused_text_field() else {
            return false;
        };
        if text.is_empty() {
            return false;
        }
        let current = self.text_at(index);
        let offset = crate::grapheme_byte_offset(current, self.cursor);
        let before = crate::grapheme_count(current);
        let mut next = String::with_capacity(current.len() + text.len());
        next.push_str(&current[..offset]);
        next.push_str(text);
        next.push_str(&current[offset..]);
        let after = crate::grapheme_count(&next);

        let cursor = self.cursor + after.saturating_sub(before);
        self.store_text(index, next);
        self.cursor = cursor.min(after);
        true
    }

    fn delete_backward(&mut self) -> bool {
        if let Some(index) = self.focused_file_field() {
            return self.store_file(index, None);
        }
        let Some(index) = self.focused_text_field() else {
            return false;
        };
        if self.cursor == 0 {
            return false;
        }
        let current = self.text_at(index);
        let start = crate::grapheme_byte_offset(current, self.cursor - 1);
        let end = crate::grapheme_byte_offset(current, self.cursor);
        let next = format!("{}{}", &current[..start], &current[end..]);
        self.cursor -= 1;
        self.store_text(index, next);
        true
    }

    fn delete_forward(&mut self) -> bool {
        if let Some(index) = self.focused_file_field() {
            return self.store_file(index, None);
        }
        let Some(index) = self.focused_text_field() else {
            return false;
        };
        let current = self.text_at(index);
        if self.cursor >= crate::grapheme_count(current) {
            return false;
        }
        let start = crate::grapheme_byte_offset(current, self.cursor);
        let end = crate::grapheme_byte_offset(current, self.cursor + 1);
        let next = format!("{}{}", &current[..start], &current[end..]);
        self.store_text(index, next);
        true
    }

    fn move_cursor(&mut self, f: impl FnOnce(usize, usize) -> usize) -> bool {
        let Some(index) = self.focused_text_field() else {
            return false;
        };
        let len = crate::grapheme_count(self.text_at(index));
        let next = f(self.cursor, len);
        if next == self.cursor {
            return false;
        }
        self.cursor = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDescriptor, FormSchema};
    use dropform_core::event::{KeyEventKind, Modifiers, PasteEvent};
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    fn type_str(form: &mut FormEngine, s: &str) {
        for c in s.chars() {
            form.handle_event(&key(KeyCode::Char(c)));
        }
    }

    fn signup() -> FormEngine {
        FormEngine::new(
            FormSchema::new(vec![
                FieldDescriptor::text("first", "First").span(2),
                FieldDescriptor::text("last", "Last").span(2),
                FieldDescriptor::file("avatar", "Avatar"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn focus_starts_on_first_field() {
        assert_eq!(signup().focus(), Focus::Field(0));
    }

    #[test]
    fn tab_cycles_fields_then_controls() {
        let mut form = signup();
        let mut seen = vec![form.focus()];
        for _ in 0..5 {
            form.handle_event(&key(KeyCode::Tab));
            seen.push(form.focus());
        }
        assert_eq!(
            seen,
            [
                Focus::Field(0),
                Focus::Field(1),
                Focus::Field(2),
                Focus::Submit,
                Focus::Toggle,
                Focus::Field(0),
            ]
        );
    }

    #[test]
    fn backtab_wraps_to_toggle() {
        let mut form = signup();
        form.handle_event(&key(KeyCode::BackTab));
        assert_eq!(form.focus(), Focus::Toggle);
        form.handle_event(&key(KeyCode::Up));
        assert_eq!(form.focus(), Focus::Submit);
    }

    #[test]
    fn busy_skips_submit() {
        let mut form = signup();
        form.set_busy(true);
        form.set_focus(Focus::Field(2));
        form.handle_event(&key(KeyCode::Tab));
        assert_eq!(form.focus(), Focus::Toggle);
        assert!(!form.set_focus(Focus::Submit));
    }

    #[test]
    fn focus_leaves_submit_when_it_becomes_disabled() {
        let mut form = signup();
        form.set_focus(Focus::Submit);
        form.set_busy(true);
        form.handle_event(&key(KeyCode::Tab));
        assert_eq!(form.focus(), Focus::Toggle);
        form.set_focus(Focus::Toggle);
        form.handle_event(&key(KeyCode::BackTab));
        assert_eq!(form.focus(), Focus::Field(2));
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut form = signup();
        type_str(&mut form, "Ada");
        assert_eq!(form.values().text("first"), Some("Ada"));
        assert_eq!(form.cursor(), 3);

        form.handle_event(&key(KeyCode::Left));
        form.handle_event(&key(KeyCode::Backspace));
        assert_eq!(form.values().text("first"), Some("Aa"));
        form.handle_event(&key(KeyCode::Home));
        form.handle_event(&key(KeyCode::Delete));
        assert_eq!(form.values().text("first"), Some("a"));
        form.handle_event(&key(KeyCode::End));
        type_str(&mut form, "bc");
        assert_eq!(form.values().text("first"), Some("abc"));
    }

    #[test]
    fn cursor_moves_by_grapheme() {
        let mut form = signup();
        form.set_field_value("first", "e\u{301}x").unwrap();
        form.set_focus(Focus::Field(0));
        assert_eq!(form.cursor(), 2);
        form.handle_event(&key(KeyCode::Left));
        form.handle_event(&key(KeyCode::Backspace));
        assert_eq!(form.values().text("first"), Some("x"));
    }

    #[test]
    fn ctrl_chars_are_not_inserted() {
        let mut form = signup();
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert!(!form.handle_event(&ev));
        assert_eq!(form.values().text("first"), Some(""));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut form = signup();
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('x')).with_kind(KeyEventKind::Release));
        assert!(!form.handle_event(&ev));
        let ev = Event::Key(KeyEvent::new(KeyCode::Tab).with_kind(KeyEventKind::Release));
        assert!(!form.handle_event(&ev));
        assert_eq!(form.focus(), Focus::Field(0));
    }

    #[test]
    fn paste_inserts_single_line() {
        let mut form = signup();
        form.handle_event(&Event::Paste(PasteEvent::bracketed("Ada\nLovelace")));
        assert_eq!(form.values().text("first"), Some("Ada Lovelace"));
    }

    #[test]
    fn drop_on_focused_file_field() {
        let mut form = signup();
        form.set_focus(Focus::Field(2));
        let drop = DropEvent::new(vec![PathBuf::from("/p/a.png"), PathBuf::from("/p/b.png")]);
        assert!(form.handle_event(&Event::Drop(drop)));
        assert_eq!(form.values().file("avatar").map(|f| f.name.as_str()), Some("a.png"));
    }

    #[test]
    fn drop_elsewhere_is_ignored() {
        let mut form = signup();
        let drop = DropEvent::new(vec![PathBuf::from("/p/a.png")]);
        assert!(!form.handle_event(&Event::Drop(drop)));
        assert!(form.values().file("avatar").is_none());
        assert_eq!(form.values().text("first"), Some(""));
    }

    #[test]
    fn path_paste_on_file_field_is_a_drop() {
        let mut form = signup();
        form.set_focus(Focus::Field(2));
        assert!(form.handle_event(&Event::Paste(PasteEvent::bracketed("'/p/my photo.png'"))));
        assert_eq!(
            form.values().file("avatar").map(|f| f.name.as_str()),
            Some("my photo.png")
        );
        // Plain text is not a drop.
        assert!(!form.handle_event(&Event::Paste(PasteEvent::bracketed("hello"))));
    }

    #[test]
    fn backspace_clears_file() {
        let mut form = signup();
        form.set_file_value("avatar", ["/p/a.png"]).unwrap();
        form.set_focus(Focus::Field(2));
        assert!(form.handle_event(&key(KeyCode::Backspace)));
        assert!(form.values().file("avatar").is_none());
        assert!(!form.handle_event(&key(KeyCode::Delete)));
    }

    #[test]
    fn enter_submits_from_field() {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let schema = FormSchema::new(vec![FieldDescriptor::text("q", "Query")]).unwrap();
        let mut form = FormEngine::builder(schema)
            .on_submit(move |_| seen.set(seen.get() + 1))
            .build()
            .unwrap();
        assert!(form.handle_event(&key(KeyCode::Enter)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn enter_ignored_while_busy() {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let schema = FormSchema::new(vec![FieldDescriptor::text("q", "Query")]).unwrap();
        let mut form = FormEngine::builder(schema)
            .busy(true)
            .on_submit(move |_| seen.set(seen.get() + 1))
            .build()
            .unwrap();
        assert!(!form.handle_event(&key(KeyCode::Enter)));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn enter_and_space_on_toggle() {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let schema = FormSchema::new(vec![FieldDescriptor::text("q", "Query")]).unwrap();
        let mut form = FormEngine::builder(schema)
            .on_toggle(move || seen.set(seen.get() + 1))
            .build()
            .unwrap();
        form.set_focus(Focus::Toggle);
        form.handle_event(&key(KeyCode::Enter));
        form.handle_event(&key(KeyCode::Char(' ')));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn tick_only_matters_while_busy() {
        let mut form = signup();
        assert!(!form.handle_event(&Event::Tick));
        form.set_busy(true);
        assert!(form.handle_event(&Event::Tick));
    }

    #[test]
    fn focus_field_by_name() {
        let mut form = signup();
        form.focus_field("avatar").unwrap();
        assert_eq!(form.focus(), Focus::Field(2));
        assert!(form.focus_field("nope").is_err());
    }
}
