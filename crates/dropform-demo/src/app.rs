#![forbid(unsafe_code)]

//! Demo application model.
//!
//! Two pages share one [`FormEngine`] slot: sign-in and sign-up. The toggle
//! link swaps them. A submitted form is handed to a worker thread that
//! pretends to talk to a server; the form stays busy until the reply arrives.

use std::cell::{Cell as Flag, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use dropform_core::event::{Event, KeyCode};
use dropform_core::geometry::Rect;
use dropform_render::buffer::Buffer;
use dropform_render::cell::{Cell, PackedRgba};
use dropform_render::style::Style;
use dropform_widgets::validation::{Email, FileRequired, MinLength, Required, Rules};
use dropform_widgets::{
    DropPolicy, FieldDescriptor, FieldKind, FormEngine, FormSchema, FormValues, Widget,
};

use crate::cli::Opts;

/// Widest the form grows before it is centered.
const MAX_FORM_WIDTH: u16 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    SignIn,
    SignUp,
}

impl Page {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "signin" | "sign-in" | "login" => Some(Self::SignIn),
            "signup" | "sign-up" | "register" => Some(Self::SignUp),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    fn schema(self) -> FormSchema {
        let fields = match self {
            Self::SignIn => vec![
                FieldDescriptor::email("email", "Email").placeholder("you@example.com"),
                FieldDescriptor::password("password", "Password"),
            ],
            Self::SignUp => vec![
                FieldDescriptor::text("firstName", "First Name").span(2),
                FieldDescriptor::text("lastName", "Last Name").span(2),
                FieldDescriptor::email("email", "Email").placeholder("you@example.com"),
                FieldDescriptor::password("password", "Password"),
                FieldDescriptor::file("picture", "Picture").placeholder("Add Picture Here"),
            ],
        };
        // Names above are unique and spans within range.
        FormSchema::new(fields).unwrap_or_default()
    }

    fn rules(self) -> Rules {
        let rules = Rules::new()
            .text("email", Required::new())
            .text("email", Email::new())
            .text("password", Required::new())
            .text("password", MinLength::new(6));
        match self {
            Self::SignIn => rules,
            Self::SignUp => rules
                .text("firstName", Required::new())
                .text("lastName", Required::new())
                .file("picture", FileRequired::new()),
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Login",
            Self::SignUp => "Register",
        }
    }

    fn toggle_label(self) -> &'static str {
        match self {
            Self::SignIn => "Don't have an account? Sign Up here.",
            Self::SignUp => "Already have an account? Login here.",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The status line under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Pending(String),
    Done(String),
    Failed(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Self::Pending(m) | Self::Done(m) | Self::Failed(m) => m.as_str(),
        }
    }

    fn style(&self) -> Style {
        match self {
            Self::Pending(_) => Style::new().dim(),
            Self::Done(_) => Style::new().fg(PackedRgba::GREEN),
            Self::Failed(_) => Style::new().fg(PackedRgba::RED).bold(),
        }
    }
}

/// Reply from the simulated backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub page: Page,
    pub message: String,
}

pub struct App {
    opts: Opts,
    page: Page,
    form: FormEngine,
    /// Filled by the form's submit callback, drained after each event.
    outbox: Rc<RefCell<Option<FormValues>>>,
    toggled: Rc<Flag<bool>>,
    pending: Option<Receiver<Reply>>,
    status: Option<Status>,
    quit: bool,
}

impl App {
    pub fn new(opts: Opts) -> Self {
        let outbox = Rc::new(RefCell::new(None));
        let toggled = Rc::new(Flag::new(false));
        let form = build_form(opts.page, &opts, &outbox, &toggled);
        Self {
            page: opts.page,
            opts,
            form,
            outbox,
            toggled,
            pending: None,
            status: None,
            quit: false,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn form(&self) -> &FormEngine {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormEngine {
        &mut self.form
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Route one input event. Returns `true` if the screen needs a redraw.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key)
                if key.is_press()
                    && (key.code == KeyCode::Escape
                        || (key.ctrl() && key.code == KeyCode::Char('c'))) =>
            {
                self.quit = true;
                return true;
            }
            Event::Resize { .. } => return true,
            _ => {}
        }

        let changed = self.form.handle_event(event);
        self.flush_outbox();
        if self.toggled.replace(false) {
            self.switch_page();
            return true;
        }
        changed
    }

    /// Advance the spinner and collect a finished request.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(reply) => {
                tracing::info!(page = %reply.page, "request finished");
                self.pending = None;
                self.form.set_busy(false);
                self.status = Some(Status::Done(reply.message));
                true
            }
            Err(TryRecvError::Empty) => self.form.handle_event(&Event::Tick),
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("request worker went away");
                self.pending = None;
                self.form.set_busy(false);
                self.status = Some(Status::Failed("Request failed".to_string()));
                true
            }
        }
    }

    /// Programmatic submit, with the same busy gate as the keyboard.
    pub fn submit(&mut self) -> bool {
        if self.form.is_busy() {
            return false;
        }
        let submitted = self.form.submit().is_submitted();
        self.flush_outbox();
        submitted
    }

    fn flush_outbox(&mut self) {
        let Some(values) = self.outbox.borrow_mut().take() else {
            return;
        };
        let redacted = redacted_payload(self.form.schema(), &values);
        tracing::info!(page = %self.page, payload = %redacted, "submitting");

        self.form.set_busy(true);
        self.status = Some(Status::Pending(match self.page {
            Page::SignIn => "Signing in...".to_string(),
            Page::SignUp => "Creating account...".to_string(),
        }));
        self.pending = Some(spawn_request(
            self.page,
            values,
            Duration::from_millis(self.opts.latency_ms),
        ));
    }

    fn switch_page(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("page switch ignored while a request is in flight");
            return;
        }
        self.page = self.page.other();
        self.form = build_form(self.page, &self.opts, &self.outbox, &self.toggled);
        self.status = None;
        tracing::debug!(page = %self.page, "page switched");
    }

    /// Draw title, form and status line into `area`.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let width = area.width.min(MAX_FORM_WIDTH);
        let x = area.x + (area.width - width) / 2;
        let column = Rect::new(x, area.y, width, area.height);

        draw_line(buf, column.row(0), self.page.title(), Style::new().bold());
        let form_area = Rect::new(
            column.x,
            column.y.saturating_add(2),
            column.width,
            column.height.saturating_sub(3),
        );
        self.form.render(form_area.intersection(&area), buf);

        if let Some(status) = &self.status {
            let row = column.row(column.height.saturating_sub(1));
            draw_line(buf, row, status.message(), status.style());
        }
    }
}

fn build_form(
    page: Page,
    opts: &Opts,
    outbox: &Rc<RefCell<Option<FormValues>>>,
    toggled: &Rc<Flag<bool>>,
) -> FormEngine {
    let outbox = Rc::clone(outbox);
    let toggled = Rc::clone(toggled);
    let policy = if opts.strict_drop {
        DropPolicy::Strict
    } else {
        DropPolicy::Advisory
    };
    let builder = FormEngine::builder(page.schema())
        .ruleset(page.rules())
        .submit_label(page.submit_label())
        .toggle_label(page.toggle_label())
        .drop_policy(policy)
        .on_submit(move |values| {
            *outbox.borrow_mut() = Some(values);
        })
        .on_toggle(move || toggled.set(true));
    match builder.build() {
        Ok(form) => form,
        // No initial values are supplied, so building cannot fail.
        Err(err) => {
            tracing::warn!(%err, "form build failed");
            FormEngine::new(page.schema())
        }
    }
}

/// JSON body with password values masked, for logging.
pub fn redacted_payload(schema: &FormSchema, values: &FormValues) -> serde_json::Value {
    let mut json = values.to_json();
    if let Some(map) = json.as_object_mut() {
        for field in schema.iter().filter(|f| f.kind == FieldKind::Password) {
            if let Some(slot) = map.get_mut(&field.name) {
                *slot = serde_json::Value::String("***".to_string());
            }
        }
    }
    json
}

/// Run the simulated request on a worker thread.
fn spawn_request(page: Page, values: FormValues, latency: Duration) -> Receiver<Reply> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        thread::sleep(latency);
        let message = reply_message(page, &values);
        // The app may have quit already.
        let _ = tx.send(Reply { page, message });
    });
    rx
}

fn reply_message(page: Page, values: &FormValues) -> String {
    let email = values.text("email").unwrap_or_default();
    match page {
        Page::SignIn => format!("Welcome back, {email}"),
        Page::SignUp => {
            let first = values.text("firstName").unwrap_or_default();
            let last = values.text("lastName").unwrap_or_default();
            match values.file("picture") {
                Some(picture) => {
                    format!("Account created for {first} {last} ({email}) with {}", picture.name)
                }
                None => format!("Account created for {first} {last} ({email})"),
            }
        }
    }
}

fn draw_line(buf: &mut Buffer, row: Rect, text: &str, style: Style) {
    let mut x = row.x;
    for ch in text.chars() {
        let mut cell = Cell::from_char(ch);
        let width = cell.content.width().max(1) as u16;
        if x + width > row.right() {
            break;
        }
        style.apply(&mut cell);
        buf.set(x, row.y, cell);
        x += width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropform_render::text::buffer_to_trimmed_lines;

    fn opts() -> Opts {
        Opts {
            latency_ms: 0,
            ..Opts::default()
        }
    }

    #[test]
    fn page_parse_and_other() {
        assert_eq!(Page::parse("SignUp"), Some(Page::SignUp));
        assert_eq!(Page::parse("login"), Some(Page::SignIn));
        assert_eq!(Page::parse("home"), None);
        assert_eq!(Page::SignIn.other(), Page::SignUp);
    }

    #[test]
    fn page_schemas() {
        assert_eq!(Page::SignIn.schema().len(), 2);
        let up = Page::SignUp.schema();
        assert_eq!(up.len(), 5);
        assert_eq!(up.get("firstName").map(|f| f.span), Some(2));
        assert_eq!(up.get("picture").map(|f| f.kind), Some(FieldKind::File));
    }

    #[test]
    fn reply_mentions_picture() {
        let values = FormValues::new()
            .with_text("firstName", "Ada")
            .with_text("lastName", "Lovelace")
            .with_text("email", "ada@example.com")
            .with_file("picture", "/tmp/ada.png");
        assert_eq!(
            reply_message(Page::SignUp, &values),
            "Account created for Ada Lovelace (ada@example.com) with ada.png"
        );
    }

    #[test]
    fn payload_masks_passwords() {
        let schema = Page::SignIn.schema();
        let values = FormValues::new()
            .with_text("email", "a@b.com")
            .with_text("password", "secret1");
        let json = redacted_payload(&schema, &values);
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["password"], "***");
    }

    #[test]
    fn render_shows_title_and_status() {
        let mut app = App::new(opts());
        app.status = Some(Status::Done("ok".into()));
        let mut buf = Buffer::new(40, 14);
        app.render(buf.bounds(), &mut buf);
        let lines = buffer_to_trimmed_lines(&buf);
        assert_eq!(lines[0], "Sign In");
        assert_eq!(lines[13], "ok");
    }

    #[test]
    fn render_centers_on_wide_screens() {
        let app = App::new(opts());
        let mut buf = Buffer::new(100, 14);
        app.render(buf.bounds(), &mut buf);
        let lines = buffer_to_trimmed_lines(&buf);
        assert_eq!(lines[0], format!("{}Sign In", " ".repeat(18)));
    }
}
