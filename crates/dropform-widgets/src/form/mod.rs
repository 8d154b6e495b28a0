#![forbid(unsafe_code)]

//! The form engine.
//!
//! A [`FormEngine`] owns a [`FormSchema`], the current [`FormValues`] and the
//! errors produced by the last submit attempt. It renders the fields on a
//! span grid followed by a submit control and a secondary toggle action,
//! and it turns key, paste and file-drop events into value changes.
//!
//! ```
//! use dropform_widgets::validation::{MinLength, Rules};
//! use dropform_widgets::{FieldDescriptor, FormEngine, FormSchema, SubmitOutcome};
//!
//! let schema = FormSchema::new(vec![
//!     FieldDescriptor::email("email", "Email"),
//!     FieldDescriptor::password("password", "Password"),
//! ])
//! .unwrap();
//!
//! let mut form = FormEngine::builder(schema)
//!     .ruleset(Rules::new().text("password", MinLength::new(6)))
//!     .submit_label("Login")
//!     .build()
//!     .unwrap();
//!
//! form.set_field_value("email", "a@b.com").unwrap();
//! form.set_field_value("password", "x").unwrap();
//! assert!(matches!(form.submit(), SubmitOutcome::Rejected { .. }));
//! ```

mod input;
mod render;

pub use input::Focus;
pub use render::FormLayout;

use std::fmt;

use dropform_layout::SpanGrid;
use dropform_render::cell::PackedRgba;
use dropform_render::style::Style;

use crate::dropzone::{AcceptList, DropPolicy};
use crate::schema::{FieldDescriptor, FieldKind, FormSchema};
use crate::spinner::SpinnerState;
use crate::validation::{AcceptAll, FileExtension, Ruleset, ValidationResult};
use crate::value::{FieldValue, FileHandle, FormValues};

type SubmitFn = Box<dyn FnMut(FormValues)>;
type ToggleFn = Box<dyn FnMut()>;

/// Misuse of the engine API: a name the schema does not declare, or a
/// value of the wrong kind for the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    UnknownField(String),
    /// `kind` is the declared kind of the field.
    KindMismatch { name: String, kind: FieldKind },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "no field named `{name}`"),
            Self::KindMismatch { name, kind } => {
                write!(f, "field `{name}` is a {kind} field")
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Result of [`FormEngine::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed and the submit callback ran once.
    Submitted,
    /// Validation failed; the callback did not run.
    Rejected { errors: ValidationResult },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// Styles used when rendering a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStyles {
    /// Applied to the whole form area first.
    pub base: Style,
    pub label: Style,
    /// Input rows of text-like fields.
    pub input: Style,
    /// Layered over the focused element.
    pub focused: Style,
    pub error: Style,
    /// Submit control while busy.
    pub disabled: Style,
    /// Placeholders and drop hints.
    pub placeholder: Style,
    pub toggle: Style,
}

impl Default for FormStyles {
    fn default() -> Self {
        Self {
            base: Style::new(),
            label: Style::new().bold(),
            input: Style::new().underline(),
            focused: Style::new().fg(PackedRgba::rgb(0, 175, 255)).bold(),
            error: Style::new().fg(PackedRgba::RED),
            disabled: Style::new().dim(),
            placeholder: Style::new().dim(),
            toggle: Style::new().underline(),
        }
    }
}

/// A schema-driven form.
pub struct FormEngine {
    schema: FormSchema,
    values: FormValues,
    errors: ValidationResult,
    ruleset: Box<dyn Ruleset>,
    on_submit: Option<SubmitFn>,
    on_toggle: Option<ToggleFn>,
    submit_label: String,
    toggle_label: String,
    busy: bool,
    accept: AcceptList,
    drop_policy: DropPolicy,
    styles: FormStyles,
    grid: SpanGrid,
    focus: Focus,
    /// Grapheme cursor inside the focused text field.
    cursor: usize,
    spinner: SpinnerState,
}

impl fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormEngine")
            .field("schema", &self.schema)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("busy", &self.busy)
            .field("focus", &self.focus)
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FormEngine`].
pub struct EngineBuilder {
    schema: FormSchema,
    initial_values: FormValues,
    ruleset: Box<dyn Ruleset>,
    on_submit: Option<SubmitFn>,
    on_toggle: Option<ToggleFn>,
    submit_label: String,
    toggle_label: String,
    busy: bool,
    accept: AcceptList,
    drop_policy: DropPolicy,
    styles: FormStyles,
    grid: SpanGrid,
}

impl EngineBuilder {
    /// Starting values. Fields left out start empty.
    #[must_use]
    pub fn initial_values(mut self, values: FormValues) -> Self {
        self.initial_values = values;
        self
    }

    /// Validation run on every submit attempt.
    #[must_use]
    pub fn ruleset(mut self, ruleset: impl Ruleset + 'static) -> Self {
        self.ruleset = Box::new(ruleset);
        self
    }

    /// Called with a snapshot of the values when a submit passes validation.
    #[must_use]
    pub fn on_submit(mut self, f: impl FnMut(FormValues) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    /// Called when the toggle control is activated.
    #[must_use]
    pub fn on_toggle(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    #[must_use]
    pub fn toggle_label(mut self, label: impl Into<String>) -> Self {
        self.toggle_label = label.into();
        self
    }

    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// File types accepted by every file field.
    #[must_use]
    pub fn accept(mut self, accept: AcceptList) -> Self {
        self.accept = accept;
        self
    }

    #[must_use]
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    #[must_use]
    pub fn styles(mut self, styles: FormStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Grid used to lay fields out.
    #[must_use]
    pub fn grid(mut self, grid: SpanGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Check the initial values against the schema and build the engine.
    pub fn build(self) -> Result<FormEngine, FieldError> {
        for (name, value) in self.initial_values.iter() {
            let field = self
                .schema
                .get(name)
                .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
            if !value.fits(field.kind) {
                return Err(FieldError::KindMismatch {
                    name: name.to_string(),
                    kind: field.kind,
                });
            }
        }

        Ok(self.finish())
    }

    /// Assemble the engine from checked settings. Shared by [`build`](Self::build)
    /// and [`FormEngine::new`].
    fn finish(self) -> FormEngine {
        // Schema order, with every declared field present.
        let mut values = FormValues::new();
        for field in self.schema.iter() {
            let value = self
                .initial_values
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| FieldValue::empty(field.kind));
            values.insert(field.name.clone(), value);
        }

        let mut engine = FormEngine {
            schema: self.schema,
            values,
            errors: ValidationResult::new(),
            ruleset: self.ruleset,
            on_submit: self.on_submit,
            on_toggle: self.on_toggle,
            submit_label: self.submit_label,
            toggle_label: self.toggle_label,
            busy: self.busy,
            accept: self.accept,
            drop_policy: self.drop_policy,
            styles: self.styles,
            grid: self.grid,
            focus: Focus::Toggle,
            cursor: 0,
            spinner: SpinnerState::default(),
        };
        engine.focus = engine.first_focus();
        engine.sync_cursor();
        engine
    }
}

/// What happened to a file offered to a file field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileDrop {
    /// No candidates.
    Empty,
    /// Same file as before.
    Unchanged,
    Stored,
    /// Refused by a strict accept list; the field now shows an error.
    Refused,
}

impl FormEngine {
    /// Start building an engine for `schema`.
    pub fn builder(schema: FormSchema) -> EngineBuilder {
        EngineBuilder {
            schema,
            initial_values: FormValues::new(),
            ruleset: Box::new(AcceptAll),
            on_submit: None,
            on_toggle: None,
            submit_label: "Submit".to_string(),
            toggle_label: String::new(),
            busy: false,
            accept: AcceptList::default(),
            drop_policy: DropPolicy::default(),
            styles: FormStyles::default(),
            grid: SpanGrid::default(),
        }
    }

    /// An engine with empty values and default settings.
    pub fn new(schema: FormSchema) -> Self {
        // No initial values, so there is nothing to check.
        Self::builder(schema).finish()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Errors currently shown next to fields.
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    pub fn toggle_label(&self) -> &str {
        &self.toggle_label
    }

    pub fn accept(&self) -> &AcceptList {
        &self.accept
    }

    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    pub fn styles(&self) -> &FormStyles {
        &self.styles
    }

    pub fn grid(&self) -> &SpanGrid {
        &self.grid
    }

    pub fn spinner_state(&self) -> SpinnerState {
        self.spinner
    }

    fn field(&self, name: &str) -> Result<(usize, &FieldDescriptor), FieldError> {
        self.schema
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Set a text-like field. Returns `Ok(false)` when the value is already
    /// equal. A change hides the field's error until the next submit.
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<bool, FieldError> {
        let (index, field) = self.field(name)?;
        if !field.kind.is_text_like() {
            return Err(FieldError::KindMismatch {
                name: name.to_string(),
                kind: field.kind,
            });
        }
        Ok(self.store_text(index, value.into()))
    }

    /// Offer files to a file field. The first candidate is stored and the
    /// rest are ignored; no candidates leaves the field as it is.
    ///
    /// Under [`DropPolicy::Strict`] a file outside the accept list is
    /// refused: the value stays and the field shows the error at once.
    pub fn set_file_value<I, F>(&mut self, name: &str, candidates: I) -> Result<bool, FieldError>
    where
        I: IntoIterator<Item = F>,
        F: Into<FileHandle>,
    {
        let (index, field) = self.field(name)?;
        if field.kind != FieldKind::File {
            return Err(FieldError::KindMismatch {
                name: name.to_string(),
                kind: field.kind,
            });
        }
        Ok(self.offer_files(index, candidates) == FileDrop::Stored)
    }

    /// Empty a file field. Returns `Ok(false)` if it was already empty.
    pub fn clear_file(&mut self, name: &str) -> Result<bool, FieldError> {
        let (index, field) = self.field(name)?;
        if field.kind != FieldKind::File {
            return Err(FieldError::KindMismatch {
                name: name.to_string(),
                kind: field.kind,
            });
        }
        Ok(self.store_file(index, None))
    }

    fn store_text(&mut self, index: usize, value: String) -> bool {
        let name = self.schema.fields()[index].name.clone();
        let Some(slot) = self.values.get_mut(&name) else {
            return false;
        };
        if slot.as_text() == Some(value.as_str()) {
            return false;
        }
        *slot = FieldValue::Text(value);
        self.errors.clear(&name);
        if self.focus == Focus::Field(index) {
            self.cursor = self.cursor.min(crate::grapheme_count(self.text_at(index)));
        }
        true
    }

    fn store_file(&mut self, index: usize, file: Option<FileHandle>) -> bool {
        let name = self.schema.fields()[index].name.clone();
        let Some(slot) = self.values.get_mut(&name) else {
            return false;
        };
        if matches!(slot, FieldValue::File(current) if *current == file) {
            return false;
        }
        *slot = FieldValue::File(file);
        self.errors.clear(&name);
        true
    }

    fn offer_files<I, F>(&mut self, index: usize, candidates: I) -> FileDrop
    where
        I: IntoIterator<Item = F>,
        F: Into<FileHandle>,
    {
        let mut candidates = candidates.into_iter();
        let Some(first) = candidates.next() else {
            return FileDrop::Empty;
        };
        let file: FileHandle = first.into();
        let name = self.schema.fields()[index].name.clone();

        let ignored = candidates.count();
        if ignored > 0 {
            dropform_core::debug!(field = %name, ignored, "extra dropped files ignored");
        }

        if self.drop_policy == DropPolicy::Strict && !self.accept.accepts(&file) {
            dropform_core::debug!(field = %name, file = %file.name, "dropped file refused");
            let message = FileExtension::rejection(&self.accept).format_message();
            self.errors.set(name, message);
            return FileDrop::Refused;
        }

        if self.store_file(index, Some(file)) {
            FileDrop::Stored
        } else {
            FileDrop::Unchanged
        }
    }

    pub(crate) fn text_at(&self, index: usize) -> &str {
        self.schema
            .fields()
            .get(index)
            .and_then(|f| self.values.text(&f.name))
            .unwrap_or("")
    }

    pub(crate) fn file_at(&self, index: usize) -> Option<&FileHandle> {
        self.schema
            .fields()
            .get(index)
            .and_then(|f| self.values.file(&f.name))
    }

    // -----------------------------------------------------------------------
    // Submit / toggle / busy
    // -----------------------------------------------------------------------

    /// Run the ruleset, then check every filled file field that has no
    /// ruleset error against the accept list.
    ///
    /// Messages for names the schema does not declare are dropped: nothing
    /// could display them, so they must not block a submit.
    pub fn validate(&self) -> ValidationResult {
        let mut result = self.ruleset.validate(&self.values);
        result.retain(|name, message| {
            let declared = self.schema.get(name).is_some();
            if !declared && !message.is_empty() {
                dropform_core::warn!(field = %name, "error for undeclared field dropped");
            }
            declared
        });
        for field in self.schema.iter().filter(|f| f.kind == FieldKind::File) {
            if result.has_error(&field.name) {
                continue;
            }
            if let Some(file) = self.values.file(&field.name)
                && !self.accept.accepts(file)
            {
                result.set(
                    field.name.clone(),
                    FileExtension::rejection(&self.accept).format_message(),
                );
            }
        }
        result
    }

    /// Validate and, when valid, hand a snapshot of the values to the
    /// submit callback. Values are kept either way.
    ///
    /// This does not look at the busy flag; the keyboard path does.
    pub fn submit(&mut self) -> SubmitOutcome {
        let result = self.validate();
        if !result.is_valid() {
            dropform_core::info!(errors = result.error_count(), "form submit rejected");
            self.errors = result.clone();
            return SubmitOutcome::Rejected { errors: result };
        }

        self.errors = ValidationResult::new();
        dropform_core::info!(fields = self.values.len(), "form submitted");
        if let Some(on_submit) = self.on_submit.as_mut() {
            on_submit(self.values.clone());
        }
        SubmitOutcome::Submitted
    }

    /// Fire the toggle callback.
    pub fn toggle(&mut self) {
        dropform_core::debug!("form toggle");
        if let Some(on_toggle) = self.on_toggle.as_mut() {
            on_toggle();
        }
    }

    /// Mark a submission as in flight (or finished).
    pub fn set_busy(&mut self, busy: bool) {
        if self.busy != busy {
            dropform_core::debug!(busy, "form busy changed");
            self.busy = busy;
            self.spinner = SpinnerState::default();
        }
    }

    /// Advance the busy spinner.
    pub fn tick(&mut self) {
        if self.busy {
            self.spinner.tick();
        }
    }
}
