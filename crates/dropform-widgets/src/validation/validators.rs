#![forbid(unsafe_code)]

//! Core validation types and built-in validators.

use std::collections::HashMap;
use std::fmt;

use crate::dropzone::AcceptList;
use crate::value::FileHandle;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// Error code for required field validation.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Error code for minimum length validation.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// Error code for maximum length validation.
pub const ERROR_CODE_MAX_LENGTH: &str = "too_long";
/// Error code for email validation.
pub const ERROR_CODE_EMAIL: &str = "email";
/// Error code for a file outside the accept list.
pub const ERROR_CODE_FILE_TYPE: &str = "file_type";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation error with code, message, and interpolation parameters.
///
/// ```rust
/// use dropform_widgets::validation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Must be at least {min} characters")
///     .with_param("min", 6);
///
/// assert_eq!(error.format_message(), "Must be at least 6 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code for programmatic handling.
    pub code: &'static str,
    /// Message template.
    pub message: String,
    /// Parameters substituted into `{key}` placeholders.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// The message with every `{key}` replaced by its parameter.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// FieldCheck
// ---------------------------------------------------------------------------

/// Outcome of running one validator on one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldCheck {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl FieldCheck {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Formatted message when invalid.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }

    /// First error wins.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::Valid => other,
            Self::Invalid(_) => self,
        }
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A trait for validating values of type `T`.
///
/// Text validators implement `Validator<str>`; file validators implement
/// `Validator<Option<FileHandle>>`.
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> FieldCheck;

    /// Default error message for this validator.
    fn error_message(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Text validators
// ---------------------------------------------------------------------------

/// Validates that a string is not empty.
///
/// By default, whitespace-only strings are considered empty.
#[derive(Debug, Clone, Default)]
pub struct Required {
    pub allow_whitespace: bool,
    message: Option<String>,
}

impl Required {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow_whitespace(mut self) -> Self {
        self.allow_whitespace = true;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> FieldCheck {
        let is_empty = if self.allow_whitespace {
            value.is_empty()
        } else {
            value.trim().is_empty()
        };

        if is_empty {
            FieldCheck::Invalid(ValidationError::new(
                ERROR_CODE_REQUIRED,
                self.error_message(),
            ))
        } else {
            FieldCheck::Valid
        }
    }

    fn error_message(&self) -> &str {
        self.message.as_deref().unwrap_or("This field is required")
    }
}

/// Validates that a string has at least `min` characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLength {
    pub min: usize,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> FieldCheck {
        let len = value.chars().count();
        if len < self.min {
            FieldCheck::Invalid(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, self.error_message())
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            FieldCheck::Valid
        }
    }

    fn error_message(&self) -> &str {
        "Must be at least {min} characters"
    }
}

/// Validates that a string has at most `max` characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength {
    pub max: usize,
}

impl MaxLength {
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Validator<str> for MaxLength {
    fn validate(&self, value: &str) -> FieldCheck {
        let len = value.chars().count();
        if len > self.max {
            FieldCheck::Invalid(
                ValidationError::new(ERROR_CODE_MAX_LENGTH, self.error_message())
                    .with_param("max", self.max)
                    .with_param("actual", len),
            )
        } else {
            FieldCheck::Valid
        }
    }

    fn error_message(&self) -> &str {
        "Must be at most {max} characters"
    }
}

/// Validates that a string looks like an email address: text on both sides
/// of a single `@`, and a dotted domain whose last label has 2+ characters.
///
/// Empty input is valid; pair with [`Required`] to demand a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Email {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn looks_valid(value: &str) -> bool {
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }
        if local.contains(char::is_whitespace) || domain.contains(char::is_whitespace) {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
            return false;
        }
        labels.last().is_some_and(|tld| tld.chars().count() >= 2)
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> FieldCheck {
        let trimmed = value.trim();
        if trimmed.is_empty() || Self::looks_valid(trimmed) {
            FieldCheck::Valid
        } else {
            FieldCheck::Invalid(ValidationError::new(ERROR_CODE_EMAIL, self.error_message()))
        }
    }

    fn error_message(&self) -> &str {
        "Invalid email address"
    }
}

// ---------------------------------------------------------------------------
// File validators
// ---------------------------------------------------------------------------

/// Validates that a file was chosen.
#[derive(Debug, Clone, Default)]
pub struct FileRequired {
    message: Option<String>,
}

impl FileRequired {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator<Option<FileHandle>> for FileRequired {
    fn validate(&self, value: &Option<FileHandle>) -> FieldCheck {
        if value.is_some() {
            FieldCheck::Valid
        } else {
            FieldCheck::Invalid(ValidationError::new(
                ERROR_CODE_REQUIRED,
                self.error_message(),
            ))
        }
    }

    fn error_message(&self) -> &str {
        self.message.as_deref().unwrap_or("A file is required")
    }
}

/// Validates that a chosen file's extension is in an [`AcceptList`].
/// No file is valid.
#[derive(Debug, Clone)]
pub struct FileExtension {
    pub accept: AcceptList,
}

impl FileExtension {
    #[must_use]
    pub fn new(accept: AcceptList) -> Self {
        Self { accept }
    }

    /// The error a rejected `file` produces under `accept`.
    pub fn rejection(accept: &AcceptList) -> ValidationError {
        ValidationError::new(ERROR_CODE_FILE_TYPE, "File type not accepted (expected {accept})")
            .with_param("accept", accept.describe())
    }
}

impl Validator<Option<FileHandle>> for FileExtension {
    fn validate(&self, value: &Option<FileHandle>) -> FieldCheck {
        match value {
            Some(file) if !self.accept.accepts(file) => {
                FieldCheck::Invalid(Self::rejection(&self.accept))
            }
            _ => FieldCheck::Valid,
        }
    }

    fn error_message(&self) -> &str {
        "File type not accepted (expected {accept})"
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Both validators must pass; the first error wins.
#[derive(Debug, Clone)]
pub struct And<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> And<A, B> {
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<T: ?Sized, A, B> Validator<T> for And<A, B>
where
    A: Validator<T>,
    B: Validator<T>,
{
    fn validate(&self, value: &T) -> FieldCheck {
        match self.first.validate(value) {
            FieldCheck::Valid => self.second.validate(value),
            invalid => invalid,
        }
    }

    fn error_message(&self) -> &str {
        self.first.error_message()
    }
}
