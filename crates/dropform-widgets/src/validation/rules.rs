#![forbid(unsafe_code)]

//! Rulesets: whole-form validation.

use super::result::ValidationResult;
use super::validators::Validator;
use crate::value::{FieldValue, FileHandle, FormValues};

/// Maps the current values to a [`ValidationResult`].
///
/// Implemented for closures, for [`Rules`] and for [`AcceptAll`].
pub trait Ruleset {
    fn validate(&self, values: &FormValues) -> ValidationResult;
}

impl<F> Ruleset for F
where
    F: Fn(&FormValues) -> ValidationResult,
{
    fn validate(&self, values: &FormValues) -> ValidationResult {
        self(values)
    }
}

/// A ruleset that accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Ruleset for AcceptAll {
    fn validate(&self, _values: &FormValues) -> ValidationResult {
        ValidationResult::new()
    }
}

type CheckFn = Box<dyn Fn(&FormValues) -> Option<String> + Send + Sync>;

enum Rule {
    Text(Box<dyn Validator<str>>),
    File(Box<dyn Validator<Option<FileHandle>>>),
    Check(CheckFn),
}

/// Per-field validator lists.
///
/// Rules run in the order they were added; the first failing rule of a
/// field decides its message and later rules for that field are skipped.
///
/// ```
/// use dropform_widgets::validation::{Email, MinLength, Required, Rules, Ruleset};
/// use dropform_widgets::FormValues;
///
/// let rules = Rules::new()
///     .text("email", Required::new())
///     .text("email", Email::new())
///     .text("password", MinLength::new(6));
///
/// let result = rules.validate(&FormValues::new().with_text("email", "a@b.com").with_text("password", "x"));
/// assert_eq!(result.get("password"), Some("Must be at least 6 characters"));
/// assert_eq!(result.get("email"), None);
/// ```
#[derive(Default)]
pub struct Rules {
    rules: Vec<(String, Rule)>,
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rules")
            .field("fields", &self.rules.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a text-like field. A missing value validates as `""`.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, validator: impl Validator<str> + 'static) -> Self {
        self.rules.push((name.into(), Rule::Text(Box::new(validator))));
        self
    }

    /// Validate a file field. A missing value validates as no file.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        validator: impl Validator<Option<FileHandle>> + 'static,
    ) -> Self {
        self.rules.push((name.into(), Rule::File(Box::new(validator))));
        self
    }

    /// Attach a cross-field check to `name`. Return `Some(message)` to fail.
    #[must_use]
    pub fn check<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&FormValues) -> Option<String> + Send + Sync + 'static,
    {
        self.rules.push((name.into(), Rule::Check(Box::new(check))));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Ruleset for Rules {
    fn validate(&self, values: &FormValues) -> ValidationResult {
        let mut result = ValidationResult::new();
        for (name, rule) in &self.rules {
            if result.has_error(name) {
                continue;
            }
            let message = match rule {
                Rule::Text(v) => {
                    let text = match values.get(name) {
                        Some(FieldValue::Text(s)) => s.as_str(),
                        Some(FieldValue::File(_)) => continue,
                        None => "",
                    };
                    v.validate(text).error_message()
                }
                Rule::File(v) => {
                    let file = match values.get(name) {
                        Some(FieldValue::File(f)) => f.clone(),
                        Some(FieldValue::Text(_)) => continue,
                        None => None,
                    };
                    v.validate(&file).error_message()
                }
                Rule::Check(f) => f(values),
            };
            if let Some(message) = message {
                result.set(name.clone(), message);
            }
        }
        result
    }
}
