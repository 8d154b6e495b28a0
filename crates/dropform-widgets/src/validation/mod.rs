#![forbid(unsafe_code)]

//! Form validation with composable validators.
//!
//! - [`Validator`] checks a single value: `str` for text-like fields,
//!   `Option<FileHandle>` for file fields
//! - [`Rules`] attaches validators to field names and runs them over a
//!   whole [`FormValues`](crate::FormValues)
//! - [`Ruleset`] is what the form engine calls on submit; closures
//!   returning a [`ValidationResult`] work too
//!
//! ```rust
//! use dropform_widgets::validation::{And, MinLength, Required, Validator};
//!
//! let password = And::new(Required::new(), MinLength::new(6));
//! assert!(password.validate("secret1").is_valid());
//! assert!(!password.validate("x").is_valid());
//! ```

mod result;
mod rules;
mod validators;

pub use result::ValidationResult;
pub use rules::{AcceptAll, Rules, Ruleset};
pub use validators::{
    // Composition
    And,
    // Error codes
    ERROR_CODE_EMAIL,
    ERROR_CODE_FILE_TYPE,
    ERROR_CODE_MAX_LENGTH,
    ERROR_CODE_MIN_LENGTH,
    ERROR_CODE_REQUIRED,
    // Built-in validators
    Email,
    FileExtension,
    FileRequired,
    MaxLength,
    MinLength,
    Required,
    // Core types
    FieldCheck,
    ValidationError,
    Validator,
};
